//! Human-readable error descriptions and structured JSON error formatting.

use estop_core::{BuildError, OperatorError};
use serde_json::json;

/// Context attached to every config load or validation failure.
pub const CONFIG_CONTEXT: &str = "invalid configuration";

/// True when the error came from loading or validating configuration.
fn is_config_error(err: &eyre::Report) -> bool {
    err.downcast_ref::<BuildError>().is_some()
        || err.chain().any(|c| c.to_string().starts_with(CONFIG_CONTEXT))
}

/// Map an `eyre::Report` to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(BuildError::InvalidConfig(msg)) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Invalid operator configuration ({msg}).\nLikely causes: Out-of-range values in [operator].\nHow to fix: Edit the config file, then rerun. See etc/estop_config.toml for a sample."
        );
    }

    if let Some(oe) = err.downcast_ref::<OperatorError>() {
        return match oe {
            OperatorError::Disconnected => "What happened: The operator loop stopped unexpectedly.\nLikely causes: A handler panicked or the loop was shut down early.\nHow to fix: Re-run with --log-level=debug and check the log for the panic.".to_string(),
            OperatorError::Publish(e) => format!(
                "What happened: Publishing an output failed ({e}).\nLikely causes: The consumer closed its end of the feed.\nHow to fix: Check the downstream reader."
            ),
        };
    }

    if is_config_error(err) {
        let cause = err.root_cause();
        return format!(
            "What happened: Configuration is invalid or unreadable ({cause}).\nLikely causes: Wrong --config path, a TOML syntax error, or an out-of-range value.\nHow to fix: Edit the TOML config and try again."
        );
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for configuration problems, 4 for a dead operator loop, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if is_config_error(err) {
        return 3;
    }
    if let Some(OperatorError::Disconnected) = err.downcast_ref::<OperatorError>() {
        return 4;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if is_config_error(err) {
        "InvalidConfig"
    } else if err.downcast_ref::<OperatorError>().is_some() {
        "Operator"
    } else {
        "Error"
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;

    #[test]
    fn build_error_is_config_exit_code() {
        let err = eyre::Report::new(BuildError::InvalidConfig("update_rate_hz must be > 0"));
        assert_eq!(exit_code_for_error(&err), 3);
        assert!(humanize(&err).contains("update_rate_hz must be > 0"));
    }

    #[test]
    fn wrapped_validation_error_is_config() {
        let err: eyre::Result<()> = Err(eyre::eyre!("operator.target_jerk must be <= 0.0"));
        let err = err.wrap_err(CONFIG_CONTEXT).unwrap_err();
        assert_eq!(exit_code_for_error(&err), 3);
        assert!(humanize(&err).contains("target_jerk"));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "InvalidConfig");
    }

    #[test]
    fn disconnected_maps_to_four() {
        let err = eyre::Report::new(OperatorError::Disconnected);
        assert_eq!(exit_code_for_error(&err), 4);
        assert!(humanize(&err).contains("operator loop"));
    }

    #[test]
    fn unknown_errors_fall_back() {
        let err = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&err), 1);
        assert!(humanize(&err).contains("Original: boom"));
    }
}
