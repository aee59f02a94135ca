//! Tracing subscriber setup: console on stderr, optional JSON file sink.

use eyre::{Result, WrapErr};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter precedence: `RUST_LOG`, then `--log-level`, then `[logging].level`, then `info`.
fn env_filter(cli_level: Option<&str>, cfg: &estop_config::Logging) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level = cli_level.or(cfg.level.as_deref()).unwrap_or("info");
    EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level '{level}'"))
}

fn file_writer(path: &Path, rotation: Option<&str>) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| eyre::eyre!("logging.file has no usable file name: {}", path.display()))?;
    let rotation = match rotation.unwrap_or("never") {
        "daily" => Rotation::DAILY,
        "hourly" => Rotation::HOURLY,
        _ => Rotation::NEVER,
    };
    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(name)
        .build(dir)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber. Hold the returned guard until exit so the
/// file sink flushes.
pub fn init(
    json: bool,
    cli_level: Option<&str>,
    cfg: &estop_config::Logging,
) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(cli_level, cfg)?;

    let (pretty, structured) = if json {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        )
    } else {
        (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
            None,
        )
    };

    let mut guard = None;
    let file_layer = match cfg.file.as_deref() {
        Some(file) => {
            let (writer, g) = file_writer(Path::new(file), cfg.rotation.as_deref())?;
            guard = Some(g);
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(structured)
        .with(file_layer)
        .try_init()
        .wrap_err("failed to install tracing subscriber")?;
    Ok(guard)
}
