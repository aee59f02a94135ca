#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the emergency stop operator.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section is optional; missing keys fall back to the stock tuning
//!   (30 Hz, -2.5 m/s^2, -1.5 m/s^3).
use serde::Deserialize;
use std::path::Path;

/// Longitudinal ramp tuning and loop rate.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OperatorCfg {
    /// Tick rate of the operator in Hz.
    pub update_rate: u32,
    /// Deceleration floor in m/s^2 (must be <= 0).
    pub target_acceleration: f64,
    /// Rate of deceleration onset in m/s^3 (must be <= 0).
    pub target_jerk: f64,
    /// Reserved steering handling selector. Parsed and carried, not acted on.
    pub steering_handling_type: i32,
}

impl Default for OperatorCfg {
    fn default() -> Self {
        Self {
            update_rate: 30,
            target_acceleration: -2.5,
            target_jerk: -1.5,
            steering_handling_type: 0,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub operator: OperatorCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file. Does not validate.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Operator
        if self.operator.update_rate == 0 {
            eyre::bail!("operator.update_rate must be > 0");
        }
        if self.operator.update_rate > 1_000_000 {
            eyre::bail!("operator.update_rate is unreasonably large (>1MHz)");
        }
        if !self.operator.target_acceleration.is_finite() {
            eyre::bail!("operator.target_acceleration must be finite");
        }
        if self.operator.target_acceleration > 0.0 {
            eyre::bail!("operator.target_acceleration must be <= 0.0");
        }
        if !self.operator.target_jerk.is_finite() {
            eyre::bail!("operator.target_jerk must be finite");
        }
        if self.operator.target_jerk > 0.0 {
            eyre::bail!("operator.target_jerk must be <= 0.0");
        }
        // Both are handed to the core as f32
        if self.operator.target_acceleration < f64::from(f32::MIN)
            || self.operator.target_jerk < f64::from(f32::MIN)
        {
            eyre::bail!("operator targets must fit in f32");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_stock_tuning() {
        let cfg = load_toml("").unwrap();
        assert_eq!(cfg.operator.update_rate, 30);
        assert_eq!(cfg.operator.target_acceleration, -2.5);
        assert_eq!(cfg.operator.target_jerk, -1.5);
        assert_eq!(cfg.operator.steering_handling_type, 0);
        assert!(cfg.logging.file.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = load_toml("[operator]\ntarget_jerk = -0.5\n").unwrap();
        assert_eq!(cfg.operator.target_jerk, -0.5);
        assert_eq!(cfg.operator.update_rate, 30);
    }
}
