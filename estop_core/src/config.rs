//! Runtime configuration for the operator.
//!
//! Separate from the TOML-deserialized config in `estop_config`; see
//! `conversions` for the mapping.

use std::time::Duration;

use crate::error::BuildError;

/// Ramp tuning and loop rate. Read-only once the operator is built.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorCfg {
    /// Tick rate in Hz.
    pub update_rate_hz: u32,
    /// Deceleration floor (m/s^2, <= 0). Commanded acceleration never goes below it.
    pub target_acceleration: f32,
    /// Jerk applied while ramping toward the floor (m/s^3, <= 0).
    pub target_jerk: f32,
    /// Reserved steering handling selector; carried but inert.
    pub steering_handling_type: i32,
}

impl Default for OperatorCfg {
    fn default() -> Self {
        Self {
            update_rate_hz: 30,
            target_acceleration: -2.5,
            target_jerk: -1.5,
            steering_handling_type: 0,
        }
    }
}

impl OperatorCfg {
    /// Tick period derived from `update_rate_hz`.
    #[inline]
    pub fn period(&self) -> Duration {
        crate::util::period(self.update_rate_hz)
    }

    pub(crate) fn check(&self) -> Result<(), BuildError> {
        if self.update_rate_hz == 0 {
            return Err(BuildError::InvalidConfig("update_rate_hz must be > 0"));
        }
        if !self.target_acceleration.is_finite() || self.target_acceleration > 0.0 {
            return Err(BuildError::InvalidConfig(
                "target_acceleration must be finite and <= 0",
            ));
        }
        if !self.target_jerk.is_finite() || self.target_jerk > 0.0 {
            return Err(BuildError::InvalidConfig(
                "target_jerk must be finite and <= 0",
            ));
        }
        Ok(())
    }
}
