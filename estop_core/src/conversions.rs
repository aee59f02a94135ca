//! `From` implementations bridging `estop_config` types to `estop_core` types.

use crate::config::OperatorCfg;

impl From<&estop_config::OperatorCfg> for OperatorCfg {
    fn from(c: &estop_config::OperatorCfg) -> Self {
        Self {
            update_rate_hz: c.update_rate,
            target_acceleration: c.target_acceleration as f32,
            target_jerk: c.target_jerk as f32,
            steering_handling_type: c.steering_handling_type,
        }
    }
}

impl From<&estop_config::Config> for OperatorCfg {
    fn from(c: &estop_config::Config) -> Self {
        (&c.operator).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_stock_tuning() {
        let cfg = estop_config::Config::default();
        let core: OperatorCfg = (&cfg).into();
        assert_eq!(core, OperatorCfg::default());
    }

    #[test]
    fn narrows_targets_to_f32() {
        let mut cfg = estop_config::OperatorCfg::default();
        cfg.target_acceleration = -2.3;
        let core: OperatorCfg = (&cfg).into();
        assert_eq!(core.target_acceleration, -2.3_f32);
    }
}
