use std::time::Duration;

use estop_core::publish::NullPublisher;
use estop_core::{ControlCommand, EmergencyStopOperator, OperatorCfg, ramp};
use estop_traits::ManualClock;
use proptest::prelude::*;

prop_compose! {
    fn cfg_strategy()(
        target_acceleration in -8.0f32..=0.0,
        target_jerk in -6.0f32..=0.0,
        update_rate_hz in 1u32..200,
    ) -> OperatorCfg {
        OperatorCfg { update_rate_hz, target_acceleration, target_jerk, steering_handling_type: 0 }
    }
}

prop_compose! {
    fn start_strategy()(
        speed in 0.0f32..60.0,
        acceleration in -3.0f32..3.0,
        steer in -0.6f32..0.6,
    ) -> (f32, f32, f32) {
        (speed, acceleration, steer)
    }
}

proptest! {
    #[test]
    fn ramp_invariants_hold_over_random_tick_sequences(
        cfg in cfg_strategy(),
        (speed, acceleration, steer) in start_strategy(),
        dts_ms in prop::collection::vec(0u64..400, 1..120),
    ) {
        let clock = ManualClock::new();
        let mut op = EmergencyStopOperator::builder()
            .with_config(cfg.clone())
            .with_clock(clock.clone())
            .with_command_publisher(NullPublisher)
            .with_status_publisher(NullPublisher)
            .build()
            .unwrap();
        let now = op.now();
        op.on_control_command(ControlCommand::cruise(now, speed, acceleration, steer));
        op.operate(true);

        let mut prev = *op.cache().previous_output_command();
        for dt in dts_ms {
            clock.advance(Duration::from_millis(dt));
            let (out, _) = op.on_tick();
            let lon = out.longitudinal;

            // Speed never negative
            prop_assert!(lon.speed >= 0.0, "speed {}", lon.speed);
            // Never below the floor
            prop_assert!(lon.acceleration >= cfg.target_acceleration,
                "accel {} < floor {}", lon.acceleration, cfg.target_acceleration);
            // Non-increasing toward the floor (or already on it)
            prop_assert!(lon.acceleration <= prev.longitudinal.acceleration
                || lon.acceleration == cfg.target_acceleration);
            // Jerk reflects the previous tick's acceleration
            if prev.longitudinal.acceleration == cfg.target_acceleration {
                prop_assert_eq!(lon.jerk, 0.0);
            } else {
                prop_assert_eq!(lon.jerk, cfg.target_jerk);
            }
            // Steering is held
            prop_assert_eq!(out.lateral, prev.lateral);
            prev = out;
        }
    }

    #[test]
    fn floor_is_reached_exactly(cfg in cfg_strategy(), acceleration in -3.0f32..3.0) {
        prop_assume!(cfg.target_jerk < -1e-3);
        let prev = ControlCommand::cruise(estop_core::Stamp::ZERO, 10.0, acceleration, 0.0);
        // Long enough for any start in range to bottom out
        let dt = Duration::from_secs_f64(f64::from((acceleration - cfg.target_acceleration).abs() / -cfg.target_jerk) + 1.0);
        let out = ramp::compute(&prev, estop_core::Stamp::from_duration(dt), true, &cfg);
        prop_assert_eq!(out.longitudinal.acceleration, cfg.target_acceleration);
        let next = ramp::compute(&out, estop_core::Stamp::from_duration(dt * 2), true, &cfg);
        prop_assert_eq!(next.longitudinal.jerk, 0.0);
    }

    #[test]
    fn bootstrap_is_deterministic(cfg in cfg_strategy(), ms in 0u64..10_000) {
        let prev = ControlCommand::cruise(estop_core::Stamp::ZERO, 25.0, 1.0, 0.3);
        let now = estop_core::Stamp::from_duration(Duration::from_millis(ms));
        let out = ramp::compute(&prev, now, false, &cfg);
        prop_assert_eq!(out.longitudinal.speed, 0.0);
        prop_assert_eq!(out.longitudinal.acceleration, cfg.target_acceleration);
        prop_assert_eq!(out.longitudinal.jerk, 0.0);
        prop_assert_eq!(out.lateral.steering_tire_angle, 0.0);
        prop_assert_eq!(out.lateral.steering_tire_rotation_rate, 0.0);
    }
}
