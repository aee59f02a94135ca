#![no_main]
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;
use std::time::Duration;

use estop_core::{ControlCommand, OperatorCfg, Stamp, ramp};

#[derive(Debug, Arbitrary)]
struct Input {
    speed: f32,
    acceleration: f32,
    target_acceleration: f32,
    target_jerk: f32,
    has_upstream: bool,
    dts_ms: Vec<u16>,
}

fuzz_target!(|input: Input| {
    let finite = |x: f32| x.is_finite() && x.abs() < 1.0e6;
    if !(finite(input.speed)
        && finite(input.acceleration)
        && finite(input.target_acceleration)
        && finite(input.target_jerk))
    {
        return;
    }
    let cfg = OperatorCfg {
        target_acceleration: -input.target_acceleration.abs(),
        target_jerk: -input.target_jerk.abs(),
        ..OperatorCfg::default()
    };
    let mut prev = ControlCommand::cruise(Stamp::ZERO, input.speed.abs(), input.acceleration, 0.0);
    let mut t = Duration::ZERO;
    for dt in input.dts_ms.iter().take(256) {
        t += Duration::from_millis(u64::from(*dt));
        let out = ramp::compute(&prev, Stamp::from_duration(t), input.has_upstream, &cfg);
        assert!(out.longitudinal.speed >= 0.0);
        assert!(out.longitudinal.acceleration >= cfg.target_acceleration);
        prev = out;
    }
});
