use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use estop_core::publish::NullPublisher;
use estop_core::{ControlCommand, EmergencyStopOperator, OperatorCfg, Stamp, ramp};
use estop_traits::ManualClock;

fn bench_ramp_step(c: &mut Criterion) {
    let cfg = OperatorCfg::default();
    let prev = ControlCommand::cruise(Stamp::ZERO, 20.0, -0.7, 0.05);
    let now = Stamp::from_duration(Duration::from_micros(33_333));
    c.bench_function("ramp_compute", |b| {
        b.iter(|| ramp::compute(black_box(&prev), black_box(now), true, black_box(&cfg)))
    });
}

fn bench_operating_tick(c: &mut Criterion) {
    let clock = ManualClock::new();
    let mut op = EmergencyStopOperator::builder()
        .with_clock(clock.clone())
        .with_command_publisher(NullPublisher)
        .with_status_publisher(NullPublisher)
        .build()
        .expect("operator build");
    let now = op.now();
    op.on_control_command(ControlCommand::cruise(now, 25.0, 0.0, 0.0));
    op.operate(true);
    c.bench_function("operating_tick", |b| {
        b.iter(|| {
            clock.advance(Duration::from_micros(33_333));
            black_box(op.on_tick())
        })
    });
}

criterion_group!(benches, bench_ramp_step, bench_operating_tick);
criterion_main!(benches);
