//! `simulate`: deterministic cruise-then-stop replay on a `ManualClock`.

use crate::feed;
use estop_core::publish::RecordingPublisher;
use estop_core::{ControlCommand, EmergencyStopOperator, OperatorCfg, Stamp, StatusRecord};
use estop_traits::ManualClock;
use eyre::Result;
use serde_json::json;

/// Upstream cruise state before the stop request, and run bounds.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub speed: f32,
    pub acceleration: f32,
    pub steer: f32,
    pub cruise_ticks: u32,
    pub max_ticks: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub tick: usize,
    pub command: ControlCommand,
    pub status: StatusRecord,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub samples: Vec<Sample>,
    pub armed_at: Stamp,
    /// Stamp of the first operating command with zero speed.
    pub stopped_at: Option<Stamp>,
    pub operating_ticks: u32,
    /// Distance covered while operating, commanded speed held over each period.
    pub distance_m: f64,
}

impl Report {
    pub fn time_to_stop_s(&self) -> Option<f64> {
        self.stopped_at.map(|s| s.seconds_since(self.armed_at))
    }
}

pub fn simulate(cfg: &OperatorCfg, sc: &Scenario) -> Result<Report> {
    let clock = ManualClock::new();
    let commands = RecordingPublisher::<ControlCommand>::new();
    let statuses = RecordingPublisher::<StatusRecord>::new();
    let mut op = EmergencyStopOperator::builder()
        .with_config(cfg.clone())
        .with_clock(clock.clone())
        .with_command_publisher(commands.clone())
        .with_status_publisher(statuses.clone())
        .build()?;
    let period = cfg.period();
    let dt = period.as_secs_f64();

    for _ in 0..sc.cruise_ticks {
        clock.advance(period);
        let now = op.now();
        op.on_control_command(ControlCommand::cruise(now, sc.speed, sc.acceleration, sc.steer));
        op.on_tick();
    }

    let armed_at = op.now();
    op.operate(true);

    let mut stopped_at = None;
    let mut operating_ticks = 0;
    let mut distance_m = 0.0;
    while operating_ticks < sc.max_ticks {
        clock.advance(period);
        let (cmd, _) = op.on_tick();
        operating_ticks += 1;
        distance_m += f64::from(cmd.longitudinal.speed) * dt;
        if cmd.longitudinal.speed <= 0.0 {
            stopped_at = Some(cmd.stamp);
            break;
        }
    }
    if stopped_at.is_none() {
        tracing::warn!(operating_ticks, "vehicle did not stop within the tick limit");
    }

    let samples = commands
        .messages()
        .into_iter()
        .zip(statuses.messages())
        .enumerate()
        .map(|(tick, (command, status))| Sample {
            tick,
            command,
            status,
        })
        .collect();

    Ok(Report {
        samples,
        armed_at,
        stopped_at,
        operating_ticks,
        distance_m,
    })
}

pub fn print_json(report: &Report) {
    for s in &report.samples {
        let mut cmd = feed::command_json(&s.command);
        cmd["tick"] = json!(s.tick);
        println!("{cmd}");
        let mut status = feed::status_json(&s.status);
        status["tick"] = json!(s.tick);
        println!("{status}");
    }
    println!(
        "{}",
        json!({
            "topic": "summary",
            "stopped": report.stopped_at.is_some(),
            "armed_at": report.armed_at.as_secs_f64(),
            "time_to_stop_s": report.time_to_stop_s(),
            "operating_ticks": report.operating_ticks,
            "distance_m": report.distance_m,
        })
    );
}

pub fn print_table(report: &Report) {
    println!(
        "{:>5}  {:>8}  {:<9}  {:>8}  {:>7}  {:>7}  {:>7}",
        "tick", "t[s]", "state", "speed", "accel", "jerk", "steer"
    );
    for s in &report.samples {
        let lon = &s.command.longitudinal;
        println!(
            "{:>5}  {:>8.3}  {:<9}  {:>8.3}  {:>7.3}  {:>7.3}  {:>7.3}",
            s.tick,
            s.command.stamp.as_secs_f64(),
            s.status.state,
            lon.speed,
            lon.acceleration,
            lon.jerk,
            s.command.lateral.steering_tire_angle
        );
    }
    match report.time_to_stop_s() {
        Some(t) => println!(
            "Stopped in {t:.3} s ({} ticks), distance {:.2} m",
            report.operating_ticks, report.distance_m
        ),
        None => println!(
            "Not stopped after {} ticks, distance {:.2} m",
            report.operating_ticks, report.distance_m
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estop_core::OperatorState;

    fn scenario(speed: f32) -> Scenario {
        Scenario {
            speed,
            acceleration: 0.0,
            steer: 0.1,
            cruise_ticks: 3,
            max_ticks: 10_000,
        }
    }

    #[test]
    fn stock_tuning_stops_from_ten_mps() {
        let report = simulate(&OperatorCfg::default(), &scenario(10.0)).unwrap();
        let t = report.time_to_stop_s().expect("should stop");
        // Jerk phase ~1.67 s, then constant -2.5 m/s^2; discrete ticks lag by one period
        assert!((4.5..5.5).contains(&t), "time to stop {t}");
        assert!((25.0..32.0).contains(&report.distance_m), "distance {}", report.distance_m);
    }

    #[test]
    fn samples_cover_cruise_then_ramp() {
        let report = simulate(&OperatorCfg::default(), &scenario(10.0)).unwrap();
        let n = report.samples.len();
        assert_eq!(n, 3 + report.operating_ticks as usize);
        assert!(report.samples[..3].iter().all(|s| s.status.state == OperatorState::Available));
        assert!(report.samples[3..].iter().all(|s| s.status.state == OperatorState::Operating));

        let ramp: Vec<_> = report.samples[3..].iter().map(|s| s.command).collect();
        for w in ramp.windows(2) {
            assert!(w[1].longitudinal.speed <= w[0].longitudinal.speed);
            assert!(w[1].longitudinal.acceleration <= w[0].longitudinal.acceleration);
        }
        let last = ramp.last().unwrap();
        assert_eq!(last.longitudinal.speed, 0.0);
        assert_eq!(last.longitudinal.acceleration, -2.5);
        assert_eq!(last.longitudinal.jerk, 0.0);
        assert!(ramp.iter().all(|c| c.lateral.steering_tire_angle == 0.1));
    }

    #[test]
    fn zero_floor_never_stops_and_respects_tick_limit() {
        let cfg = OperatorCfg {
            target_acceleration: 0.0,
            target_jerk: 0.0,
            ..OperatorCfg::default()
        };
        let sc = Scenario {
            max_ticks: 50,
            ..scenario(5.0)
        };
        let report = simulate(&cfg, &sc).unwrap();
        assert!(report.stopped_at.is_none());
        assert_eq!(report.operating_ticks, 50);
        assert_eq!(report.samples.last().unwrap().command.longitudinal.speed, 5.0);
    }

    #[test]
    fn standstill_stops_on_first_operating_tick() {
        let report = simulate(&OperatorCfg::default(), &scenario(0.0)).unwrap();
        assert_eq!(report.operating_ticks, 1);
        assert_eq!(report.distance_m, 0.0);
    }
}
