//! `run`: host the operator live on a wall clock.
//!
//! Threads:
//! - stdin reader: parses input lines and submits events through an `OperatorHandle`
//! - event loop: owns the operator (see `estop_core::runner`)
//! - ticker: one `Tick` per period
//! - this thread: writes output lines to stdout and watches stop conditions

use crate::feed::{self, InputEvent, JsonLinePublisher};
use estop_core::{EmergencyStopOperator, EventLoop, OperatorCfg, OperatorHandle, Stamp, Ticker};
use estop_traits::{Clock, MonotonicClock};
use eyre::{Result, WrapErr};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const POLL: Duration = Duration::from_millis(5);

fn spawn_reader(
    handle: OperatorHandle,
    out: crossbeam_channel::Sender<Value>,
    epoch: Instant,
    input_closed: Arc<AtomicBool>,
) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            };
            let event = match feed::parse_line(&line) {
                Ok(Some(ev)) => ev,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping input line");
                    continue;
                }
            };
            let sent = match event {
                InputEvent::ControlCmd {
                    speed,
                    acceleration,
                    jerk,
                    steering_tire_angle,
                    steering_tire_rotation_rate,
                } => {
                    let stamp = Stamp::from_instant(epoch, Instant::now());
                    handle.submit_control_command(feed::to_command(
                        stamp,
                        speed,
                        acceleration,
                        jerk,
                        steering_tire_angle,
                        steering_tire_rotation_rate,
                    ))
                }
                InputEvent::Operate { operate } => handle.operate(operate).map(|resp| {
                    let _ = out.send(feed::operate_response_json(operate, &resp));
                }),
            };
            if sent.is_err() {
                tracing::debug!("operator loop gone, stdin reader exiting");
                break;
            }
        }
        input_closed.store(true, Ordering::Relaxed);
        tracing::debug!("stdin closed");
    });
}

fn write_line(out: &mut impl Write, v: &Value) -> Result<()> {
    writeln!(out, "{v}")
        .and_then(|()| out.flush())
        .wrap_err("failed to write output line")
}

pub fn run(cfg: &OperatorCfg, duration_ms: Option<u64>) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let s = shutdown.clone();
        ctrlc::set_handler(move || {
            s.store(true, Ordering::Relaxed);
        })
        .wrap_err("failed to install Ctrl-C handler")?;
    }

    let (out_tx, out_rx) = crossbeam_channel::unbounded::<Value>();
    let clock = MonotonicClock::new();
    let epoch = clock.now();
    let operator = EmergencyStopOperator::builder()
        .with_config(cfg.clone())
        .with_clock(clock)
        .with_epoch(epoch)
        .with_command_publisher(JsonLinePublisher::new(out_tx.clone()))
        .with_status_publisher(JsonLinePublisher::new(out_tx.clone()))
        .build()?;

    tracing::info!(
        update_rate_hz = cfg.update_rate_hz,
        target_acceleration = cfg.target_acceleration,
        target_jerk = cfg.target_jerk,
        "operator started"
    );

    let ev = EventLoop::spawn(operator);
    let input_closed = Arc::new(AtomicBool::new(false));
    spawn_reader(ev.handle(), out_tx, epoch, input_closed.clone());
    let ticker = Ticker::spawn(ev.handle(), cfg.update_rate_hz, MonotonicClock::new());

    let deadline = duration_ms.map(|ms| Instant::now() + Duration::from_millis(ms));
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    loop {
        match out_rx.recv_timeout(POLL) {
            Ok(v) => write_line(&mut out, &v)?,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("interrupted");
            break;
        }
        match deadline {
            Some(d) if Instant::now() >= d => break,
            None if input_closed.load(Ordering::Relaxed) => break,
            _ => {}
        }
    }

    let ticks = ticker.ticks();
    drop(ticker);
    let operator = ev.join()?;
    for v in out_rx.try_iter() {
        write_line(&mut out, &v)?;
    }
    tracing::info!(
        ticks,
        state = %operator.state(),
        publish_failures = operator.publish_failures(),
        "operator stopped"
    );
    Ok(())
}
