//! Jerk-limited deceleration ramp.
//!
//! Given the command emitted on the previous tick, integrate one step forward:
//!
//! ```text
//! dt    = max(now - prev.stamp, 0)
//! speed = max(prev.speed + prev.accel * dt, 0)
//! accel = max(prev.accel + target_jerk * dt, target_accel)
//! jerk  = 0 if prev.accel == target_accel else target_jerk
//! ```
//!
//! The jerk test looks at the *previous* acceleration, so the first tick that
//! lands on the floor still reports `target_jerk`; zero jerk shows up one tick
//! later. Steering is carried over untouched.
//!
//! Integration runs in `f64` and the result is narrowed to `f32`. The floor is
//! applied against the `f32` target widened to `f64`, so narrowing a clamped
//! value gives back the target bit for bit and the equality test above fires.

use crate::config::OperatorCfg;
use crate::types::{ControlCommand, LateralCommand, LongitudinalCommand, Stamp};

/// Next stopping command.
///
/// `has_upstream_command == false` selects the bootstrap output: standstill
/// speed, acceleration at the floor, zero jerk, neutral steering.
pub fn compute(
    previous: &ControlCommand,
    now: Stamp,
    has_upstream_command: bool,
    cfg: &OperatorCfg,
) -> ControlCommand {
    if !has_upstream_command {
        return bootstrap(now, cfg);
    }

    let dt = now.seconds_since(previous.stamp);
    let prev = &previous.longitudinal;
    let prev_accel = f64::from(prev.acceleration);

    let speed = (f64::from(prev.speed) + prev_accel * dt).max(0.0) as f32;
    let acceleration = (prev_accel + f64::from(cfg.target_jerk) * dt)
        .max(f64::from(cfg.target_acceleration)) as f32;
    #[allow(clippy::float_cmp)]
    let jerk = if prev.acceleration == cfg.target_acceleration {
        0.0
    } else {
        cfg.target_jerk
    };

    ControlCommand {
        stamp: now,
        longitudinal: LongitudinalCommand {
            stamp: now,
            speed,
            acceleration,
            jerk,
        },
        lateral: previous.lateral,
    }
}

/// Output when no driving command has ever been observed.
pub fn bootstrap(now: Stamp, cfg: &OperatorCfg) -> ControlCommand {
    ControlCommand {
        stamp: now,
        longitudinal: LongitudinalCommand {
            stamp: now,
            speed: 0.0,
            acceleration: cfg.target_acceleration,
            jerk: 0.0,
        },
        lateral: LateralCommand::neutral(now),
    }
}
