//! Control command messages exchanged with the driving stack and the
//! actuation layer.

use std::time::{Duration, Instant};

/// Monotonic timestamp measured from the operator's clock epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp(Duration);

impl Stamp {
    pub const ZERO: Self = Self(Duration::ZERO);

    #[inline]
    pub const fn from_duration(d: Duration) -> Self {
        Self(d)
    }

    /// Stamp for `instant` relative to `epoch`; instants before the epoch map to zero.
    #[inline]
    pub fn from_instant(epoch: Instant, instant: Instant) -> Self {
        Self(instant.saturating_duration_since(epoch))
    }

    #[inline]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }

    /// Seconds elapsed since `earlier`, saturating at 0 when `earlier` is newer.
    #[inline]
    pub fn seconds_since(self, earlier: Stamp) -> f64 {
        self.0.saturating_sub(earlier.0).as_secs_f64()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LongitudinalCommand {
    pub stamp: Stamp,
    /// m/s, never negative in commands synthesized by the operator.
    pub speed: f32,
    /// m/s^2
    pub acceleration: f32,
    /// m/s^3
    pub jerk: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LateralCommand {
    pub stamp: Stamp,
    /// rad
    pub steering_tire_angle: f32,
    /// rad/s
    pub steering_tire_rotation_rate: f32,
}

impl LateralCommand {
    /// Straight-ahead, not turning.
    #[inline]
    pub const fn neutral(stamp: Stamp) -> Self {
        Self {
            stamp,
            steering_tire_angle: 0.0,
            steering_tire_rotation_rate: 0.0,
        }
    }
}

/// One complete output sample. `Default` is the zeroed command.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlCommand {
    pub stamp: Stamp,
    pub longitudinal: LongitudinalCommand,
    pub lateral: LateralCommand,
}

impl ControlCommand {
    /// A command with every stamp set to `stamp`.
    pub fn new(stamp: Stamp, longitudinal: LongitudinalCommand, lateral: LateralCommand) -> Self {
        Self {
            stamp,
            longitudinal: LongitudinalCommand {
                stamp,
                ..longitudinal
            },
            lateral: LateralCommand { stamp, ..lateral },
        }
    }

    /// Convenience constructor for a cruising command: given speed and
    /// acceleration, zero jerk, given steering.
    pub fn cruise(stamp: Stamp, speed: f32, acceleration: f32, steering_tire_angle: f32) -> Self {
        Self::new(
            stamp,
            LongitudinalCommand {
                stamp,
                speed,
                acceleration,
                jerk: 0.0,
            },
            LateralCommand {
                stamp,
                steering_tire_angle,
                steering_tire_rotation_rate: 0.0,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_since_is_exact_for_whole_seconds() {
        let a = Stamp::from_duration(Duration::from_secs(3));
        let b = Stamp::from_duration(Duration::from_secs(4));
        assert_eq!(b.seconds_since(a), 1.0);
    }

    #[test]
    fn seconds_since_clamps_negative_to_zero() {
        let a = Stamp::from_duration(Duration::from_millis(500));
        let b = Stamp::from_duration(Duration::from_millis(200));
        assert_eq!(b.seconds_since(a), 0.0);
    }

    #[test]
    fn from_instant_before_epoch_is_zero() {
        let epoch = Instant::now() + Duration::from_secs(1);
        assert_eq!(Stamp::from_instant(epoch, Instant::now()), Stamp::ZERO);
    }

    #[test]
    fn new_propagates_stamp_to_parts() {
        let s = Stamp::from_duration(Duration::from_millis(7));
        let cmd = ControlCommand::cruise(s, 3.0, 0.0, 0.1);
        assert_eq!(cmd.longitudinal.stamp, s);
        assert_eq!(cmd.lateral.stamp, s);
        assert_eq!(cmd.lateral.steering_tire_angle, 0.1);
    }
}
