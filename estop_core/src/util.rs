//! Common time/period helpers for estop_core.

use std::time::Duration;

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Compute the period in microseconds for a given rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}

/// Tick period for a rate in Hz, at microsecond resolution.
#[inline]
pub fn period(hz: u32) -> Duration {
    Duration::from_micros(period_us(hz))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_for_common_rates() {
        assert_eq!(period_us(1), 1_000_000);
        assert_eq!(period_us(30), 33_333);
        assert_eq!(period_us(50), 20_000);
    }

    #[test]
    fn zero_rate_is_clamped() {
        assert_eq!(period_us(0), 1_000_000);
    }

    #[test]
    fn very_high_rate_floors_at_one_micro() {
        assert_eq!(period_us(u32::MAX), 1);
        assert_eq!(period(u32::MAX), Duration::from_micros(1));
    }
}
