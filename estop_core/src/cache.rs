//! Runtime cache shared by the intake, the request handler, and the tick.

use crate::types::{ControlCommand, LateralCommand, Stamp};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeCache {
    // Valid only when `has_upstream_command` is set
    last_upstream_command: ControlCommand,
    has_upstream_command: bool,
    lateral_hold_at_arm: LateralCommand,
    previous_output_command: ControlCommand,
}

impl RuntimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent upstream command, if one was ever observed.
    pub fn last_upstream_command(&self) -> Option<&ControlCommand> {
        self.has_upstream_command
            .then_some(&self.last_upstream_command)
    }

    #[inline]
    pub fn has_upstream_command(&self) -> bool {
        self.has_upstream_command
    }

    /// Steering captured when the operator was last armed.
    #[inline]
    pub fn lateral_hold_at_arm(&self) -> &LateralCommand {
        &self.lateral_hold_at_arm
    }

    /// Command the next tick starts from (and passes through while available).
    #[inline]
    pub fn previous_output_command(&self) -> &ControlCommand {
        &self.previous_output_command
    }

    /// Record an upstream command. It also becomes the starting point for the
    /// next tick, so passthrough mirrors it and a later ramp starts from it.
    pub(crate) fn observe_upstream(&mut self, cmd: ControlCommand) {
        self.last_upstream_command = cmd;
        self.previous_output_command = cmd;
        self.has_upstream_command = true;
    }

    /// Snapshot the steering to hold: the upstream lateral command when one
    /// exists, neutral otherwise.
    pub(crate) fn capture_lateral_hold(&mut self, now: Stamp) -> LateralCommand {
        self.lateral_hold_at_arm = if self.has_upstream_command {
            self.last_upstream_command.lateral
        } else {
            LateralCommand::neutral(now)
        };
        self.lateral_hold_at_arm
    }

    pub(crate) fn set_previous_output(&mut self, cmd: ControlCommand) {
        self.previous_output_command = cmd;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn starts_empty() {
        let cache = RuntimeCache::new();
        assert!(!cache.has_upstream_command());
        assert!(cache.last_upstream_command().is_none());
        assert_eq!(*cache.previous_output_command(), ControlCommand::default());
    }

    #[test]
    fn neutral_hold_without_upstream() {
        let mut cache = RuntimeCache::new();
        let now = Stamp::from_duration(Duration::from_millis(10));
        let hold = cache.capture_lateral_hold(now);
        assert_eq!(hold, LateralCommand::neutral(now));
    }

    #[test]
    fn hold_copies_upstream_lateral() {
        let mut cache = RuntimeCache::new();
        let cmd = ControlCommand::cruise(Stamp::ZERO, 10.0, 0.0, 0.3);
        cache.observe_upstream(cmd);
        let hold = cache.capture_lateral_hold(Stamp::from_duration(Duration::from_secs(1)));
        assert_eq!(hold, cmd.lateral);
        assert_eq!(cache.previous_output_command(), &cmd);
    }
}
