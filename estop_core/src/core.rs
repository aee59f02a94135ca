//! `EmergencyStopOperator`: the three handlers (upstream intake, operate
//! request, tick) over one state machine and one runtime cache.
//!
//! Handlers take `&mut self`; whoever hosts the operator serializes them
//! (see `runner::EventLoop`).

use std::sync::Arc;
use std::time::Instant;

use estop_traits::Publisher;
use estop_traits::clock::Clock;

use crate::cache::RuntimeCache;
use crate::config::OperatorCfg;
use crate::error::OperatorError;
use crate::ramp;
use crate::state::StateMachine;
use crate::status::{OperateResponse, OperatorState, StatusRecord};
use crate::types::{ControlCommand, Stamp};

pub struct EmergencyStopOperator<CP, SP> {
    pub(crate) cfg: OperatorCfg,
    pub(crate) machine: StateMachine,
    pub(crate) cache: RuntimeCache,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    // Stamps are measured from here
    pub(crate) epoch: Instant,
    pub(crate) command_publisher: CP,
    pub(crate) status_publisher: SP,
    pub(crate) publish_failures: u64,
}

impl<CP, SP> core::fmt::Debug for EmergencyStopOperator<CP, SP> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EmergencyStopOperator")
            .field("state", &self.machine.state())
            .field("has_upstream_command", &self.cache.has_upstream_command())
            .field("cfg", &self.cfg)
            .finish()
    }
}

impl<CP, SP> EmergencyStopOperator<CP, SP>
where
    CP: Publisher<ControlCommand>,
    SP: Publisher<StatusRecord>,
{
    /// Upstream command intake. Ignored while operating.
    pub fn on_control_command(&mut self, cmd: ControlCommand) {
        if self.machine.is_operating() {
            tracing::debug!(
                speed = cmd.longitudinal.speed,
                "upstream command discarded while operating"
            );
            return;
        }
        self.cache.observe_upstream(cmd);
    }

    /// Arm (`true`) or release (`false`). Always succeeds.
    pub fn operate(&mut self, operate: bool) -> OperateResponse {
        let now = self.now();
        if operate {
            let hold = self.cache.capture_lateral_hold(now);
            let t = self.machine.request(true);
            tracing::info!(
                from = %t.from,
                has_upstream = self.cache.has_upstream_command(),
                steering_tire_angle = hold.steering_tire_angle,
                "emergency stop armed"
            );
        } else {
            let t = self.machine.request(false);
            if t.changed() {
                tracing::info!("emergency stop released");
            }
        }
        OperateResponse { success: true }
    }

    /// One control period: emit the command, then the status.
    ///
    /// Operating: synthesize the next ramp step and remember it.
    /// Available: re-emit the previous command unchanged.
    pub fn on_tick(&mut self) -> (ControlCommand, StatusRecord) {
        let now = self.now();
        let state = self.machine.state();
        let command = match state {
            OperatorState::Operating => {
                let out = ramp::compute(
                    self.cache.previous_output_command(),
                    now,
                    self.cache.has_upstream_command(),
                    &self.cfg,
                );
                self.cache.set_previous_output(out);
                out
            }
            OperatorState::Available => *self.cache.previous_output_command(),
        };
        tracing::trace!(
            state = %state,
            speed = command.longitudinal.speed,
            acceleration = command.longitudinal.acceleration,
            jerk = command.longitudinal.jerk,
            "tick"
        );

        if let Err(e) = self.command_publisher.publish(&command) {
            self.note_publish_failure("control_cmd", &*e);
        }
        let status = StatusRecord { stamp: now, state };
        if let Err(e) = self.status_publisher.publish(&status) {
            self.note_publish_failure("status", &*e);
        }
        (command, status)
    }

    fn note_publish_failure(&mut self, topic: &'static str, e: &(dyn std::error::Error + 'static)) {
        self.publish_failures = self.publish_failures.saturating_add(1);
        let err = OperatorError::Publish(e.to_string());
        tracing::warn!(topic, error = %err, "publish failed; continuing");
    }
}

impl<CP, SP> EmergencyStopOperator<CP, SP> {
    #[inline]
    pub fn state(&self) -> OperatorState {
        self.machine.state()
    }

    /// Status as it would be published right now.
    pub fn status(&self) -> StatusRecord {
        StatusRecord {
            stamp: self.now(),
            state: self.machine.state(),
        }
    }

    /// Read-only view of the runtime cache.
    #[inline]
    pub fn cache(&self) -> &RuntimeCache {
        &self.cache
    }

    #[inline]
    pub fn config(&self) -> &OperatorCfg {
        &self.cfg
    }

    /// Instant that `Stamp::ZERO` corresponds to.
    #[inline]
    pub fn epoch(&self) -> Instant {
        self.epoch
    }

    /// Current time on the operator's clock.
    #[inline]
    pub fn now(&self) -> Stamp {
        Stamp::from_instant(self.epoch, self.clock.now())
    }

    /// Number of publish calls that returned an error.
    #[inline]
    pub fn publish_failures(&self) -> u64 {
        self.publish_failures
    }

    pub fn command_publisher(&self) -> &CP {
        &self.command_publisher
    }

    pub fn status_publisher(&self) -> &SP {
        &self.status_publisher
    }
}
