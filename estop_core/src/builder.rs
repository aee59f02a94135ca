//! Type-state builder for `EmergencyStopOperator`.
//!
//! `build()` only exists once both publishers have been provided; the
//! publisher slots start out as `Missing`.

use std::sync::Arc;
use std::time::Instant;

use estop_traits::Publisher;
use estop_traits::clock::{Clock, MonotonicClock};

use crate::cache::RuntimeCache;
use crate::config::OperatorCfg;
use crate::core::EmergencyStopOperator;
use crate::error::Result;
use crate::state::StateMachine;
use crate::status::StatusRecord;
use crate::types::ControlCommand;

/// Placeholder for a publisher that has not been set yet.
#[derive(Debug, Default)]
pub struct Missing;

pub struct OperatorBuilder<CP, SP> {
    cfg: Option<OperatorCfg>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    epoch: Option<Instant>,
    command_publisher: CP,
    status_publisher: SP,
}

impl Default for OperatorBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            cfg: None,
            clock: None,
            epoch: None,
            command_publisher: Missing,
            status_publisher: Missing,
        }
    }
}

impl EmergencyStopOperator<Missing, Missing> {
    /// Start building an operator.
    pub fn builder() -> OperatorBuilder<Missing, Missing> {
        OperatorBuilder::default()
    }
}

impl<CP, SP> OperatorBuilder<CP, SP> {
    pub fn with_config(mut self, cfg: OperatorCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }

    /// Inject a clock (e.g. `ManualClock` in tests). Defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Use `epoch` as `Stamp::ZERO`. Defaults to the clock's time at build.
    ///
    /// Set this when the host stamps upstream commands itself.
    pub fn with_epoch(mut self, epoch: Instant) -> Self {
        self.epoch = Some(epoch);
        self
    }

    pub fn with_command_publisher<P>(self, publisher: P) -> OperatorBuilder<P, SP>
    where
        P: Publisher<ControlCommand>,
    {
        OperatorBuilder {
            cfg: self.cfg,
            clock: self.clock,
            epoch: self.epoch,
            command_publisher: publisher,
            status_publisher: self.status_publisher,
        }
    }

    pub fn with_status_publisher<P>(self, publisher: P) -> OperatorBuilder<CP, P>
    where
        P: Publisher<StatusRecord>,
    {
        OperatorBuilder {
            cfg: self.cfg,
            clock: self.clock,
            epoch: self.epoch,
            command_publisher: self.command_publisher,
            status_publisher: publisher,
        }
    }
}

impl<CP, SP> OperatorBuilder<CP, SP>
where
    CP: Publisher<ControlCommand>,
    SP: Publisher<StatusRecord>,
{
    /// Validate the config and assemble the operator in the Available state.
    pub fn build(self) -> Result<EmergencyStopOperator<CP, SP>> {
        let cfg = self.cfg.unwrap_or_default();
        cfg.check().map_err(eyre::Report::new)?;

        let clock: Arc<dyn Clock + Send + Sync> = match self.clock {
            Some(c) => c,
            None => Arc::new(MonotonicClock::new()),
        };
        let epoch = self.epoch.unwrap_or_else(|| clock.now());

        tracing::debug!(
            update_rate_hz = cfg.update_rate_hz,
            target_acceleration = cfg.target_acceleration,
            target_jerk = cfg.target_jerk,
            steering_handling_type = cfg.steering_handling_type,
            "operator built"
        );

        Ok(EmergencyStopOperator {
            cfg,
            machine: StateMachine::new(),
            cache: RuntimeCache::new(),
            clock,
            epoch,
            command_publisher: self.command_publisher,
            status_publisher: self.status_publisher,
            publish_failures: 0,
        })
    }
}
