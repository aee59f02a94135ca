//! Single-consumer event loop hosting an `EmergencyStopOperator`.
//!
//! Upstream commands, operate requests, and ticks are all tagged `Event`s on
//! one FIFO channel drained by one thread, so handlers never interleave and a
//! request enqueued before a tick is applied before that tick runs.
use crossbeam_channel as xch;
use estop_traits::Publisher;
use std::ops::ControlFlow;

use crate::core::EmergencyStopOperator;
use crate::error::{OperatorError, Result};
use crate::status::{OperateResponse, StatusRecord};
use crate::types::ControlCommand;

#[derive(Debug)]
pub enum Event {
    /// New driving command from the normal stack.
    ControlCommand(ControlCommand),
    /// Arm/release request; the response is sent on `reply` when present.
    Operate {
        operate: bool,
        reply: Option<xch::Sender<OperateResponse>>,
    },
    /// One control period elapsed.
    Tick,
    /// Stop the loop and hand the operator back.
    Shutdown,
}

/// Route one event to its handler.
pub fn dispatch<CP, SP>(operator: &mut EmergencyStopOperator<CP, SP>, event: Event) -> ControlFlow<()>
where
    CP: Publisher<ControlCommand>,
    SP: Publisher<StatusRecord>,
{
    match event {
        Event::ControlCommand(cmd) => operator.on_control_command(cmd),
        Event::Operate { operate, reply } => {
            let response = operator.operate(operate);
            if let Some(tx) = reply
                && tx.send(response).is_err()
            {
                tracing::debug!(operate, "operate requester went away before the reply");
            }
        }
        Event::Tick => {
            operator.on_tick();
        }
        Event::Shutdown => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

/// Cloneable sender side of the event loop.
#[derive(Debug, Clone)]
pub struct OperatorHandle {
    tx: xch::Sender<Event>,
}

impl OperatorHandle {
    fn send(&self, event: Event) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| eyre::Report::new(OperatorError::Disconnected))
    }

    /// Deliver an upstream driving command.
    pub fn submit_control_command(&self, cmd: ControlCommand) -> Result<()> {
        self.send(Event::ControlCommand(cmd))
    }

    /// Arm or release, waiting for the operator's response.
    pub fn operate(&self, operate: bool) -> Result<OperateResponse> {
        let (reply_tx, reply_rx) = xch::bounded(1);
        self.send(Event::Operate {
            operate,
            reply: Some(reply_tx),
        })?;
        reply_rx
            .recv()
            .map_err(|_| eyre::Report::new(OperatorError::Disconnected))
    }

    /// Request one tick.
    pub fn tick(&self) -> Result<()> {
        self.send(Event::Tick)
    }

    /// Ask the loop to stop after draining what is already queued.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Event::Shutdown)
    }
}

/// Owns the loop thread. Dropping it shuts the loop down and joins.
pub struct EventLoop<CP, SP> {
    tx: xch::Sender<Event>,
    join_handle: Option<std::thread::JoinHandle<EmergencyStopOperator<CP, SP>>>,
}

impl<CP, SP> EventLoop<CP, SP>
where
    CP: Publisher<ControlCommand> + Send + 'static,
    SP: Publisher<StatusRecord> + Send + 'static,
{
    /// Move `operator` onto a dedicated thread and start draining events.
    pub fn spawn(mut operator: EmergencyStopOperator<CP, SP>) -> Self {
        let (tx, rx) = xch::unbounded::<Event>();
        let join_handle = std::thread::spawn(move || {
            tracing::debug!("operator event loop started");
            for event in rx.iter() {
                if dispatch(&mut operator, event).is_break() {
                    break;
                }
            }
            tracing::debug!(state = %operator.state(), "operator event loop exiting");
            operator
        });
        Self {
            tx,
            join_handle: Some(join_handle),
        }
    }
}

impl<CP, SP> EventLoop<CP, SP> {
    pub fn handle(&self) -> OperatorHandle {
        OperatorHandle {
            tx: self.tx.clone(),
        }
    }

    /// Shut down and return the operator for inspection.
    pub fn join(mut self) -> Result<EmergencyStopOperator<CP, SP>> {
        // The loop may already be gone if it was shut down through a handle.
        let _ = self.tx.send(Event::Shutdown);
        let handle = self
            .join_handle
            .take()
            .ok_or_else(|| eyre::Report::new(OperatorError::Disconnected))?;
        handle
            .join()
            .map_err(|_| eyre::eyre!("operator event loop panicked"))
    }
}

impl<CP, SP> Drop for EventLoop<CP, SP> {
    fn drop(&mut self) {
        let _ = self.tx.send(Event::Shutdown);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(_) => tracing::trace!("operator event loop joined"),
                Err(e) => tracing::warn!(?e, "operator event loop panicked during shutdown"),
            }
        }
    }
}
