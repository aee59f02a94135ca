//! Ready-made `Publisher` implementations.

use crossbeam_channel as xch;
use estop_traits::Publisher;
use std::sync::{Arc, Mutex};

use crate::error::OperatorError;

/// Forwards every message into a channel; a disconnected receiver is an error.
#[derive(Debug, Clone)]
pub struct ChannelPublisher<T> {
    tx: xch::Sender<T>,
}

impl<T> ChannelPublisher<T> {
    pub fn new(tx: xch::Sender<T>) -> Self {
        Self { tx }
    }

    /// Unbounded publisher paired with its receiver.
    pub fn unbounded() -> (Self, xch::Receiver<T>) {
        let (tx, rx) = xch::unbounded();
        (Self { tx }, rx)
    }
}

impl<T: Clone + Send + 'static> Publisher<T> for ChannelPublisher<T> {
    fn publish(&mut self, msg: &T) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.tx
            .try_send(msg.clone())
            .map_err(|e| OperatorError::Publish(e.to_string()))?;
        Ok(())
    }
}

/// Keeps every message in memory. Clones share the same log.
#[derive(Debug)]
pub struct RecordingPublisher<T> {
    log: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for RecordingPublisher<T> {
    fn default() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> Clone for RecordingPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
        }
    }
}

impl<T: Clone> RecordingPublisher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far.
    pub fn messages(&self) -> Vec<T> {
        self.log.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<T> {
        self.log.lock().ok().and_then(|g| g.last().cloned())
    }

    pub fn len(&self) -> usize {
        self.log.lock().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Publisher<T> for RecordingPublisher<T> {
    fn publish(&mut self, msg: &T) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut log = self
            .log
            .lock()
            .map_err(|_| OperatorError::Publish("recorder poisoned".into()))?;
        log.push(msg.clone());
        Ok(())
    }
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl<T> Publisher<T> for NullPublisher {
    fn publish(&mut self, _msg: &T) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}
