//! Periodic tick source.
//!
//! Spawns a thread that sends `Event::Tick` to an operator loop once per
//! period. Deadlines are absolute (start + n * period) so a slow iteration
//! does not shift every later tick.
//!
//! Each `Ticker` owns exactly one thread, shut down and joined on drop.
use estop_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::runner::OperatorHandle;

pub struct Ticker {
    ticks: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<C: Clock + Send + 'static>(handle: OperatorHandle, hz: u32, clock: C) -> Self {
        let period = crate::util::period(hz);
        Self::spawn_with_period(handle, period, clock)
    }

    pub fn spawn_with_period<C: Clock + Send + 'static>(
        handle: OperatorHandle,
        period: Duration,
        clock: C,
    ) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let ticks = Arc::new(AtomicU64::new(0));
        let ticks_clone = ticks.clone();

        let join_handle = std::thread::spawn(move || {
            let mut deadline = clock.now();
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("ticker received shutdown signal");
                    break;
                }

                if handle.tick().is_err() {
                    tracing::debug!("operator loop disconnected, ticker exiting");
                    break;
                }
                ticks_clone.fetch_add(1, Ordering::Relaxed);

                deadline += period;
                let now = clock.now();
                if now > deadline {
                    // Behind schedule: resynchronise instead of bursting.
                    tracing::trace!(late_us = (now - deadline).as_micros() as u64, "tick overrun");
                    deadline = now;
                }

                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(deadline.saturating_duration_since(now));
            }
            tracing::trace!("ticker thread exiting cleanly");
        });

        Self {
            ticks,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Ticks delivered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("ticker thread joined successfully"),
                Err(e) => tracing::warn!(?e, "ticker thread panicked during shutdown"),
            }
        }
    }
}
