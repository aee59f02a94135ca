pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Outbound feed for one message type (control commands, status records).
///
/// Implementations own the transport; the operator only hands over a
/// reference once per tick and never retries.
pub trait Publisher<T> {
    fn publish(&mut self, msg: &T) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T, P: Publisher<T> + ?Sized> Publisher<T> for Box<P> {
    fn publish(&mut self, msg: &T) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).publish(msg)
    }
}
