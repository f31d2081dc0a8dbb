//! Transport abstraction for consumer tasks.
//!
//! Consumers drain the ring buffer and push frames to a concrete sink (UDP
//! socket, UART peripheral, file). The `Transport` trait abstracts that
//! sink so the pump logic in [`crate::consumer`] can be tested against a
//! mock and reused across platforms.
//!
//! The trait is synchronous: consumers are plain threads or preemptive
//! tasks that poll on their own cadence, and a blocking send only delays
//! the consumer that issued it, never a producer.

use crate::error::Result;

/// A frame sink driven by a consumer task.
pub trait Transport {
    /// Delivers one buffer to the sink. Must send the whole buffer or fail;
    /// partial delivery is treated as failure.
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Whether the sink can currently accept data (e.g. the network is up).
    /// Default: always ready.
    fn is_ready(&self) -> bool {
        true
    }

    /// Tears down and re-establishes the sink after a send failure (close
    /// and reopen a socket, reset a peripheral). Default: no-op.
    fn reset(&mut self) {}
}
