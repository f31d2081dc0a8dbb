//! Lock-free multi-producer/multi-consumer byte ring.
//!
//! The buffer decouples hot-path log producers from slow transports:
//! producers append frames with a wait-free [`RingBuffer::write`], consumer
//! tasks observe committed bytes through their own [`RingReader`] without
//! touching buffer state.
//!
//! ```text
//!              fetch_add partitions the byte stream
//!  producer A ──┐
//!  producer B ──┼──▶ ┌────────────────────────────┐
//!  producer C ──┘    │        RingBuffer<N>       │
//!                    └────────────────────────────┘
//!                       │ peek/commit   │ peek/commit
//!                       ▼               ▼
//!                   RingReader      RingReader
//!                   (UDP task)      (UART task)
//! ```
//!
//! Properties:
//!
//! - Arbitrary-sized writes (`0 < len < N`), byte-level wrap.
//! - Any number of simultaneous writers and readers.
//! - Writers never block and never fail; a reader that falls more than one
//!   buffer behind loses data and is told so.
//!
//! The capacity must be a power of two: the write counter is a 32-bit
//! atomic (small MCUs lack 64-bit atomics) and rollovers then land on the
//! correct buffer offset with no extra handling. Readers extrapolate the
//! counter to 64 bits, which stays exact unless a reader lags by more than
//! 4 GiB between two calls.

mod buffer;
mod reader;

pub use buffer::RingBuffer;
pub use reader::{ReadResults, RingReader};
