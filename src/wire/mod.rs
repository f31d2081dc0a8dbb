//! Frame serialization.
//!
//! A serializer is an installable function with the contract
//! `fn(msg_id: u32, payload: Payload)`. Three built-ins cover the trade-off
//! between self-description and size:
//!
//! | Format | Header | Per-frame cost | Use |
//! |---|---|---|---|
//! | [`binary::DEFAULT_BINARY`] | 16 bytes | id + ns timestamp + thread | offline tooling |
//! | [`micro::MICRO_BINARY`] | 4 bytes | truncated id + delta time | extreme bandwidth limits |
//! | [`text::DEFAULT_TEXT`] | none | ASCII line | eyeballs and grep |
//!
//! Every serializer observes the same contract:
//!
//! 1. Announce the calling thread's name first when a broadcast is pending
//!    ([`crate::ident`]).
//! 2. Assemble the frame in a bounded stack buffer ([`MAX_FRAME_SIZE`]),
//!    clipping the payload to fit.
//! 3. Deliver the frame in a single call to the platform `write` hook, so
//!    one frame maps to one transport unit.

use crate::payload::Payload;

pub mod binary;
pub(crate) mod fmtbuf;
pub mod micro;
pub mod text;
pub mod verbose;

/// Upper bound on any serialized frame, header included.
pub const MAX_FRAME_SIZE: usize = 256;

/// Start of the message-ID range reserved for control messages. External
/// tooling must not assign IDs at or above this value.
pub const CONTROL_ID_MIN: u32 = 0xFFFF_FF00;

/// Control message carrying a thread-name announcement: the payload is the
/// thread's name, the frame's thread ID is the slot being named.
pub const THREAD_NAME_MSG_ID: u32 = 0xFFFF_FF00;

/// An installable serializer. Holding the function in a named struct lets
/// the format slot store a `&'static` reference and lets callers compare
/// formats by identity.
pub struct SerializeFormat(pub fn(msg_id: u32, payload: Payload<'_>));
