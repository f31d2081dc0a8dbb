#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

//! ## Architecture
//!
//! Producers call the installed serializer through [`serialize`]; the
//! serializer assembles one frame on the stack (announcing the calling
//! thread's name first when a broadcast was requested) and hands it to the
//! platform `write` hook in a single call. On buffered platforms that hook
//! appends to a [`RingBuffer`]; consumer tasks drain it through a
//! [`RingReader`] and push the bytes to the real transport.
//!
//! The hot path never locks, never allocates, and never fails. The only
//! user-visible failure mode is a gap in the stream, reported to the lagging
//! reader through its overflow callback.

pub mod consumer;
pub mod context;
pub mod crc;
pub mod error;
pub mod ident;
pub mod payload;
pub mod platform;
pub mod ring;
pub mod statuslog;
pub mod wire;

// Re-export the operational surface at the crate root.
#[doc(inline)]
pub use context::{
    get_level, get_serialize_format, get_verbose, get_verbose_format, serialize, set_level,
    set_serialize_format, set_verbose, set_verbose_format, write_verbose,
};
#[doc(inline)]
pub use crc::crc32;
#[doc(inline)]
pub use error::{MinLogError, Result};
#[doc(inline)]
pub use ident::request_thread_names;
#[doc(inline)]
pub use payload::Payload;
#[doc(inline)]
pub use platform::{set_hooks, Hooks};
#[doc(inline)]
pub use ring::{ReadResults, RingBuffer, RingReader};
#[doc(inline)]
pub use wire::binary::DEFAULT_BINARY;
#[doc(inline)]
pub use wire::micro::MICRO_BINARY;
#[doc(inline)]
pub use wire::text::DEFAULT_TEXT;
#[doc(inline)]
pub use wire::verbose::{Record, VerboseFormat, DEFAULT_VERBOSE};
#[doc(inline)]
pub use wire::{SerializeFormat, THREAD_NAME_MSG_ID};
