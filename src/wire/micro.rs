//! Micro-binary frame serialization.
//!
//! Four bytes per message for links where every byte counts. The message ID
//! is truncated to 16 bits and time travels as a delta since the previous
//! frame, compressed to a scale/value pair:
//!
//! ```text
//! bits  0..15  truncated_id   low 16 bits of the message ID
//! bits 16..19  thread_id      slot modulo 16
//! bits 20..21  time_scale     0=ns, 1=us, 2=ms, 3=s
//! bits 22..31  time_value     0..999 at the chosen scale
//! ```
//!
//! The packed u32 is emitted little-endian. Packing is explicit shift/mask
//! arithmetic so the wire layout is identical on every target.
//!
//! The delta clock is a process-wide atomic cell swapped on every frame.
//! Two producers racing between the clock read and the swap can shrink a
//! delta to zero; decoders must not assume monotone deltas. Variable-length
//! payloads are prefixed with one length byte; fixed-size payloads follow
//! the header directly.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::ident;
use crate::payload::Payload;
use crate::platform;
use crate::wire::{SerializeFormat, MAX_FRAME_SIZE};

/// Timestamp of the previous frame, process-wide. Purely a timing cell: the
/// exchange does not order any other memory.
static LAST_TIMESTAMP_NS: AtomicU64 = AtomicU64::new(0);

/// Compresses elapsed nanoseconds to `(scale, value)`: the smallest scale in
/// {ns, us, ms, s} whose value fits 0..999, saturating to `(3, 999)` from
/// 1000 seconds up.
pub fn convert_nanoseconds(ns: u64) -> (u8, u16) {
    let mut scale = 0u8;
    let mut value = ns;
    while value >= 1000 && scale < 3 {
        value /= 1000;
        scale += 1;
    }
    if value > 999 {
        value = 999;
    }
    (scale, value as u16)
}

/// Decoded micro-binary header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MicroFrame {
    /// Low 16 bits of the message ID.
    pub truncated_id: u16,
    /// Thread slot modulo 16.
    pub thread_id: u8,
    /// Delta-time scale, 0..=3.
    pub time_scale: u8,
    /// Delta-time value, 0..=999.
    pub time_value: u16,
}

impl MicroFrame {
    /// Size of the encoded header in bytes.
    pub const SIZE: usize = 4;

    pub fn new(msg_id: u32, thread_id: u32, time_scale: u8, time_value: u16) -> Self {
        Self {
            truncated_id: msg_id as u16,
            thread_id: (thread_id & 0xF) as u8,
            time_scale: time_scale & 0x3,
            time_value: time_value & 0x3FF,
        }
    }

    /// Packs the header into its wire u32.
    pub fn pack(&self) -> u32 {
        u32::from(self.truncated_id)
            | u32::from(self.thread_id & 0xF) << 16
            | u32::from(self.time_scale & 0x3) << 20
            | u32::from(self.time_value & 0x3FF) << 22
    }

    /// Recovers the fields from a wire u32.
    pub fn unpack(raw: u32) -> Self {
        Self {
            truncated_id: raw as u16,
            thread_id: (raw >> 16 & 0xF) as u8,
            time_scale: (raw >> 20 & 0x3) as u8,
            time_value: (raw >> 22 & 0x3FF) as u16,
        }
    }

    pub fn encode(&self, buf: &mut [u8]) -> usize {
        debug_assert!(buf.len() >= Self::SIZE);
        buf[..Self::SIZE].copy_from_slice(&self.pack().to_le_bytes());
        Self::SIZE
    }
}

/// Delta between the previous frame's timestamp and `now`. Zero on the
/// first frame and when the exchange lost the race with a later clock read.
fn elapsed_since_last(now: u64) -> u64 {
    let last = LAST_TIMESTAMP_NS.swap(now, Ordering::Relaxed);
    if last != 0 && now > last {
        now - last
    } else {
        0
    }
}

/// Assembles a complete frame into `frame`, returning its total length.
fn build_frame(
    frame: &mut [u8; MAX_FRAME_SIZE],
    header: MicroFrame,
    payload: &[u8],
    fixed_size: bool,
) -> usize {
    let mut len = header.encode(&mut frame[..]);
    if payload.is_empty() {
        return len;
    }
    if fixed_size {
        let payload_len = payload.len().min(MAX_FRAME_SIZE - MicroFrame::SIZE);
        frame[len..len + payload_len].copy_from_slice(&payload[..payload_len]);
        len + payload_len
    } else {
        // One length byte, then the bytes; the receiver cannot otherwise
        // delimit a variable payload in this headerless-length format.
        let payload_len = payload.len().min(MAX_FRAME_SIZE - MicroFrame::SIZE - 1);
        frame[len] = payload_len as u8;
        len += 1;
        frame[len..len + payload_len].copy_from_slice(&payload[..payload_len]);
        len + payload_len
    }
}

/// Micro-binary serializer.
pub fn serialize(msg_id: u32, payload: Payload<'_>) {
    ident::announce_if_needed();

    let hooks = platform::hooks();
    let (scale, value) = convert_nanoseconds(elapsed_since_last((hooks.clock_now)()));
    let header = MicroFrame::new(msg_id, ident::thread_slot(), scale, value);

    let mut scratch = [0u8; 8];
    let bytes = payload.bytes(&mut scratch);

    let mut frame = [0u8; MAX_FRAME_SIZE];
    let len = build_frame(&mut frame, header, bytes, payload.is_fixed_size());
    (hooks.write)(&frame[..len]);
}

/// The micro-binary format.
pub static MICRO_BINARY: SerializeFormat = SerializeFormat(serialize);
