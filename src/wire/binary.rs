//! Full-binary frame serialization.
//!
//! The default binary encoding: every frame is self-contained, carries a
//! full 64-bit timestamp, and starts with a sync word so tooling can
//! resynchronize a stream after byte loss.
//!
//! ```text
//! ┌───────────┬─────────────┬───────────┬──────────┬──────────────┬─────────┐
//! │ sync      │ payload_len │ thread_id │ msg_id   │ timestamp_ns │ payload │
//! │ 0xFAAF    │   1 byte    │  1 byte   │ 4 bytes  │   8 bytes    │ 0..240  │
//! │ 2 bytes   │             │           │          │              │         │
//! └───────────┴─────────────┴───────────┴──────────┴──────────────┴─────────┘
//! ```
//!
//! All fields are little-endian and packed without alignment gaps. The
//! payload is clipped to 240 bytes so a frame always fits in 256.

use crate::error::{MinLogError, Result};
use crate::ident;
use crate::payload::Payload;
use crate::platform;
use crate::wire::{SerializeFormat, MAX_FRAME_SIZE};

/// Sync word opening every full-binary frame (`AF FA` on the wire).
pub const SYNC: u16 = 0xFAAF;

/// Largest payload a full-binary frame can carry.
pub const MAX_PAYLOAD: usize = MAX_FRAME_SIZE - FrameHeader::SIZE;

/// Decoded full-binary frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameHeader {
    /// Payload bytes following the header.
    pub payload_len: u8,
    /// Slot of the emitting thread.
    pub thread_id: u8,
    /// Message ID of the log site.
    pub msg_id: u32,
    /// Absolute monotonic timestamp in nanoseconds.
    pub timestamp_ns: u64,
}

impl FrameHeader {
    /// Size of the encoded header in bytes.
    pub const SIZE: usize = 16;

    /// Encodes the header into `buf`, which must hold [`Self::SIZE`] bytes.
    /// Field order and endianness are wire-exact; no struct layout tricks.
    pub fn encode(&self, buf: &mut [u8]) -> usize {
        debug_assert!(buf.len() >= Self::SIZE);
        buf[0..2].copy_from_slice(&SYNC.to_le_bytes());
        buf[2] = self.payload_len;
        buf[3] = self.thread_id;
        buf[4..8].copy_from_slice(&self.msg_id.to_le_bytes());
        buf[8..16].copy_from_slice(&self.timestamp_ns.to_le_bytes());
        Self::SIZE
    }

    /// Parses a header from the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is shorter than a header or does not open
    /// with the sync word.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(MinLogError::truncated_frame());
        }
        let sync = u16::from_le_bytes([data[0], data[1]]);
        if sync != SYNC {
            return Err(MinLogError::bad_sync());
        }
        Ok(Self {
            payload_len: data[2],
            thread_id: data[3],
            msg_id: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
            timestamp_ns: u64::from_le_bytes([
                data[8], data[9], data[10], data[11], data[12], data[13], data[14], data[15],
            ]),
        })
    }
}

/// Assembles a complete frame into `frame`, returning its total length.
fn build_frame(
    frame: &mut [u8; MAX_FRAME_SIZE],
    msg_id: u32,
    thread_id: u8,
    timestamp_ns: u64,
    payload: &[u8],
) -> usize {
    let payload_len = payload.len().min(MAX_PAYLOAD);
    let header = FrameHeader {
        payload_len: payload_len as u8,
        thread_id,
        msg_id,
        timestamp_ns,
    };
    header.encode(&mut frame[..]);
    frame[FrameHeader::SIZE..FrameHeader::SIZE + payload_len]
        .copy_from_slice(&payload[..payload_len]);
    FrameHeader::SIZE + payload_len
}

/// Full-binary serializer. The payload length travels in the header, so
/// fixed- and variable-size payloads share the same framing.
pub fn serialize(msg_id: u32, payload: Payload<'_>) {
    ident::announce_if_needed();

    let hooks = platform::hooks();
    let mut scratch = [0u8; 8];
    let bytes = payload.bytes(&mut scratch);

    let mut frame = [0u8; MAX_FRAME_SIZE];
    let len = build_frame(
        &mut frame,
        msg_id,
        ident::thread_slot() as u8,
        (hooks.clock_now)(),
        bytes,
    );
    (hooks.write)(&frame[..len]);
}

/// The default binary format.
pub static DEFAULT_BINARY: SerializeFormat = SerializeFormat(serialize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_bytes_are_exact() {
        let mut frame = [0u8; MAX_FRAME_SIZE];
        let len = build_frame(&mut frame, 0xDEAD_BEEF, 7, 0x0102_0304_0506_0708, b"hi");

        assert_eq!(len, 18);
        assert_eq!(
            &frame[..len],
            &[
                0xAF, 0xFA, // sync, little-endian
                0x02, // payload_len
                0x07, // thread_id
                0xEF, 0xBE, 0xAD, 0xDE, // msg_id
                0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, // timestamp
                0x68, 0x69, // "hi"
            ]
        );
    }

    #[test]
    fn oversized_payload_is_clipped() {
        let payload = [0x55u8; 300];
        let mut frame = [0u8; MAX_FRAME_SIZE];
        let len = build_frame(&mut frame, 1, 0, 0, &payload);

        assert_eq!(len, MAX_FRAME_SIZE);
        let header = FrameHeader::parse(&frame).unwrap();
        assert_eq!(header.payload_len as usize, MAX_PAYLOAD);
    }

    #[test]
    fn header_roundtrip() {
        let header = FrameHeader {
            payload_len: 17,
            thread_id: 3,
            msg_id: 0x1234_5678,
            timestamp_ns: 987_654_321,
        };
        let mut buf = [0u8; FrameHeader::SIZE];
        header.encode(&mut buf);
        assert_eq!(FrameHeader::parse(&buf).unwrap(), header);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(FrameHeader::parse(&[0xAF, 0xFA, 0x00]).is_err());

        let mut buf = [0u8; FrameHeader::SIZE];
        FrameHeader {
            payload_len: 0,
            thread_id: 0,
            msg_id: 0,
            timestamp_ns: 0,
        }
        .encode(&mut buf);
        buf[0] = 0x00; // corrupt the sync word
        assert!(FrameHeader::parse(&buf).is_err());
    }
}
