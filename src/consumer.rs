//! Consumer pumps: the drain side of a buffered transport.
//!
//! A pump owns a [`RingReader`] and a [`Transport`] and moves committed
//! bytes from one to the other. The polling cadence belongs to the caller,
//! whether a host thread sleeping between polls or a preemptive embedded
//! task, so the pumps themselves never sleep or block beyond the transport
//! call.
//!
//! Two shapes match the two common sinks:
//!
//! - [`PacketPump`] sends fixed-size packets (UDP): it waits until a whole
//!   packet's worth of bytes is ready and keeps packets aligned to the
//!   buffer start so a datagram is always one contiguous slice.
//! - [`StreamPump`] sends whatever is available (UART, files): both wrap
//!   segments go out back-to-back.
//!
//! Data loss (the reader overran) and transport failures are reported
//! through `status_log!`; state transitions are reported once, not per
//! poll.

use crate::error::{MinLogError, Result};
use crate::platform::transport::Transport;
use crate::ring::{RingBuffer, RingReader};
use crate::status_log;

/// Drains a ring buffer in fixed-size packets.
pub struct PacketPump<'a, const N: usize, T: Transport> {
    reader: RingReader<'a, N>,
    transport: T,
    packet_len: usize,
    transport_up: bool,
}

impl<'a, const N: usize, T: Transport> PacketPump<'a, N, T> {
    /// Attaches a pump to `buffer`, sending `packet_len`-byte packets.
    ///
    /// # Errors
    ///
    /// `packet_len` must be nonzero and divide the buffer capacity; packets
    /// then tile the ring exactly and a packet never straddles the wrap
    /// point once the read position is aligned.
    pub fn new(buffer: &'a RingBuffer<N>, transport: T, packet_len: usize) -> Result<Self> {
        if packet_len == 0 || packet_len > N || N % packet_len != 0 {
            return Err(MinLogError::packet_size());
        }
        Ok(Self {
            reader: RingReader::new(buffer),
            transport,
            packet_len,
            transport_up: false,
        })
    }

    /// Drains at most one packet. Returns `true` when the poll did work and
    /// the caller should poll again before sleeping.
    pub fn poll(&mut self) -> bool {
        let Some(available) = self.reader.peek_available() else {
            status_log!(error, "log consumer fell behind");
            return false;
        };
        if available.len() < self.packet_len {
            return false;
        }

        // A part1 shorter than a packet only appears after data loss; the
        // read position realigns with the buffer start by consuming the
        // remainder of the lap.
        if available.part1().len() < self.packet_len {
            if !self.reader.mark_read(available.part1().len()) {
                status_log!(error, "log consumer fell behind");
            }
            return true;
        }

        let packet = &available.part1()[..self.packet_len];
        let outcome = if self.transport.is_ready() {
            self.transport.send(packet)
        } else {
            Err(MinLogError::not_ready())
        };

        // The packet is consumed even when the send failed: the transport
        // drops, the producer side never stalls.
        if !self.reader.mark_read(self.packet_len) {
            status_log!(error, "log consumer fell behind");
        }

        match outcome {
            Ok(()) => {
                if !self.transport_up {
                    status_log!(info, "log transport up");
                    self.transport_up = true;
                }
            }
            Err(_) => {
                if self.transport_up {
                    status_log!(warn, "log transport down");
                    self.transport_up = false;
                }
                self.transport.reset();
            }
        }
        true
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

/// Drains a ring buffer as a byte stream.
pub struct StreamPump<'a, const N: usize, T: Transport> {
    reader: RingReader<'a, N>,
    transport: T,
    transport_up: bool,
}

impl<'a, const N: usize, T: Transport> StreamPump<'a, N, T> {
    pub fn new(buffer: &'a RingBuffer<N>, transport: T) -> Self {
        Self {
            reader: RingReader::new(buffer),
            transport,
            transport_up: false,
        }
    }

    /// Sends everything currently committed. Returns `true` when bytes
    /// moved.
    pub fn poll(&mut self) -> bool {
        let Some(available) = self.reader.peek_available() else {
            status_log!(error, "log consumer fell behind");
            return false;
        };
        if available.is_empty() {
            return false;
        }

        let mut outcome = self.transport.send(available.part1());
        if outcome.is_ok() && !available.part2().is_empty() {
            outcome = self.transport.send(available.part2());
        }

        if !self.reader.mark_read(available.len()) {
            status_log!(error, "log consumer fell behind");
        }

        match outcome {
            Ok(()) => {
                if !self.transport_up {
                    status_log!(info, "log transport up");
                    self.transport_up = true;
                }
            }
            Err(_) => {
                if self.transport_up {
                    status_log!(warn, "log transport down");
                    self.transport_up = false;
                }
                self.transport.reset();
            }
        }
        true
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockTransport;

    #[test]
    fn packet_pump_rejects_bad_sizes() {
        let ring: RingBuffer<64> = RingBuffer::new();
        assert!(PacketPump::new(&ring, MockTransport::new(), 0).is_err());
        assert!(PacketPump::new(&ring, MockTransport::new(), 24).is_err());
        assert!(PacketPump::new(&ring, MockTransport::new(), 128).is_err());
        assert!(PacketPump::new(&ring, MockTransport::new(), 16).is_ok());
    }

    #[test]
    fn packet_pump_sends_whole_packets_in_order() {
        let ring: RingBuffer<64> = RingBuffer::new();
        let mut pump = PacketPump::new(&ring, MockTransport::new(), 16).unwrap();

        // Less than a packet: nothing moves.
        ring.write(&[1u8; 8]);
        assert!(!pump.poll());
        assert!(pump.transport().sent_frames().is_empty());

        ring.write(&[2u8; 8]);
        ring.write(&[3u8; 16]);
        assert!(pump.poll());
        assert!(pump.poll());
        assert!(!pump.poll());

        let sent = pump.transport().sent_frames();
        assert_eq!(sent.len(), 2);
        let mut first = [1u8; 8].to_vec();
        first.extend_from_slice(&[2u8; 8]);
        assert_eq!(sent[0], first);
        assert_eq!(sent[1], vec![3u8; 16]);
    }

    #[test]
    fn packet_pump_realigns_after_tear() {
        static RING: RingBuffer<32> = RingBuffer::new();

        // Eight bytes land before the pump attaches, so its read position
        // starts misaligned with the packet grid.
        let pre: Vec<u8> = (0u8..8).collect();
        RING.write(&pre);

        let mut pump = PacketPump::new(&RING, MockTransport::new(), 16).unwrap();

        let chunk: Vec<u8> = (8u8..36).collect();
        RING.write(&chunk[..16]);
        RING.write(&chunk[16..]);
        // First packet goes out misaligned but contiguous: bytes 8..24.
        assert!(pump.poll());
        assert_eq!(pump.transport().sent_frames()[0], (8u8..24).collect::<Vec<u8>>());

        // The remaining 12 bytes end 8 short of the wrap point; the next
        // data crosses it, producing a part1 shorter than a packet.
        let tail: Vec<u8> = (36u8..48).collect();
        RING.write(&tail[..8]);
        assert!(pump.poll()); // consumes the 8-byte fragment, sends nothing
        assert_eq!(pump.transport().sent_frames().len(), 1);

        RING.write(&tail[8..]);
        assert!(pump.poll());
        let sent = pump.transport().sent_frames();
        assert_eq!(sent.len(), 2);
        // Realigned packet starts at the buffer start: bytes 32..48.
        assert_eq!(sent[1], (32u8..48).collect::<Vec<u8>>());
    }

    #[test]
    fn packet_pump_drops_packet_on_transport_failure() {
        let ring: RingBuffer<64> = RingBuffer::new();
        let mut pump = PacketPump::new(&ring, MockTransport::new(), 16).unwrap();

        ring.write(&[9u8; 16]);
        pump.transport_mut().fail_sends(1);
        assert!(pump.poll());

        // The failed packet is gone and the transport was reset.
        assert!(pump.transport().sent_frames().is_empty());
        assert_eq!(pump.transport().resets(), 1);
        assert!(!pump.poll());

        // Later traffic flows again.
        ring.write(&[10u8; 16]);
        assert!(pump.poll());
        assert_eq!(pump.transport().sent_frames().len(), 1);
        assert_eq!(pump.transport().sent_frames()[0], vec![10u8; 16]);
    }

    #[test]
    fn packet_pump_skips_unready_transport() {
        let ring: RingBuffer<64> = RingBuffer::new();
        let mut pump = PacketPump::new(&ring, MockTransport::new(), 16).unwrap();
        pump.transport_mut().set_ready(false);

        ring.write(&[4u8; 16]);
        assert!(pump.poll());
        assert!(pump.transport().sent_frames().is_empty());
        // reset() re-arms the mock, so the next packet goes through.
        assert_eq!(pump.transport().resets(), 1);
    }

    #[test]
    fn stream_pump_sends_both_wrap_segments() {
        let ring: RingBuffer<16> = RingBuffer::new();
        let mut pump = StreamPump::new(&ring, MockTransport::new());

        ring.write(b"12345678");
        assert!(pump.poll());
        ring.write(b"ABCDEFGHIJKL");
        assert!(pump.poll());
        assert!(!pump.poll());

        let sent = pump.transport().sent_frames();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0], b"12345678".to_vec());
        assert_eq!(sent[1], b"ABCDEFGH".to_vec());
        assert_eq!(sent[2], b"IJKL".to_vec());
    }
}
