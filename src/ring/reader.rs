use core::slice;
use core::sync::atomic::Ordering;

use super::RingBuffer;

const LOW_32: u64 = 0xFFFF_FFFF;

/// Committed bytes available to a reader. When the data wraps past the end
/// of the buffer it is split between `part1` and `part2`.
///
/// The slices reference live buffer memory that producers may overwrite at
/// any time; treat them as provisional until the following
/// [`RingReader::mark_read`] succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadResults<'a> {
    part1: &'a [u8],
    part2: &'a [u8],
}

impl<'a> ReadResults<'a> {
    /// First contiguous run of bytes.
    pub fn part1(&self) -> &'a [u8] {
        self.part1
    }

    /// Continuation after the wrap point; empty when nothing wrapped.
    pub fn part2(&self) -> &'a [u8] {
        self.part2
    }

    /// Total bytes across both parts.
    pub fn len(&self) -> usize {
        self.part1.len() + self.part2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.part1.is_empty() && self.part2.is_empty()
    }

    /// Copies up to `dest.len()` bytes into `dest`, joining the parts.
    /// Returns the number of bytes copied.
    pub fn copy_to(&self, dest: &mut [u8]) -> usize {
        let n1 = self.part1.len().min(dest.len());
        dest[..n1].copy_from_slice(&self.part1[..n1]);
        let n2 = self.part2.len().min(dest.len() - n1);
        dest[n1..n1 + n2].copy_from_slice(&self.part2[..n2]);
        n1 + n2
    }

    /// View with the first `offset` bytes skipped. Returns an empty view if
    /// `offset` exceeds [`len`](Self::len).
    pub fn add_offset(&self, offset: usize) -> ReadResults<'a> {
        if offset > self.len() {
            return ReadResults::default();
        }
        if offset < self.part1.len() {
            ReadResults {
                part1: &self.part1[offset..],
                part2: self.part2,
            }
        } else {
            ReadResults {
                part1: &self.part2[offset - self.part1.len()..],
                part2: &[],
            }
        }
    }
}

/// Reader state over a [`RingBuffer`].
///
/// Readers live outside the buffer: each consumer owns one, and consuming
/// from one reader never affects another. The reader tracks how many bytes
/// it has consumed as a 64-bit total extrapolated from the buffer's 32-bit
/// write counter.
///
/// A reader that falls more than one buffer behind has lost data: the next
/// [`peek_available`](Self::peek_available) reports the overrun through the
/// overflow callback, resets the read position to the current write head,
/// and returns `None`.
pub struct RingReader<'a, const N: usize> {
    buffer: &'a RingBuffer<N>,
    /// Total bytes ever consumed by this reader.
    read_tail: u64,
    sleep: Option<fn()>,
    overflow: Option<fn(new_bytes: u64, capacity: u64)>,
}

impl<'a, const N: usize> RingReader<'a, N> {
    /// Attaches a reader at the buffer's current write head: only bytes
    /// written after this call are observed.
    pub fn new(buffer: &'a RingBuffer<N>) -> Self {
        let mut reader = Self {
            buffer,
            read_tail: 0,
            sleep: None,
            overflow: None,
        };
        reader.read_tail = reader.write_total();
        reader
    }

    /// Installs a yield function invoked while waiting out in-flight writes.
    /// Without one the reader spins with a CPU hint.
    pub fn set_sleep_fn(&mut self, sleep: fn()) {
        self.sleep = Some(sleep);
    }

    /// Installs the data-loss callback, invoked as `(new_bytes, capacity)`
    /// each time an overrun is detected.
    pub fn set_overflow_fn(&mut self, overflow: fn(u64, u64)) {
        self.overflow = Some(overflow);
    }

    /// Returns the committed bytes since the last consume without advancing
    /// the read position, or `None` after an overrun (the read position then
    /// resumes at the current write head).
    ///
    /// An empty buffer is not an error: the result is `Some` with zero-length
    /// parts.
    pub fn peek_available(&mut self) -> Option<ReadResults<'a>> {
        let new_bytes = self.new_bytes_reset_if_overrun()? as usize;

        let offset = self.read_tail as usize & (N - 1);
        let tail_space = N - offset;
        let base = self.buffer.base_ptr();

        // SAFETY: the ranges lie inside the buffer; concurrent producer
        // writes are possible by contract and resolved by mark_read.
        unsafe {
            if new_bytes > tail_space {
                Some(ReadResults {
                    part1: slice::from_raw_parts(base.add(offset), tail_space),
                    part2: slice::from_raw_parts(base, new_bytes - tail_space),
                })
            } else {
                Some(ReadResults {
                    part1: slice::from_raw_parts(base.add(offset), new_bytes),
                    part2: &[],
                })
            }
        }
    }

    /// Consumes `num_bytes` peeked bytes, clamped to what is currently
    /// available. Returns `false` if the buffer overran since the peek, in
    /// which case nothing is consumed and the peeked data must be discarded.
    pub fn mark_read(&mut self, num_bytes: usize) -> bool {
        let Some(new_bytes) = self.new_bytes_reset_if_overrun() else {
            return false;
        };
        self.read_tail += (num_bytes as u64).min(new_bytes);
        true
    }

    /// Convenience: peek, copy into `dest`, and consume what was copied.
    /// Returns the number of bytes copied, or `None` on overrun.
    pub fn read(&mut self, dest: &mut [u8]) -> Option<usize> {
        if dest.is_empty() {
            return Some(0);
        }
        let results = self.peek_available()?;
        let copied = results.copy_to(dest);
        if self.mark_read(copied) {
            Some(copied)
        } else {
            None
        }
    }

    fn new_bytes_reset_if_overrun(&mut self) -> Option<u64> {
        let total = self.write_total();
        let new_bytes = total - self.read_tail;
        if new_bytes > N as u64 {
            if let Some(overflow) = self.overflow {
                overflow(new_bytes, N as u64);
            }
            self.read_tail = total;
            return None;
        }
        Some(new_bytes)
    }

    /// 64-bit total of bytes ever written. Polls until no write is in
    /// flight and the counter re-reads stable, so everything below the
    /// returned total is fully copied. The upper 32 bits are carried over
    /// from `read_tail`, bumped when the low word wrapped since the last
    /// observation; exact as long as the reader lags by less than 4 GiB.
    fn write_total(&self) -> u64 {
        loop {
            let total = self.buffer.total_written().load(Ordering::SeqCst);
            if self.buffer.active_writers().load(Ordering::SeqCst) == 0
                && self.buffer.total_written().load(Ordering::SeqCst) == total
            {
                let tail_low = self.read_tail & LOW_32;
                let mut tail_high = self.read_tail & !LOW_32;
                if u64::from(total) < tail_low {
                    tail_high += LOW_32 + 1;
                }
                return tail_high + u64::from(total);
            }
            match self.sleep {
                Some(sleep) => sleep(),
                None => core::hint::spin_loop(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn micro_sleep() {
        thread::sleep(Duration::from_micros(1));
    }

    #[test]
    fn empty_peek_succeeds_with_zero_bytes() {
        let ring: RingBuffer<256> = RingBuffer::new();
        let mut reader = RingReader::new(&ring);
        reader.set_sleep_fn(micro_sleep);

        let results = reader.peek_available().unwrap();
        assert!(results.is_empty());
        assert_eq!(results.part1().len(), 0);
        assert_eq!(results.part2().len(), 0);
    }

    #[test]
    fn wraparound_splits_and_offsets() {
        let ring: RingBuffer<16> = RingBuffer::new();
        let mut reader = RingReader::new(&ring);
        reader.set_sleep_fn(micro_sleep);

        ring.write(b"12345678");
        let results = reader.peek_available().unwrap();
        assert_eq!(results.part1(), b"12345678");
        assert!(reader.mark_read(results.len()));

        ring.write(b"ABCDEFGHIJKL");
        let results = reader.peek_available().unwrap();
        assert_eq!(results.part1(), b"ABCDEFGH");
        assert_eq!(results.part2(), b"IJKL");

        let mut dest = [0u8; 12];
        assert_eq!(results.copy_to(&mut dest[..4]), 4);
        assert_eq!(&dest[..4], b"ABCD");
        assert_eq!(results.copy_to(&mut dest[..10]), 10);
        assert_eq!(&dest[..10], b"ABCDEFGHIJ");

        let shifted = results.add_offset(1);
        let mut joined = [0u8; 12];
        let n = shifted.copy_to(&mut joined);
        assert_eq!(&joined[..n], b"BCDEFGHIJKL");

        let tail = shifted.add_offset(9);
        let n = tail.copy_to(&mut joined);
        assert_eq!(&joined[..n], b"KL");

        assert!(shifted.add_offset(12).is_empty());
    }

    #[test]
    fn mark_read_advances_past_consumed_data() {
        let ring: RingBuffer<256> = RingBuffer::new();
        let mut reader = RingReader::new(&ring);

        ring.write(b"First");
        let results = reader.peek_available().unwrap();
        assert_eq!(results.part1(), b"First");
        assert!(reader.mark_read(results.len()));

        ring.write(b"Second");
        let results = reader.peek_available().unwrap();
        assert_eq!(results.part1(), b"Second");
    }

    #[test]
    fn mark_read_clamps_to_available() {
        let ring: RingBuffer<64> = RingBuffer::new();
        let mut reader = RingReader::new(&ring);

        ring.write(b"abcd");
        // Asking for more than is available consumes only what exists.
        assert!(reader.mark_read(1000));
        ring.write(b"efgh");
        let results = reader.peek_available().unwrap();
        assert_eq!(results.part1(), b"efgh");
    }

    #[test]
    fn readers_are_independent() {
        let ring: RingBuffer<256> = RingBuffer::new();
        let mut reader1 = RingReader::new(&ring);
        let mut reader2 = RingReader::new(&ring);

        ring.write(b"TestData");

        let results1 = reader1.peek_available().unwrap();
        assert_eq!(results1.part1(), b"TestData");
        assert!(reader1.mark_read(results1.len()));

        // Consuming through reader1 must not advance reader2.
        let results2 = reader2.peek_available().unwrap();
        assert_eq!(results2.part1(), b"TestData");
    }

    static OVERFLOW_CALLS: AtomicUsize = AtomicUsize::new(0);
    static OVERFLOW_NEW_BYTES: AtomicU64 = AtomicU64::new(0);
    static OVERFLOW_CAPACITY: AtomicU64 = AtomicU64::new(0);

    fn record_overflow(new_bytes: u64, capacity: u64) {
        OVERFLOW_CALLS.fetch_add(1, Ordering::SeqCst);
        OVERFLOW_NEW_BYTES.store(new_bytes, Ordering::SeqCst);
        OVERFLOW_CAPACITY.store(capacity, Ordering::SeqCst);
    }

    #[test]
    fn overrun_is_detected_and_recovered() {
        let ring: RingBuffer<32> = RingBuffer::new();
        let mut reader = RingReader::new(&ring);
        reader.set_overflow_fn(record_overflow);

        ring.write(b"A");
        assert_eq!(reader.peek_available().unwrap().len(), 1);

        for _ in 0..10 {
            ring.write(b"0123456789");
        }

        let calls_before = OVERFLOW_CALLS.load(Ordering::SeqCst);
        assert!(reader.peek_available().is_none());
        assert_eq!(OVERFLOW_CALLS.load(Ordering::SeqCst), calls_before + 1);
        // One unread byte plus 100 new ones against a 32-byte buffer.
        assert_eq!(OVERFLOW_NEW_BYTES.load(Ordering::SeqCst), 101);
        assert_eq!(OVERFLOW_CAPACITY.load(Ordering::SeqCst), 32);

        // The reader resumed at the write head: new data flows again.
        ring.write(b"fresh");
        let results = reader.peek_available().unwrap();
        assert_eq!(results.part1(), b"fresh");
    }

    #[test]
    fn counter_rollover_is_extrapolated() {
        let ring: RingBuffer<16> = RingBuffer::new();
        ring.set_total_written_for_test(u32::MAX - 15);
        let mut reader = RingReader::new(&ring);
        reader.set_sleep_fn(micro_sleep);

        // Attaching mid-stream starts the reader empty.
        assert_eq!(reader.peek_available().unwrap().len(), 0);

        ring.write(b"12345678");
        let results = reader.peek_available().unwrap();
        assert_eq!(results.part1(), b"12345678");
        assert!(reader.mark_read(results.len()));

        // This write crosses the 2^32 boundary of the write counter.
        ring.write(b"ABCDEFGHIJKL");
        let results = reader.peek_available().unwrap();
        assert_eq!(results.len(), 12);
        assert_eq!(results.part2().len(), 4);
        let mut dest = [0u8; 12];
        results.copy_to(&mut dest);
        assert_eq!(&dest, b"ABCDEFGHIJKL");
        assert!(reader.mark_read(12));
        assert!(reader.read_tail > u64::from(u32::MAX));
    }

    #[test]
    fn read_copies_and_consumes() {
        let ring: RingBuffer<64> = RingBuffer::new();
        let mut reader = RingReader::new(&ring);

        ring.write(b"stream");
        let mut dest = [0u8; 4];
        assert_eq!(reader.read(&mut dest), Some(4));
        assert_eq!(&dest, b"stre");
        assert_eq!(reader.read(&mut dest), Some(2));
        assert_eq!(&dest[..2], b"am");
        assert_eq!(reader.read(&mut dest), Some(0));
    }
}
