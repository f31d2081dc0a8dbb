use core::cell::UnsafeCell;
use core::ptr;
use core::sync::atomic::{AtomicU32, Ordering};

/// Lock-free byte ring shared by any number of producers.
///
/// `N` must be a power of two. The buffer owns its storage, so a
/// process-wide instance can live in a `static`:
///
/// ```
/// use minlog::RingBuffer;
///
/// static RING: RingBuffer<1024> = RingBuffer::new();
/// RING.write(b"frame");
/// ```
///
/// Writes are wait-free: a `fetch_add` on the write counter claims a
/// disjoint byte range for each producer, so concurrent writers never touch
/// the same bytes. There is no backpressure; producers keep advancing and a
/// slow [`RingReader`](super::RingReader) is responsible for detecting the
/// resulting overrun.
pub struct RingBuffer<const N: usize> {
    bytes: UnsafeCell<[u8; N]>,
    /// Total bytes ever written, modulo 2^32.
    total_written: AtomicU32,
    /// Writers currently mid-copy. Bytes below `total_written` are committed
    /// only when this is observed at zero.
    active_writers: AtomicU32,
    notify: Option<fn()>,
}

// Writers mutate disjoint ranges through the UnsafeCell; the counter pair
// orders those mutations for readers.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    const CAPACITY_IS_POWER_OF_TWO: () =
        assert!(N.is_power_of_two(), "ring capacity must be a power of two");

    /// Creates an empty ring.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_IS_POWER_OF_TWO;
        Self {
            bytes: UnsafeCell::new([0u8; N]),
            total_written: AtomicU32::new(0),
            active_writers: AtomicU32::new(0),
            notify: None,
        }
    }

    /// Creates an empty ring with a post-write hook, invoked after every
    /// completed write (typically to wake a consumer task). The hook runs on
    /// the producer's thread and must be as ISR-safe as the producer is.
    pub const fn with_notify(notify: fn()) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_IS_POWER_OF_TWO;
        Self {
            bytes: UnsafeCell::new([0u8; N]),
            total_written: AtomicU32::new(0),
            active_writers: AtomicU32::new(0),
            notify: Some(notify),
        }
    }

    /// Capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Appends `data` to the ring. Wait-free, bounded by the copy itself;
    /// never blocks and never fails. Safe from interrupt context where
    /// 32-bit atomics are.
    ///
    /// Callers must keep `0 < data.len() < N`; the serializers guarantee it
    /// by capping frames well below any sane capacity.
    pub fn write(&self, data: &[u8]) {
        debug_assert!(!data.is_empty() && data.len() < N);

        self.active_writers.fetch_add(1, Ordering::SeqCst);

        // The pre-add value is this writer's claimed offset. Power-of-two
        // capacity keeps the offset correct across 32-bit rollover.
        let old_total = self.total_written.fetch_add(data.len() as u32, Ordering::SeqCst);
        let offset = old_total as usize & (N - 1);
        let tail_space = N - offset;

        // SAFETY: fetch_add hands each writer a disjoint range, so the only
        // aliasing is with readers, which re-validate after mark_read.
        unsafe {
            let base = self.bytes.get() as *mut u8;
            if data.len() > tail_space {
                ptr::copy_nonoverlapping(data.as_ptr(), base.add(offset), tail_space);
                ptr::copy_nonoverlapping(
                    data.as_ptr().add(tail_space),
                    base,
                    data.len() - tail_space,
                );
            } else {
                ptr::copy_nonoverlapping(data.as_ptr(), base.add(offset), data.len());
            }
        }

        // Publishes the copied bytes: readers treat data as committed only
        // once they observe zero here.
        self.active_writers.fetch_sub(1, Ordering::SeqCst);

        if let Some(notify) = self.notify {
            notify();
        }
    }

    pub(super) fn base_ptr(&self) -> *const u8 {
        self.bytes.get() as *const u8
    }

    pub(super) fn total_written(&self) -> &AtomicU32 {
        &self.total_written
    }

    pub(super) fn active_writers(&self) -> &AtomicU32 {
        &self.active_writers
    }

    /// Pre-positions the write counter so tests can exercise 32-bit
    /// rollover without writing 4 GiB.
    #[cfg(test)]
    pub(crate) fn set_total_written_for_test(&self, total: u32) {
        self.total_written.store(total, Ordering::SeqCst);
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::RingReader;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    static NOTIFY_COUNT: AtomicUsize = AtomicUsize::new(0);

    fn count_notify() {
        NOTIFY_COUNT.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn basic_write_and_peek() {
        let ring: RingBuffer<256> = RingBuffer::with_notify(count_notify);
        let mut reader = RingReader::new(&ring);

        let before = NOTIFY_COUNT.load(Ordering::SeqCst);
        ring.write(b"Hello");
        assert_eq!(NOTIFY_COUNT.load(Ordering::SeqCst), before + 1);

        let results = reader.peek_available().unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results.part1(), b"Hello");
        assert!(results.part2().is_empty());
    }

    #[test]
    fn writes_concatenate_in_claim_order() {
        let ring: RingBuffer<256> = RingBuffer::new();
        let mut reader = RingReader::new(&ring);

        ring.write(b"Hello");
        ring.write(b"World");

        let results = reader.peek_available().unwrap();
        assert_eq!(results.len(), 10);
        let mut dest = [0u8; 10];
        assert_eq!(results.copy_to(&mut dest), 10);
        assert_eq!(&dest, b"HelloWorld");
    }

    #[test]
    fn large_write_fills_exactly() {
        let ring: RingBuffer<64> = RingBuffer::new();
        let mut reader = RingReader::new(&ring);

        let mut data = [0u8; 32];
        for (i, b) in data.iter_mut().enumerate() {
            *b = i as u8;
        }
        ring.write(&data);

        let results = reader.peek_available().unwrap();
        let mut dest = [0u8; 32];
        assert_eq!(results.copy_to(&mut dest), 32);
        assert_eq!(dest, data);
    }

    // Concurrent writers each emit (thread id, sequence) records; two
    // independent readers must each observe every record exactly once and
    // per-thread sequences in order.
    #[test]
    fn concurrent_writers_stay_disjoint() {
        const THREADS: usize = 8;
        const WRITES: u32 = 200;
        const RECORD: usize = 8;

        static RING: RingBuffer<4096> = RingBuffer::new();

        let mut writers = Vec::new();
        for t in 0..THREADS {
            writers.push(thread::spawn(move || {
                for j in 0..WRITES {
                    let mut record = [0u8; RECORD];
                    record[..4].copy_from_slice(&(t as u32).to_le_bytes());
                    record[4..].copy_from_slice(&j.to_le_bytes());
                    RING.write(&record);
                    thread::sleep(std::time::Duration::from_micros(50));
                }
            }));
        }

        let mut expected = [0u32; THREADS];
        let mut seen = 0u32;
        let mut reader = RingReader::new(&RING);
        while seen < THREADS as u32 * WRITES {
            let results = reader
                .peek_available()
                .expect("reader overran despite paced writers");
            assert_eq!(results.len() % RECORD, 0, "torn record visible");

            let mut view = results;
            while view.len() >= RECORD {
                let mut record = [0u8; RECORD];
                view.copy_to(&mut record);
                let t = u32::from_le_bytes(record[..4].try_into().unwrap()) as usize;
                let j = u32::from_le_bytes(record[4..].try_into().unwrap());
                assert!(t < THREADS, "corrupt thread id {t}");
                assert_eq!(j, expected[t], "out-of-order record for writer {t}");
                expected[t] += 1;
                seen += 1;

                assert!(reader.mark_read(RECORD));
                view = view.add_offset(RECORD);
            }
        }

        for handle in writers {
            handle.join().unwrap();
        }
        for count in expected {
            assert_eq!(count, WRITES);
        }
    }
}
