//! Thread identity broadcast.
//!
//! Binary frames carry only a small thread slot. To make a stream
//! self-describing, each thread can be directed to re-announce its
//! human-readable name at the reserved message ID
//! [`THREAD_NAME_MSG_ID`](crate::wire::THREAD_NAME_MSG_ID): calling
//! [`request_thread_names`] bumps a process-wide epoch, and the next
//! serializer call on each thread notices its cached epoch is stale and
//! emits one announcement frame before the user frame.
//!
//! Nothing on the hot path synchronizes: the epoch is a relaxed atomic, the
//! cache is thread-local, and slot assignment is a single `fetch_add` on a
//! thread's first log call. Slots are never recycled within a process;
//! encodings mask them to their field width (wrapping past 16 threads in
//! the micro-binary format is accepted lossiness).

use core::sync::atomic::{AtomicU32, Ordering};

use crate::context;
use crate::payload::Payload;
use crate::platform;
use crate::wire::THREAD_NAME_MSG_ID;

/// Name buffer handed to the platform hook: 15 visible bytes plus NUL.
pub(crate) const THREAD_NAME_BUF: usize = 16;

/// Bumped by every broadcast request.
static NAME_EPOCH: AtomicU32 = AtomicU32::new(0);

/// Next slot to hand out.
static THREAD_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "std")]
mod tls {
    use core::cell::Cell;

    std::thread_local! {
        pub static LOCAL_EPOCH: Cell<u32> = const { Cell::new(0) };
        pub static LOCAL_SLOT: Cell<i32> = const { Cell::new(-1) };
    }
}

/// Directs every live thread to re-announce its name on its next log call.
/// Wait-free and safe from any thread at any time.
pub fn request_thread_names() {
    NAME_EPOCH.fetch_add(1, Ordering::Relaxed);
}

/// Slot of the calling thread, assigned on first use and stable for the
/// thread's lifetime.
#[cfg(feature = "std")]
pub(crate) fn thread_slot() -> u32 {
    tls::LOCAL_SLOT.with(|slot| {
        if slot.get() < 0 {
            slot.set(THREAD_COUNT.fetch_add(1, Ordering::Relaxed) as i32);
        }
        slot.get() as u32
    })
}

/// Emits a thread-name announcement if a broadcast was requested since this
/// thread's last serializer call. Invoked at the top of every serializer;
/// the announcement recurses through the installed serializer, which is
/// idempotent because the cached epoch is updated first.
#[cfg(feature = "std")]
pub(crate) fn announce_if_needed() {
    let epoch = NAME_EPOCH.load(Ordering::Relaxed);
    let stale = tls::LOCAL_EPOCH.with(|cached| {
        let stale = cached.get() != epoch;
        if stale {
            // Equality is the only predicate, so wrap-around is harmless.
            cached.set(epoch);
        }
        stale
    });
    if stale {
        emit_name();
    }
}

// Without thread-local storage the cache is a single shared cell: each
// request produces one announcement process-wide, from whichever task logs
// first, and all tasks share slot assignment through the same cell.
#[cfg(not(feature = "std"))]
static SHARED_EPOCH: AtomicU32 = AtomicU32::new(0);
#[cfg(not(feature = "std"))]
static SHARED_SLOT: AtomicU32 = AtomicU32::new(u32::MAX);

#[cfg(not(feature = "std"))]
pub(crate) fn thread_slot() -> u32 {
    let slot = SHARED_SLOT.load(Ordering::Relaxed);
    if slot != u32::MAX {
        return slot;
    }
    let assigned = THREAD_COUNT.fetch_add(1, Ordering::Relaxed);
    SHARED_SLOT.store(assigned, Ordering::Relaxed);
    assigned
}

#[cfg(not(feature = "std"))]
pub(crate) fn announce_if_needed() {
    let epoch = NAME_EPOCH.load(Ordering::Relaxed);
    if SHARED_EPOCH.swap(epoch, Ordering::Relaxed) != epoch {
        emit_name();
    }
}

/// A missing name still produces a zero-length announcement so consumers
/// see the slot exists.
fn emit_name() {
    let mut name = [0u8; THREAD_NAME_BUF];
    let len = (platform::hooks().thread_name)(&mut name);
    context::serialize(THREAD_NAME_MSG_ID, Payload::Str(&name[..len]));
}
