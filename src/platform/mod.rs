//! Platform capabilities.
//!
//! The core consumes exactly three platform functions, bundled in a
//! [`Hooks`] record: a monotonic nanosecond clock, current-thread-name
//! retrieval, and the transport write sink. Hosted builds default to the
//! [`posix`] implementations; embedded builds install their own record
//! during startup:
//!
//! ```rust,no_run
//! use minlog::Hooks;
//!
//! fn uart_write(bytes: &[u8]) { /* DMA the bytes out */ }
//! fn cycle_clock() -> u64 { 0 }
//! fn no_name(_buf: &mut [u8]) -> usize { 0 }
//!
//! static BOARD_HOOKS: Hooks = Hooks {
//!     clock_now: cycle_clock,
//!     thread_name: no_name,
//!     write: uart_write,
//! };
//!
//! minlog::set_hooks(&BOARD_HOOKS);
//! ```
//!
//! The slot is written once during startup and read racily on the hot path;
//! a torn read only selects between two valid records.

use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

#[cfg(any(test, feature = "std"))]
pub mod mock;
#[cfg(feature = "std")]
pub mod posix;
pub mod transport;

#[doc(inline)]
pub use transport::Transport;

/// The three platform functions the core consumes.
pub struct Hooks {
    /// Monotonic clock in nanoseconds.
    pub clock_now: fn() -> u64,
    /// Writes the current thread's NUL-terminated name into `buf` and
    /// returns the name length (0 when unavailable). Names are clipped to
    /// `buf.len() - 1` visible bytes.
    pub thread_name: fn(buf: &mut [u8]) -> usize,
    /// Transport sink: delivers one complete frame or drops it. Serializers
    /// emit exactly one call per frame.
    pub write: fn(bytes: &[u8]),
}

static HOOKS: AtomicPtr<Hooks> = AtomicPtr::new(ptr::null_mut());

/// Installs the platform hooks. Call once during startup, before logging.
pub fn set_hooks(hooks: &'static Hooks) {
    HOOKS.store(hooks as *const Hooks as *mut Hooks, Ordering::Relaxed);
}

/// Currently installed hooks, falling back to the platform default.
pub fn hooks() -> &'static Hooks {
    let installed = HOOKS.load(Ordering::Relaxed);
    if installed.is_null() {
        default_hooks()
    } else {
        // SAFETY: the slot only ever holds &'static values from set_hooks.
        unsafe { &*installed }
    }
}

#[cfg(feature = "std")]
fn default_hooks() -> &'static Hooks {
    &posix::HOOKS
}

/// Without `std` there is no sane default: everything is inert until the
/// platform installs its hooks.
#[cfg(not(feature = "std"))]
fn default_hooks() -> &'static Hooks {
    fn zero_clock() -> u64 {
        0
    }
    fn no_name(_buf: &mut [u8]) -> usize {
        0
    }
    fn drop_bytes(_bytes: &[u8]) {}

    static NULL_HOOKS: Hooks = Hooks {
        clock_now: zero_clock,
        thread_name: no_name,
        write: drop_bytes,
    };
    &NULL_HOOKS
}
