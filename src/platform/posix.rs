//! POSIX host defaults for the platform hooks.

use std::io::Write as _;
use std::sync::OnceLock;
use std::time::Instant;

use super::Hooks;

/// Monotonic nanoseconds since the first call in this process.
pub fn clock_now() -> u64 {
    static ANCHOR: OnceLock<Instant> = OnceLock::new();
    ANCHOR.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

/// Copies the current thread's name into `buf`, NUL-terminated, clipped to
/// `buf.len() - 1` bytes. Returns the copied length, 0 for unnamed threads.
pub fn thread_name(buf: &mut [u8]) -> usize {
    if buf.is_empty() {
        return 0;
    }
    let current = std::thread::current();
    let name = current.name().unwrap_or("");
    let len = name.len().min(buf.len() - 1);
    buf[..len].copy_from_slice(&name.as_bytes()[..len]);
    buf[len] = 0;
    len
}

/// Writes the frame to stdout; short writes drop the frame, per the sink
/// contract.
pub fn write_stdout(bytes: &[u8]) {
    let _ = std::io::stdout().write_all(bytes);
}

/// Default host hooks: monotonic clock, `std::thread` names, stdout sink.
pub static HOOKS: Hooks = Hooks {
    clock_now,
    thread_name,
    write: write_stdout,
};
