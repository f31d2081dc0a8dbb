//! Process-global logging context.
//!
//! The serializer slot, verbose-format slot, severity level, and verbose
//! flag are process-wide cells. They are meant to be configured once during
//! startup and read racily on the hot path: a torn read only selects
//! between two valid formats or a stale level, so no synchronization is
//! spent on reads.

use core::ptr;
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicPtr, Ordering};

use crate::payload::Payload;
use crate::wire::text::DEFAULT_TEXT;
use crate::wire::verbose::{Record, VerboseFormat, DEFAULT_VERBOSE};
use crate::wire::SerializeFormat;

/// Severity levels, matching the conventional decade bands.
pub const DEBUG: i32 = 10;
pub const INFO: i32 = 20;
pub const WARN: i32 = 30;
pub const ERROR: i32 = 40;
pub const CRITICAL: i32 = 50;

// Null means "the built-in default"; the cells only ever hold &'static
// values, so raw pointers are safe to re-borrow.
static SERIALIZE_FORMAT: AtomicPtr<SerializeFormat> = AtomicPtr::new(ptr::null_mut());
static VERBOSE_FORMAT: AtomicPtr<VerboseFormat> = AtomicPtr::new(ptr::null_mut());
static LEVEL: AtomicI32 = AtomicI32::new(INFO);
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Installs the serializer all producers use. Built-ins:
/// [`crate::DEFAULT_BINARY`], [`crate::MICRO_BINARY`],
/// [`crate::DEFAULT_TEXT`].
pub fn set_serialize_format(format: &'static SerializeFormat) {
    SERIALIZE_FORMAT.store(format as *const _ as *mut _, Ordering::Relaxed);
}

/// Currently installed serializer (textual by default).
pub fn get_serialize_format() -> &'static SerializeFormat {
    let installed = SERIALIZE_FORMAT.load(Ordering::Relaxed);
    if installed.is_null() {
        &DEFAULT_TEXT
    } else {
        // SAFETY: only &'static values enter the cell.
        unsafe { &*installed }
    }
}

/// Installs the verbose formatter. Built-in: [`crate::DEFAULT_VERBOSE`].
pub fn set_verbose_format(format: &'static VerboseFormat) {
    VERBOSE_FORMAT.store(format as *const _ as *mut _, Ordering::Relaxed);
}

/// Currently installed verbose formatter.
pub fn get_verbose_format() -> &'static VerboseFormat {
    let installed = VERBOSE_FORMAT.load(Ordering::Relaxed);
    if installed.is_null() {
        &DEFAULT_VERBOSE
    } else {
        // SAFETY: only &'static values enter the cell.
        unsafe { &*installed }
    }
}

/// Sets the minimum severity a log site must meet.
pub fn set_level(level: i32) {
    LEVEL.store(level, Ordering::Relaxed);
}

pub fn get_level() -> i32 {
    LEVEL.load(Ordering::Relaxed)
}

/// Whether `severity` passes the current level. Log-site wrappers gate on
/// this before doing any payload work.
pub fn enabled(severity: i32) -> bool {
    severity >= get_level()
}

/// Switches human-readable output on or off.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn get_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Submission entry point: hands the message to the installed serializer.
/// Wait-free apart from the transport write itself; never fails.
pub fn serialize(msg_id: u32, payload: Payload<'_>) {
    (get_serialize_format().0)(msg_id, payload)
}

/// Renders a record through the installed verbose formatter, synchronously.
pub fn write_verbose(record: &Record<'_>, payload: Payload<'_>) {
    (get_verbose_format().0)(record, payload)
}
