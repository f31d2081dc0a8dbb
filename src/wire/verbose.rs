//! Human-readable line formatting.
//!
//! Development-time rendering of a log site with its source location and
//! thread name, delivered synchronously through the `write` hook with no
//! buffering:
//!
//! ```text
//! <seconds>.<millis> <SEVERITY> <file>:<line> <thread_name>] <message>[: <payload>]\n
//! ```
//!
//! Rendering is bounded to 1024 bytes; overlong lines are truncated with
//! the trailing newline preserved.

use core::fmt::Write as _;

use crate::context;
use crate::payload::Payload;
use crate::platform;
use crate::wire::fmtbuf::FmtBuf;
use crate::wire::text::render_payload;

/// Upper bound on a rendered verbose line.
pub const MAX_LINE: usize = 1024;

const THREAD_NAME_BUF: usize = 16;

/// A log site as seen by the verbose formatter. The message ID is carried
/// for custom formatters; the default rendering ignores it, as it does the
/// function name (often empty).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Record<'a> {
    pub msg_id: u32,
    pub file: &'a str,
    pub line: u32,
    pub function: &'a str,
    pub message: &'a str,
    pub severity: i32,
}

/// An installable verbose formatter.
pub struct VerboseFormat(pub fn(record: &Record<'_>, payload: Payload<'_>));

/// Severity label for a numeric level, using the conventional bands.
pub fn severity_label(severity: i32) -> &'static str {
    if severity <= context::DEBUG {
        "DEBUG"
    } else if severity <= context::INFO {
        "INFO"
    } else if severity <= context::WARN {
        "WARN"
    } else if severity <= context::ERROR {
        "ERROR"
    } else {
        "CRITICAL"
    }
}

fn build_line(
    out: &mut FmtBuf<MAX_LINE>,
    record: &Record<'_>,
    payload: Payload<'_>,
    now_ns: u64,
    thread_name: &[u8],
) {
    let seconds = now_ns / 1_000_000_000;
    let millis = now_ns % 1_000_000_000 / 1_000_000;
    let _ = write!(
        out,
        "{seconds}.{millis:03} {} {}:{} ",
        severity_label(record.severity),
        record.file,
        record.line,
    );
    out.push_bytes(thread_name);
    let _ = write!(out, "] {}", record.message);
    if !payload.is_empty() {
        out.push_bytes(b": ");
        render_payload(out, payload);
    }
    out.terminate_line();
}

/// Default verbose formatter.
pub fn format(record: &Record<'_>, payload: Payload<'_>) {
    let hooks = platform::hooks();

    let mut name = [0u8; THREAD_NAME_BUF];
    let name_len = (hooks.thread_name)(&mut name);

    let mut line: FmtBuf<MAX_LINE> = FmtBuf::new();
    build_line(&mut line, record, payload, (hooks.clock_now)(), &name[..name_len]);
    (hooks.write)(line.as_bytes());
}

/// The default verbose format.
pub static DEFAULT_VERBOSE: VerboseFormat = VerboseFormat(format);

#[cfg(test)]
mod tests {
    use super::*;

    fn record(severity: i32) -> Record<'static> {
        Record {
            msg_id: 0x1111_2222,
            file: "src/engine.rs",
            line: 42,
            function: "",
            message: "engine started",
            severity,
        }
    }

    #[test]
    fn renders_location_name_and_payload() {
        let mut line = FmtBuf::new();
        build_line(
            &mut line,
            &record(context::INFO),
            Payload::U64(31),
            12_345_678_901,
            b"main",
        );
        build_line(&mut line, &record(context::INFO), Payload::None, 0, b"main");

        let text = core::str::from_utf8(line.as_bytes()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "12.345 INFO src/engine.rs:42 main] engine started: 31"
        );
        assert_eq!(
            lines.next().unwrap(),
            "0.000 INFO src/engine.rs:42 main] engine started"
        );
    }

    #[test]
    fn severity_bands() {
        assert_eq!(severity_label(5), "DEBUG");
        assert_eq!(severity_label(context::DEBUG), "DEBUG");
        assert_eq!(severity_label(context::INFO), "INFO");
        assert_eq!(severity_label(25), "WARN");
        assert_eq!(severity_label(context::ERROR), "ERROR");
        assert_eq!(severity_label(context::CRITICAL), "CRITICAL");
        assert_eq!(severity_label(99), "CRITICAL");
    }

    #[test]
    fn truncation_preserves_newline() {
        let long_message = "x".repeat(2000);
        let mut line = FmtBuf::new();
        build_line(
            &mut line,
            &Record {
                msg_id: 0,
                file: "f.rs",
                line: 1,
                function: "",
                message: &long_message,
                severity: context::WARN,
            },
            Payload::None,
            0,
            b"main",
        );

        assert_eq!(line.as_bytes().len(), MAX_LINE);
        assert_eq!(*line.as_bytes().last().unwrap(), b'\n');
    }
}
