//! Textual frame serialization.
//!
//! One ASCII line per message, still ID-based (the format string lives in
//! external tooling) but readable enough to eyeball and cheap to split:
//!
//! ```text
//! $<seconds>.<microseconds>,<msg_id_hex8>,<thread_slot>[,<payload>]\n
//! ```
//!
//! `u64` payloads render as decimal, string payloads as raw text up to the
//! first NUL, absent payloads omit the trailing comma. The `$` prefix keeps
//! log lines separable from other stdout traffic.

use core::fmt::Write as _;

use crate::ident;
use crate::payload::Payload;
use crate::platform;
use crate::wire::fmtbuf::FmtBuf;
use crate::wire::{SerializeFormat, MAX_FRAME_SIZE};

/// Appends the payload's textual form: decimal for `U64`, raw bytes up to
/// the first NUL for `Str`. Shared with the verbose formatter.
pub(crate) fn render_payload<const N: usize>(out: &mut FmtBuf<N>, payload: Payload<'_>) {
    match payload {
        Payload::None => {}
        Payload::U64(value) => {
            let _ = write!(out, "{value}");
        }
        Payload::Str(bytes) => {
            let visible = bytes
                .iter()
                .position(|&b| b == 0)
                .map_or(bytes, |nul| &bytes[..nul]);
            out.push_bytes(visible);
        }
    }
}

fn build_line(line: &mut FmtBuf<MAX_FRAME_SIZE>, msg_id: u32, payload: Payload<'_>, now_ns: u64) {
    let seconds = now_ns / 1_000_000_000;
    let micros = now_ns % 1_000_000_000 / 1_000;
    let _ = write!(
        line,
        "${seconds}.{micros:06},{msg_id:08X},{}",
        ident::thread_slot()
    );
    if !payload.is_empty() {
        line.push(b',');
        render_payload(line, payload);
    }
    line.terminate_line();
}

/// Textual serializer.
pub fn serialize(msg_id: u32, payload: Payload<'_>) {
    ident::announce_if_needed();

    let hooks = platform::hooks();
    let mut line: FmtBuf<MAX_FRAME_SIZE> = FmtBuf::new();
    build_line(&mut line, msg_id, payload, (hooks.clock_now)());
    (hooks.write)(line.as_bytes());
}

/// The textual format: the process-wide default until another format is
/// installed.
pub static DEFAULT_TEXT: SerializeFormat = SerializeFormat(serialize);
