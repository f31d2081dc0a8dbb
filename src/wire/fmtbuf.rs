//! Bounded in-place text assembly.
//!
//! The textual serializer and the verbose formatter render into fixed stack
//! buffers; overflowing output is truncated, never an error, and a finished
//! line always ends in a newline even when truncated.

use core::fmt;

use heapless::Vec;

pub(crate) struct FmtBuf<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> FmtBuf<N> {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends as much of `bytes` as fits.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let space = N - self.buf.len();
        let take = bytes.len().min(space);
        // Cannot fail: `take` is clipped to the remaining capacity.
        let _ = self.buf.extend_from_slice(&bytes[..take]);
    }

    pub fn push(&mut self, byte: u8) {
        let _ = self.buf.push(byte);
    }

    /// Ends the line, overwriting the final byte when the buffer is full so
    /// the newline survives truncation.
    pub fn terminate_line(&mut self) {
        if self.buf.len() == N {
            self.buf[N - 1] = b'\n';
        } else {
            let _ = self.buf.push(b'\n');
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl<const N: usize> fmt::Write for FmtBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes());
        Ok(())
    }
}
