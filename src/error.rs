//! Error types for consumer-side operations.
//!
//! The log path itself is infallible by design: oversized payloads are
//! clipped, a lost clock yields a zero delta, and buffer overruns surface
//! through the reader's overflow callback rather than as errors. What can
//! fail is the consumer side: a transport refusing a frame, or a pump
//! configured against an incompatible buffer. Those failures carry a
//! backtrace when `std` is enabled.

use core::fmt;

#[cfg(feature = "std")]
use std::backtrace::Backtrace;

/// Result type alias for consumer-side operations.
pub type Result<T> = core::result::Result<T, MinLogError>;

// =============================================================================
// Error Kind Enums (Internal)
// =============================================================================

/// Transport error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum TransportErrorKind {
    SendFailed,
    NotReady,
    SocketError,
}

/// Pump configuration error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum ConfigErrorKind {
    PacketSize,
}

/// Frame decoding error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum FrameErrorKind {
    BadSync,
    Truncated,
}

// =============================================================================
// Main Error Type
// =============================================================================

/// Error type returned by consumer-side operations.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MinLogError {
    /// Transport-related errors (send failed, sink not ready, socket)
    Transport(TransportError),
    /// Pump configuration errors (packet size vs. buffer capacity)
    Config(ConfigError),
    /// Frame decoding errors (bad sync word, short buffer)
    Frame(FrameError),
}

// =============================================================================
// Structured Error Types
// =============================================================================

/// Transport error with optional backtrace
#[derive(Debug)]
pub struct TransportError {
    kind: TransportErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl TransportError {
    pub(crate) fn new(kind: TransportErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if the sink rejected the frame
    pub fn is_send_failed(&self) -> bool {
        matches!(self.kind, TransportErrorKind::SendFailed)
    }

    /// Check if the sink was not ready to accept data
    pub fn is_not_ready(&self) -> bool {
        matches!(self.kind, TransportErrorKind::NotReady)
    }
}

/// Pump configuration error with optional backtrace
#[derive(Debug)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl ConfigError {
    pub(crate) fn new(kind: ConfigErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if the packet size is incompatible with the buffer
    pub fn is_packet_size(&self) -> bool {
        matches!(self.kind, ConfigErrorKind::PacketSize)
    }
}

/// Frame decoding error with optional backtrace
#[derive(Debug)]
pub struct FrameError {
    kind: FrameErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl FrameError {
    pub(crate) fn new(kind: FrameErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if the sync word did not match
    pub fn is_bad_sync(&self) -> bool {
        matches!(self.kind, FrameErrorKind::BadSync)
    }

    /// Check if the buffer ended before the frame did
    pub fn is_truncated(&self) -> bool {
        matches!(self.kind, FrameErrorKind::Truncated)
    }
}

// =============================================================================
// Convenience Constructors
// =============================================================================

impl MinLogError {
    // Transport errors (public: external `Transport` impls construct these)
    pub fn send_failed() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::SendFailed))
    }

    pub fn not_ready() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::NotReady))
    }

    pub fn socket_error() -> Self {
        Self::Transport(TransportError::new(TransportErrorKind::SocketError))
    }

    // Configuration errors
    pub(crate) fn packet_size() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::PacketSize))
    }

    // Frame errors
    pub(crate) fn bad_sync() -> Self {
        Self::Frame(FrameError::new(FrameErrorKind::BadSync))
    }

    pub(crate) fn truncated_frame() -> Self {
        Self::Frame(FrameError::new(FrameErrorKind::Truncated))
    }
}

// The backtrace has no defmt rendering; format just the kind.
#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.kind);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.kind);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.kind);
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl fmt::Display for MinLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinLogError::Transport(e) => write!(f, "Transport error: {:?}", e.kind),
            MinLogError::Config(e) => write!(f, "Config error: {:?}", e.kind),
            MinLogError::Frame(e) => write!(f, "Frame error: {:?}", e.kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MinLogError {}
