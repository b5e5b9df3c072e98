//! Error types for sensor acquisition
//!
//! Every way a read can go wrong maps to one [`SensorError`] variant so the
//! monitor loop has a single failure kind to recover from. The variants keep
//! enough context to log an actionable message; none of them is fatal on its
//! own — the loop-level policy decides whether to continue or surface the
//! error to the user.

use thiserror::Error;

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Acquisition failures reported by a sensor reader
#[derive(Debug, Error)]
pub enum SensorError {
    /// The serial device is unreachable or the transfer failed mid-frame
    #[error("serial I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The device returned fewer bytes than a complete reply frame
    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead {
        /// Reply frame length the protocol requires
        expected: usize,
        /// Bytes actually received
        got: usize,
    },

    /// Frame delimiters or reply type did not match the wire protocol
    #[error("malformed frame: {reason}")]
    MalformedFrame {
        /// What about the frame was wrong
        reason: &'static str,
    },

    /// The reply checksum did not match the payload
    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    BadChecksum {
        /// Checksum computed over the received payload
        expected: u8,
        /// Checksum byte the device sent
        actual: u8,
    },

    /// A decoded concentration was NaN, infinite, or negative
    #[error("invalid concentration value")]
    InvalidValue,
}
