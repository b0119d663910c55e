//! Error types for CFP decoding.

use thiserror::Error;

/// Errors that can occur while decoding a compressed float stream.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A repeat or delta code appeared before any raw value.
    #[error("{opcode:#04x} at value {decoded} needs a previous value, but none was decoded yet")]
    InvalidState { opcode: u8, decoded: usize },

    /// A reserved opcode was encountered.
    #[error("unsupported opcode {0:#04x}")]
    UnsupportedOpcode(u8),

    /// The stream would produce a different number of values than requested.
    #[error("length mismatch: requested {expected} values, stream produces {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Channel counts add up to more values than can be addressed.
    #[error("channel counts overflow")]
    CountOverflow,

    /// Input ended before the requested count was decoded.
    #[error("input ended after {decoded} values")]
    Truncated { decoded: usize },
}

/// Result type for CFP operations.
pub type Result<T> = std::result::Result<T, Error>;
