//! Error types for simsfile-common.

use std::io;

use thiserror::Error;

/// Common error type for simsfile operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of input reached while reading.
    #[error("unexpected end of input: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A primitive value could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Missing null terminator in string.
    #[error("string missing null terminator")]
    MissingNullTerminator,
}

impl Error {
    /// Map an I/O error from a stream read, turning a short read into
    /// [`Error::UnexpectedEof`].
    pub fn from_read(err: io::Error, needed: usize) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof {
                needed,
                available: 0,
            }
        } else {
            Self::Io(err)
        }
    }

    /// Whether this error means the input ended early.
    pub fn is_truncation(&self) -> bool {
        match self {
            Self::UnexpectedEof { .. } => true,
            Self::Io(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
