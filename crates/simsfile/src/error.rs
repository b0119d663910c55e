//! Unified error type.

use thiserror::Error;

/// Any error produced by the simsfile crates.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Primitive decoding error.
    #[error(transparent)]
    Common(#[from] simsfile_common::Error),

    /// FAR archive error.
    #[error(transparent)]
    Far(#[from] simsfile_far::Error),

    /// IFF container error.
    #[error(transparent)]
    Iff(#[from] simsfile_iff::Error),

    /// CFP stream error.
    #[error(transparent)]
    Cfp(#[from] simsfile_cfp::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
