//! Error types for the FAR crate.

use thiserror::Error;

/// Errors that can occur when working with FAR archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] simsfile_common::Error),

    /// The file does not start with `FAR!byAZ`.
    #[error("invalid FAR signature: expected \"FAR!byAZ\", got {actual:?}")]
    InvalidMagic { actual: Vec<u8> },

    /// Only version 1 archives are understood.
    #[error("unsupported FAR version: {0}")]
    UnsupportedVersion(i32),

    /// The manifest is structurally inconsistent with the file.
    #[error("malformed FAR manifest: {0}")]
    Format(String),

    /// No entry has the requested name.
    #[error("entry not found: {0}")]
    EntryNotFound(String),
}

/// Result type for FAR operations.
pub type Result<T> = std::result::Result<T, Error>;
