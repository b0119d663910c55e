//! Error types for IFF parsing.

use thiserror::Error;

/// Errors that can occur when working with IFF resource containers.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] simsfile_common::Error),

    /// The leading or secondary signature is wrong.
    #[error("invalid IFF signature: {0}")]
    InvalidSignature(String),

    /// The container or resource map version is not one this crate reads.
    #[error("unsupported IFF version: {0}")]
    UnsupportedVersion(String),

    /// Structural data is inconsistent.
    #[error("malformed IFF data: {0}")]
    Format(String),

    /// No resource satisfied the predicate.
    #[error("resource not found")]
    ResourceNotFound,

    /// A header or resource runs past the end of the stream.
    #[error("truncated resource at offset {offset}: needed {needed} bytes but only {available} available")]
    Truncated {
        offset: u64,
        needed: u64,
        available: u64,
    },
}

/// Result type for IFF operations.
pub type Result<T> = std::result::Result<T, Error>;
