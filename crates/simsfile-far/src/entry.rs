//! FAR archive entry.

use std::path::Path;

/// An entry (file) within a FAR archive.
///
/// This contains the location of the file, not the file data itself.
/// Use [`FarArchive::open`](crate::FarArchive::open) to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FarEntry {
    name: String,
    offset: u64,
    stored_len: u64,
    logical_len: u64,
}

impl FarEntry {
    pub(crate) fn new(name: String, offset: u64, stored_len: u64, logical_len: u64) -> Self {
        Self {
            name,
            offset,
            stored_len,
            logical_len,
        }
    }

    /// Get the entry name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute offset of the data in the archive.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of bytes the entry occupies.
    #[inline]
    pub fn stored_len(&self) -> u64 {
        self.stored_len
    }

    /// The manifest's second length field.
    ///
    /// Never observed to differ from [`stored_len`](Self::stored_len); it is
    /// carried as metadata only and does not trigger any decompression.
    #[inline]
    pub fn logical_len(&self) -> u64 {
        self.logical_len
    }

    /// Absolute offset one past the last byte.
    #[inline]
    pub fn end(&self) -> u64 {
        self.offset + self.stored_len
    }

    /// Get the file extension, if any.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}
