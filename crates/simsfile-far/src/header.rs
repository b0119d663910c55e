//! On-disk FAR structures.

use zerocopy::byteorder::{LittleEndian, I32, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// FAR file header.
///
/// The header sits at offset 0 and points at the manifest, which in practice
/// follows all entry data at the end of the file.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct FarHeader {
    /// Signature, always `FAR!byAZ`.
    pub magic: [u8; 8],
    /// Format version.
    pub version: I32<LittleEndian>,
    /// Absolute offset of the manifest.
    pub manifest_offset: U32<LittleEndian>,
}

impl FarHeader {
    /// The signature bytes at the start of every FAR file.
    pub const MAGIC: &'static [u8; 8] = b"FAR!byAZ";

    /// The only version this crate reads.
    pub const SUPPORTED_VERSION: i32 = 1;

    /// Size of the header on disk.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Fixed part of a manifest record. The entry name follows it directly.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ManifestRecord {
    /// Bytes occupied in the archive.
    pub stored_len: U32<LittleEndian>,
    /// Second length field; equal to `stored_len` in every known archive.
    pub logical_len: U32<LittleEndian>,
    /// Absolute offset of the entry data.
    pub offset: U32<LittleEndian>,
    /// Length of the name that follows.
    pub name_len: U32<LittleEndian>,
}

impl ManifestRecord {
    /// Size of the fixed part on disk.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}
