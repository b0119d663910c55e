//! Resource map (`rsmp`) parsing.
//!
//! Version 2.5 files may carry a resource map: a lookup table listing
//! resources grouped by type. It is a cache written by the game's tools and
//! is not guaranteed to be complete or current.
//!
//! # Layout
//!
//! ```text
//! u32  reserved
//! u32  map version (0 or 1)
//! [4]  "rsmp" (either byte order)
//! u32  size
//! u32  type group count
//! groups:
//!     [4]  type code, byte-swapped
//!     u32  entry count
//!     entries (v0): u32 offset, u16 id, u16 flags, NUL-terminated name, pad
//!     entries (v1): u32 offset, u16 id, u32 flags, length-prefixed name, pad
//! ```
//!
//! Numeric fields are little-endian. Names are padded to an even length.

use simsfile_common::BinaryReader;
use tracing::trace;

use crate::header::ResourceRef;
use crate::{Error, Result, TypeCode};

/// Maximum number of type groups accepted in one map.
pub const MAX_TYPE_GROUPS: u32 = 4096;

/// Maximum number of entries accepted in one type group.
pub const MAX_GROUP_ENTRIES: u32 = 65536;

/// One resource listed in the map.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceMapEntry {
    pub typecode: TypeCode,
    /// Absolute offset of the resource header.
    pub offset: u32,
    pub id: u16,
    /// Widened to 32 bits; version 0 maps store 16.
    pub flags: u32,
    pub name: String,
}

impl ResourceMapEntry {
    /// Borrow this entry as a predicate argument.
    pub fn to_ref(&self) -> ResourceRef<'_> {
        ResourceRef {
            typecode: self.typecode,
            id: self.id,
            flags: self.flags,
            name: &self.name,
            offset: u64::from(self.offset),
        }
    }
}

/// A parsed resource map, flattened in on-disk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceMap {
    version: u32,
    entries: Vec<ResourceMapEntry>,
}

impl ResourceMap {
    /// Parse a map from its resource payload (the bytes after the header).
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(payload);
        Self::parse_inner(&mut reader).map_err(|e| match e {
            Error::Common(inner) => {
                Error::Format(format!("resource map does not fit its resource: {inner}"))
            }
            other => other,
        })
    }

    fn parse_inner(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let _reserved = reader.read_u32()?;
        let version = reader.read_u32()?;
        let tag = TypeCode(reader.read_array()?);
        let _size = reader.read_u32()?;
        let group_count = reader.read_u32()?;

        if tag != TypeCode::RSMP && tag.reversed() != TypeCode::RSMP {
            return Err(Error::Format(format!("resource map tag is {tag}, expected rsmp")));
        }
        if version > 1 {
            return Err(Error::UnsupportedVersion(format!("resource map version {version}")));
        }
        if group_count > MAX_TYPE_GROUPS {
            return Err(Error::Format(format!(
                "resource map has {group_count} type groups (max {MAX_TYPE_GROUPS})"
            )));
        }

        let mut entries = Vec::new();
        for _ in 0..group_count {
            let typecode = TypeCode::from_reversed(reader.read_array()?);
            let count = reader.read_u32()?;
            if count > MAX_GROUP_ENTRIES {
                return Err(Error::Format(format!(
                    "resource map group {typecode} has {count} entries (max {MAX_GROUP_ENTRIES})"
                )));
            }

            // Each entry needs at least 9 bytes, so a count larger than the
            // payload can hold is caught here rather than by the allocator.
            let min_len = count as usize * 9;
            if min_len > reader.remaining() {
                return Err(Error::Format(format!(
                    "resource map group {typecode} claims {count} entries in {} bytes",
                    reader.remaining()
                )));
            }
            entries.reserve(count as usize);

            for _ in 0..count {
                let entry = read_entry(reader, version, typecode)?;
                trace!(
                    typecode = %entry.typecode,
                    id = entry.id,
                    offset = entry.offset,
                    "map entry"
                );
                entries.push(entry);
            }
        }

        Ok(Self { version, entries })
    }

    /// Map format version (0 or 1).
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// All entries, in map order.
    #[inline]
    pub fn entries(&self) -> &[ResourceMapEntry] {
        &self.entries
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map lists no resources.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_entry(reader: &mut BinaryReader<'_>, version: u32, typecode: TypeCode) -> Result<ResourceMapEntry> {
    let offset = reader.read_u32()?;
    let id = reader.read_u16()?;

    let (flags, name) = if version == 0 {
        let flags = u32::from(reader.read_u16()?);
        let name = reader.read_cstring_bytes()?;
        (flags, name)
    } else {
        let flags = reader.read_u32()?;
        let name = reader.read_pascal_bytes()?;
        (flags, name)
    };
    // Terminator or length byte plus the name.
    reader.skip_even_pad(name.len() + 1)?;

    Ok(ResourceMapEntry {
        typecode,
        offset,
        id,
        flags,
        name: String::from_utf8_lossy(name).into_owned(),
    })
}
