//! Per-resource header.
//!
//! Every resource in an IFF file, in both container versions, starts with the
//! same 76-byte big-endian header.

use zerocopy::byteorder::{BigEndian, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::TypeCode;

/// On-disk resource header (76 bytes, big-endian).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct RawResourceHeader {
    pub typecode: [u8; 4],
    /// Total resource size, header included.
    pub size: U32<BigEndian>,
    pub id: U16<BigEndian>,
    pub flags: U16<BigEndian>,
    /// NUL-padded label.
    pub name: [u8; 64],
}

impl RawResourceHeader {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// A decoded resource header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceHeader {
    pub typecode: TypeCode,
    /// Total resource size, header included.
    pub size: u32,
    pub id: u16,
    pub flags: u16,
    pub name: String,
}

impl ResourceHeader {
    /// Encoded header length.
    pub const SIZE: u32 = RawResourceHeader::SIZE as u32;

    /// Decode from the raw layout, cutting the name at its first NUL.
    pub fn from_raw(raw: &RawResourceHeader) -> Self {
        let name_len = memchr::memchr(0, &raw.name).unwrap_or(raw.name.len());
        Self {
            typecode: TypeCode(raw.typecode),
            size: raw.size.get(),
            id: raw.id.get(),
            flags: raw.flags.get(),
            name: String::from_utf8_lossy(&raw.name[..name_len]).into_owned(),
        }
    }

    /// Number of payload bytes following the header.
    #[inline]
    pub fn payload_len(&self) -> u32 {
        self.size.saturating_sub(Self::SIZE)
    }

    /// Borrow this header as a predicate argument for a resource at `offset`.
    pub fn to_ref(&self, offset: u64) -> ResourceRef<'_> {
        ResourceRef {
            typecode: self.typecode,
            id: self.id,
            flags: u32::from(self.flags),
            name: &self.name,
            offset,
        }
    }
}

/// The fields a resource can be selected by.
///
/// Both resource headers and resource-map entries produce one, so the same
/// predicate works during the map pass and the scan pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef<'a> {
    pub typecode: TypeCode,
    pub id: u16,
    pub flags: u32,
    pub name: &'a str,
    /// Absolute offset of the resource header.
    pub offset: u64,
}

impl ResourceRef<'_> {
    /// Whether this resource has the given type code.
    #[inline]
    pub fn is<T: Into<TypeCode>>(&self, typecode: T) -> bool {
        self.typecode == typecode.into()
    }
}
