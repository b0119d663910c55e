//! Four-character resource type codes.

use std::fmt;

/// A resource type tag such as `STR#`, `BHAV` or `OBJD`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeCode(pub [u8; 4]);

impl TypeCode {
    /// The resource map.
    pub const RSMP: Self = Self(*b"rsmp");

    /// The global reference naming the semi-global file an object uses.
    pub const GLOB: Self = Self(*b"GLOB");

    /// Create a type code from its canonical byte order.
    #[inline]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Create a type code from a byte-swapped field, as stored in the
    /// resource map.
    #[inline]
    pub const fn from_reversed(bytes: [u8; 4]) -> Self {
        Self([bytes[3], bytes[2], bytes[1], bytes[0]])
    }

    /// The same code with its bytes swapped.
    #[inline]
    pub const fn reversed(self) -> Self {
        Self::from_reversed(self.0)
    }

    /// The four bytes in canonical order.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for TypeCode {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<&[u8; 4]> for TypeCode {
    fn from(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }
}

impl PartialEq<[u8; 4]> for TypeCode {
    fn eq(&self, other: &[u8; 4]) -> bool {
        &self.0 == other
    }
}

impl PartialEq<&[u8; 4]> for TypeCode {
    fn eq(&self, other: &&[u8; 4]) -> bool {
        &self.0 == *other
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

impl fmt::Debug for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeCode(\"{self}\")")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TypeCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
