//! Binary readers for in-memory buffers and streams.
//!
//! [`BinaryReader`] is a cursor over a byte slice, used for small blocks that
//! have already been pulled out of a stream (resource-map payloads, headers).
//! [`ReadExt`] adds fixed-layout struct reads to any [`Read`] source.

use std::io::Read;

use zerocopy::FromBytes;

use crate::{Error, Result};

/// Cursor over a borrowed byte slice.
///
/// Multi-byte reads are little-endian unless the method name says otherwise.
///
/// # Example
///
/// ```
/// use simsfile_common::BinaryReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x00, 0x00, 0x00, 0x2A];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert_eq!(reader.read_u32_be().unwrap(), 42);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Start reading at offset zero of `data`.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Offset of the next byte to be read.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Length of the whole slice, read or not.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Bytes left between the cursor and the end.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// True once the cursor has reached the end.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Advance the position by a number of bytes, failing past the end.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Unread tail of the slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// The next `count` bytes, leaving the cursor in place.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if count > available {
            return Err(Error::UnexpectedEof { needed: count, available });
        }
        Ok(&self.data[self.position..][..count])
    }

    /// The next `count` bytes, moving the cursor past them.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Read the bytes of a null-terminated string.
    ///
    /// The terminator is consumed but not returned.
    pub fn read_cstring_bytes(&mut self) -> Result<&'a [u8]> {
        let tail = self.remaining_bytes();
        let end = memchr::memchr(0, tail).ok_or(Error::MissingNullTerminator)?;
        self.position += end + 1;
        Ok(&tail[..end])
    }

    /// Read the bytes of a string prefixed by a single length byte.
    pub fn read_pascal_bytes(&mut self) -> Result<&'a [u8]> {
        let length = self.read_u8()? as usize;
        self.read_bytes(length)
    }

    /// Skip one byte if `field_len` is odd, keeping fields 2-byte aligned.
    pub fn skip_even_pad(&mut self, field_len: usize) -> Result<()> {
        if field_len % 2 == 1 {
            self.skip(1)?;
        }
        Ok(())
    }
}

/// Fixed-layout reads from streams.
///
/// Short reads surface as [`Error::UnexpectedEof`] rather than a bare I/O error.
pub trait ReadExt: Read {
    /// Decode one `FromBytes` value from the next `size_of::<T>()` bytes.
    fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let bytes = self.read_vec(std::mem::size_of::<T>())?;
        T::read_from_bytes(&bytes).map_err(|_| Error::UnexpectedEof {
            needed: std::mem::size_of::<T>(),
            available: bytes.len(),
        })
    }

    /// Read exactly `len` bytes into a new buffer.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; len];
        self.read_exact(&mut bytes)
            .map_err(|e| Error::from_read(e, len))?;
        Ok(bytes)
    }
}

impl<R: Read + ?Sized> ReadExt for R {}
