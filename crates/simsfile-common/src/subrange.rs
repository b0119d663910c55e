//! Bounded, independently-cursored views over a shared stream.
//!
//! Archive and resource containers never hand out copies of entry data.
//! They hand out [`SubRangeStream`]s: `[begin, end)` windows over a
//! caller-owned physical stream. Any number of views may alias one stream.
//! Each view remembers its own position and seeks the shared stream back to
//! it before every read, so views can be used in any interleaving.
//!
//! The physical stream lives in a [`RefCell`] owned by the caller. Views
//! borrow it only for the duration of a single read, and never close it.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

use crate::{Error, Result};

/// A read-only `[begin, end)` window over a shared `Read + Seek` stream.
///
/// Seeking follows these clamping rules (all results are relative to `begin`):
///
/// - `SeekFrom::Start(n)` lands at `begin + n`, clamped to `[begin, end - 1]`.
///   The upper bound is one byte short of `end`; existing consumers rely on
///   this, so it is kept as-is.
/// - `SeekFrom::Current(n)` moves from the tracked position, clamped to
///   `[begin, end]`.
/// - `SeekFrom::End(n)` lands at `end + n`, clamped to `[begin, end]`.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::io::{Cursor, Read};
/// use simsfile_common::SubRangeStream;
///
/// let file = RefCell::new(Cursor::new(b"..hello..".to_vec()));
/// let mut a = SubRangeStream::new(&file, 2, 5);
/// let mut b = SubRangeStream::new(&file, 2, 5);
///
/// let mut head = [0u8; 2];
/// a.read_exact(&mut head).unwrap();
/// assert_eq!(b.read_remaining().unwrap(), b"hello");
/// assert_eq!(a.read_remaining().unwrap(), b"llo");
/// ```
pub struct SubRangeStream<'a, R> {
    source: &'a RefCell<R>,
    begin: u64,
    end: u64,
    /// Absolute position in the shared stream.
    position: u64,
}

impl<'a, R> SubRangeStream<'a, R> {
    /// Create a view over `len` bytes starting at absolute offset `begin`.
    ///
    /// No I/O happens until the first read.
    pub fn new(source: &'a RefCell<R>, begin: u64, len: u64) -> Self {
        let end = begin.saturating_add(len);
        Self {
            source,
            begin,
            end,
            position: begin,
        }
    }

    /// Absolute offset of the first byte of the view.
    #[inline]
    pub fn begin(&self) -> u64 {
        self.begin
    }

    /// Absolute offset one past the last byte of the view.
    #[inline]
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Length of the view in bytes.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.begin
    }

    /// Whether the view covers zero bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.begin
    }

    /// Position relative to `begin`.
    #[inline]
    pub fn tell(&self) -> u64 {
        self.position - self.begin
    }

    /// Position in the shared stream.
    #[inline]
    pub fn absolute_position(&self) -> u64 {
        self.position
    }

    /// Bytes left before `end`.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.end - self.position
    }

    /// The shared stream this view reads from.
    #[inline]
    pub fn source(&self) -> &'a RefCell<R> {
        self.source
    }

    /// A nested view of `len` bytes at `offset` relative to this view's
    /// `begin`, clipped to this view's bounds.
    pub fn sub_range(&self, offset: u64, len: u64) -> SubRangeStream<'a, R> {
        let begin = self.begin.saturating_add(offset).min(self.end);
        let len = len.min(self.end - begin);
        SubRangeStream::new(self.source, begin, len)
    }

    fn clamp_seek(&self, pos: SeekFrom) -> u64 {
        match pos {
            SeekFrom::Start(offset) => {
                let last = self.end.saturating_sub(1).max(self.begin);
                self.begin.saturating_add(offset).min(last)
            }
            SeekFrom::Current(delta) => offset_clamped(self.position, delta, self.begin, self.end),
            SeekFrom::End(delta) => offset_clamped(self.end, delta, self.begin, self.end),
        }
    }
}

fn offset_clamped(base: u64, delta: i64, low: u64, high: u64) -> u64 {
    let target = if delta >= 0 {
        base.saturating_add(delta.unsigned_abs())
    } else {
        base.saturating_sub(delta.unsigned_abs())
    };
    target.clamp(low, high)
}

impl<'a, R: Read + Seek> SubRangeStream<'a, R> {
    /// Read up to `n` bytes, never past `end`.
    pub fn read_up_to(&mut self, n: usize) -> Result<Vec<u8>> {
        let want = (n as u64).min(self.remaining()) as usize;
        let mut buf = vec![0u8; want];
        let got = self.fill(&mut buf)?;
        buf.truncate(got);
        Ok(buf)
    }

    /// Read everything from the current position up to `end`.
    pub fn read_remaining(&mut self) -> Result<Vec<u8>> {
        let remaining = usize::try_from(self.remaining())
            .map_err(|_| Error::Decode("sub-range too large for memory".to_string()))?;
        self.read_up_to(remaining)
    }

    /// Look at the next `n` bytes without moving this view's cursor.
    pub fn peek(&mut self, n: usize) -> Result<Vec<u8>> {
        let saved = self.position;
        let result = self.read_up_to(n);
        self.position = saved;
        result
    }

    /// Re-sync the shared stream to this view's position and read as much of
    /// `buf` as the range and the stream allow.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let want = (buf.len() as u64).min(self.remaining()) as usize;
        if want == 0 {
            return Ok(0);
        }

        let mut source = self.source.try_borrow_mut().map_err(|_| {
            io::Error::new(io::ErrorKind::WouldBlock, "shared stream is already borrowed")
        })?;
        // A source that is itself a view clamps start seeks short of its end;
        // landing anywhere else means there is nothing left to read.
        let landed = source.seek(SeekFrom::Start(self.position))?;
        if landed != self.position {
            return Ok(0);
        }

        let mut total = 0;
        while total < want {
            match source.read(&mut buf[total..want]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        self.position += total as u64;
        Ok(total)
    }
}

impl<R: Read + Seek> Read for SubRangeStream<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.fill(buf)
    }
}

impl<R> Seek for SubRangeStream<'_, R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.position = self.clamp_seek(pos);
        Ok(self.tell())
    }
}

impl<R> Clone for SubRangeStream<'_, R> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            begin: self.begin,
            end: self.end,
            position: self.position,
        }
    }
}

impl<R> fmt::Debug for SubRangeStream<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubRangeStream")
            .field("begin", &self.begin)
            .field("end", &self.end)
            .field("position", &self.position)
            .finish()
    }
}
