//! Primitive value streams over binary and text encodings.
//!
//! Several asset formats exist twice: a verbose ASCII variant with one value
//! per line, and a dense binary variant with little-endian words. The record
//! layout is identical, only the encoding of numbers and strings differs.
//! Schema decoders are written once against [`PrimitiveStream`] and run over
//! either [`BinaryStream`] or [`TextStream`].
//!
//! [`DataStream::sniff`] picks the variant from the first four bytes of the
//! input without consuming them.

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;

use crate::{Error, Result};

/// Sequential reader of integers, floats and strings.
pub trait PrimitiveStream {
    /// Read one unsigned 32-bit integer.
    fn read_int(&mut self) -> Result<u32>;

    /// Read exactly `count` integers.
    fn read_ints(&mut self, count: usize) -> Result<Vec<u32>>;

    /// Read one 32-bit float.
    fn read_float(&mut self) -> Result<f32>;

    /// Read exactly `count` floats.
    fn read_floats(&mut self, count: usize) -> Result<Vec<f32>>;

    /// Read one ASCII string.
    fn read_str(&mut self) -> Result<String>;
}

impl<T: PrimitiveStream + ?Sized> PrimitiveStream for &mut T {
    fn read_int(&mut self) -> Result<u32> {
        (**self).read_int()
    }

    fn read_ints(&mut self, count: usize) -> Result<Vec<u32>> {
        (**self).read_ints(count)
    }

    fn read_float(&mut self) -> Result<f32> {
        (**self).read_float()
    }

    fn read_floats(&mut self, count: usize) -> Result<Vec<f32>> {
        (**self).read_floats(count)
    }

    fn read_str(&mut self) -> Result<String> {
        (**self).read_str()
    }
}

/// Little-endian binary encoding.
///
/// Integers and floats are 4-byte words; strings carry a one-byte length
/// prefix.
#[derive(Debug)]
pub struct BinaryStream<R> {
    inner: R,
}

impl<R: Read> BinaryStream<R> {
    /// Wrap a byte stream.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read `count` words without trusting `count` for an up-front allocation.
    fn read_words(&mut self, count: usize) -> Result<Vec<u8>> {
        let needed = count
            .checked_mul(4)
            .ok_or_else(|| Error::Decode(format!("sequence of {count} values is too long")))?;
        let mut bytes = Vec::new();
        (&mut self.inner)
            .take(needed as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() < needed {
            return Err(Error::UnexpectedEof {
                needed,
                available: bytes.len(),
            });
        }
        Ok(bytes)
    }
}

impl<R: Read> PrimitiveStream for BinaryStream<R> {
    fn read_int(&mut self) -> Result<u32> {
        self.inner
            .read_u32::<LittleEndian>()
            .map_err(|e| Error::from_read(e, 4))
    }

    fn read_ints(&mut self, count: usize) -> Result<Vec<u32>> {
        let bytes = self.read_words(count)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
            .collect())
    }

    fn read_float(&mut self) -> Result<f32> {
        self.inner
            .read_f32::<LittleEndian>()
            .map_err(|e| Error::from_read(e, 4))
    }

    fn read_floats(&mut self, count: usize) -> Result<Vec<f32>> {
        let bytes = self.read_words(count)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|w| f32::from_le_bytes([w[0], w[1], w[2], w[3]]))
            .collect())
    }

    fn read_str(&mut self) -> Result<String> {
        let length = self.inner.read_u8().map_err(|e| Error::from_read(e, 1))? as usize;
        let mut bytes = vec![0u8; length];
        self.inner
            .read_exact(&mut bytes)
            .map_err(|e| Error::from_read(e, length))?;
        if !bytes.is_ascii() {
            return Err(Error::Decode("string is not ASCII".to_string()));
        }
        String::from_utf8(bytes).map_err(|e| Error::Utf8(e.utf8_error()))
    }
}

/// Options for [`TextStream`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextOptions {
    /// Leading lines to discard before the first value.
    pub skip_lines: usize,
    /// Characters that bracket a sequence line, e.g. `"|"` for `| 1 0 0 |`.
    pub sequence_delimiters: String,
}

impl TextOptions {
    /// Skip `lines` leading lines.
    pub fn skip_lines(mut self, lines: usize) -> Self {
        self.skip_lines = lines;
        self
    }

    /// Strip `delimiters` from both ends of sequence lines.
    pub fn sequence_delimiters(mut self, delimiters: impl Into<String>) -> Self {
        self.sequence_delimiters = delimiters.into();
        self
    }
}

/// Line-oriented ASCII encoding.
///
/// Each scalar occupies one line; a sequence occupies one line of
/// whitespace-separated values, optionally bracketed by delimiter characters.
#[derive(Debug)]
pub struct TextStream<R> {
    inner: R,
    delimiters: Vec<char>,
    line: String,
    line_number: usize,
}

impl<R: BufRead> TextStream<R> {
    /// Wrap a buffered stream, discarding `options.skip_lines` lines.
    pub fn new(inner: R, options: TextOptions) -> Result<Self> {
        let mut stream = Self {
            inner,
            delimiters: options.sequence_delimiters.chars().collect(),
            line: String::new(),
            line_number: 0,
        };
        for _ in 0..options.skip_lines {
            stream.advance_line()?;
        }
        Ok(stream)
    }

    /// Number of lines consumed so far, including skipped ones.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn advance_line(&mut self) -> Result<()> {
        self.line.clear();
        let read = self.inner.read_line(&mut self.line).map_err(|e| {
            if e.kind() == io::ErrorKind::InvalidData {
                Error::Decode(format!("line {} is not valid text", self.line_number + 1))
            } else {
                Error::Io(e)
            }
        })?;
        if read == 0 {
            return Err(Error::UnexpectedEof {
                needed: 1,
                available: 0,
            });
        }
        self.line_number += 1;
        if !self.line.is_ascii() {
            return Err(Error::Decode(format!(
                "line {} is not ASCII",
                self.line_number
            )));
        }
        Ok(())
    }

    fn current_line(&self) -> &str {
        self.line.trim_end_matches(['\r', '\n'])
    }

    fn parse_scalar<T: std::str::FromStr>(&mut self, kind: &str) -> Result<T> {
        self.advance_line()?;
        let token = self.current_line().trim();
        token.parse().map_err(|_| {
            Error::Decode(format!(
                "line {}: invalid {kind} {token:?}",
                self.line_number
            ))
        })
    }

    fn parse_sequence<T: std::str::FromStr>(&mut self, count: usize, kind: &str) -> Result<Vec<T>> {
        self.advance_line()?;
        let line_number = self.line_number;
        let body = self
            .current_line()
            .trim()
            .trim_matches(self.delimiters.as_slice())
            .trim();

        let values = body
            .split_whitespace()
            .map(|token| {
                token.parse().map_err(|_| {
                    Error::Decode(format!("line {line_number}: invalid {kind} {token:?}"))
                })
            })
            .collect::<Result<Vec<T>>>()?;

        if values.len() != count {
            return Err(Error::Decode(format!(
                "line {line_number}: expected {count} values, found {}",
                values.len()
            )));
        }
        Ok(values)
    }
}

impl<R: BufRead> PrimitiveStream for TextStream<R> {
    fn read_int(&mut self) -> Result<u32> {
        self.parse_scalar("integer")
    }

    fn read_ints(&mut self, count: usize) -> Result<Vec<u32>> {
        self.parse_sequence(count, "integer")
    }

    fn read_float(&mut self) -> Result<f32> {
        self.parse_scalar("float")
    }

    fn read_floats(&mut self, count: usize) -> Result<Vec<f32>> {
        self.parse_sequence(count, "float")
    }

    fn read_str(&mut self) -> Result<String> {
        self.advance_line()?;
        Ok(self.current_line().trim_end().to_string())
    }
}

/// A [`PrimitiveStream`] whose encoding was chosen when it was opened.
#[derive(Debug)]
pub enum DataStream<R> {
    /// Dense little-endian encoding.
    Binary(BinaryStream<R>),
    /// Verbose line-per-value encoding.
    Text(TextStream<BufReader<R>>),
}

impl<R: Read + Seek> DataStream<R> {
    /// Open `reader`, choosing the text variant when its first four bytes
    /// equal `text_signature` and the binary variant otherwise.
    ///
    /// The signature bytes are not consumed.
    pub fn sniff(mut reader: R, text_signature: &[u8; 4], options: TextOptions) -> Result<Self> {
        let magic = peek_bytes(&mut reader, 4)?;
        if magic.as_slice() == text_signature {
            debug!(skip_lines = options.skip_lines, "opening text data stream");
            Ok(Self::Text(TextStream::new(BufReader::new(reader), options)?))
        } else {
            debug!("opening binary data stream");
            Ok(Self::Binary(BinaryStream::new(reader)))
        }
    }
}

impl<R> DataStream<R> {
    /// Whether the text variant was selected.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl<R: Read> PrimitiveStream for DataStream<R> {
    fn read_int(&mut self) -> Result<u32> {
        match self {
            Self::Binary(s) => s.read_int(),
            Self::Text(s) => s.read_int(),
        }
    }

    fn read_ints(&mut self, count: usize) -> Result<Vec<u32>> {
        match self {
            Self::Binary(s) => s.read_ints(count),
            Self::Text(s) => s.read_ints(count),
        }
    }

    fn read_float(&mut self) -> Result<f32> {
        match self {
            Self::Binary(s) => s.read_float(),
            Self::Text(s) => s.read_float(),
        }
    }

    fn read_floats(&mut self, count: usize) -> Result<Vec<f32>> {
        match self {
            Self::Binary(s) => s.read_floats(count),
            Self::Text(s) => s.read_floats(count),
        }
    }

    fn read_str(&mut self) -> Result<String> {
        match self {
            Self::Binary(s) => s.read_str(),
            Self::Text(s) => s.read_str(),
        }
    }
}

/// Read up to `count` bytes and seek back to where the reader was.
pub fn peek_bytes<R: Read + Seek>(reader: &mut R, count: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(count);
    (&mut *reader).take(count as u64).read_to_end(&mut bytes)?;
    if !bytes.is_empty() {
        reader.seek(SeekFrom::Current(-(bytes.len() as i64)))?;
    }
    Ok(bytes)
}
