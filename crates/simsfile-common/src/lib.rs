//! Common utilities for simsfile.
//!
//! This crate provides the streaming substrate shared by every format crate:
//!
//! - [`SubRangeStream`] - Independently-cursored windows over one shared stream
//! - [`PrimitiveStream`] - Integers, floats and strings from binary or text encodings
//! - [`BinaryReader`] - Cursor over an in-memory byte slice
//! - [`ReadExt`] - Fixed-layout struct reads from any [`std::io::Read`]

mod datastream;
mod error;
mod reader;
mod subrange;

pub use datastream::{
    peek_bytes, BinaryStream, DataStream, PrimitiveStream, TextOptions, TextStream,
};
pub use error::{Error, Result};
pub use reader::{BinaryReader, ReadExt};
pub use subrange::SubRangeStream;
