//! IFF resource container reader for The Sims game files.
//!
//! An IFF file is a 64-byte signature block followed by a sequence of
//! resources, each with a 76-byte header giving its type code, total size,
//! id, flags and name. Version 2.5 files may also carry a resource map
//! (`rsmp`) listing resources by type; it is used as a fast path but never
//! trusted to be complete.
//!
//! IFF files are frequently stored inside FAR archives. Since
//! [`SubRangeStream`](simsfile_common::SubRangeStream) is itself `Read +
//! Seek`, an IFF can be parsed directly from an archive entry.
//!
//! # Example
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::fs::File;
//! use simsfile_iff::IffFile;
//!
//! let file = RefCell::new(File::open("UserData/Houses/House00.iff")?);
//! let iff = IffFile::parse(&mut *file.borrow_mut())?;
//!
//! for (offset, header) in iff.headers(&file)? {
//!     println!("{offset:>8} {} #{} {}", header.typecode, header.id, header.name);
//! }
//!
//! if let Some(name) = iff.glob(&file)? {
//!     println!("semi-global: {name}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
pub mod header;
mod iter;
pub mod rsmp;
mod typecode;

#[cfg(test)]
mod testutil;

pub use error::{Error, Result};
pub use file::{IffFile, IffVersion, CONTAINER_HEADER_SIZE};
pub use header::{ResourceHeader, ResourceRef};
pub use iter::{Resource, ResourceIter};
pub use rsmp::{ResourceMap, ResourceMapEntry};
pub use typecode::TypeCode;
