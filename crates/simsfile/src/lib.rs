//! Simsfile - read-only access to The Sims game files.
//!
//! This crate ties the simsfile crates together behind one dependency.
//!
//! # Crates
//!
//! - [`simsfile_common`] - Sub-range streams, binary readers, binary/text primitive streams
//! - [`simsfile_far`] - FAR archive index and entry streams
//! - [`simsfile_iff`] - IFF resource containers and resource maps
//! - [`simsfile_cfp`] - CFP compressed float animation streams
//!
//! All readers work on a caller-owned `RefCell<R>` with `R: Read + Seek`.
//! Opening an entry or a resource never copies data; it returns a
//! [`SubRangeStream`](common::SubRangeStream) view that is itself `Read +
//! Seek`, so containers nest.
//!
//! # Example
//!
//! ```no_run
//! use simsfile::prelude::*;
//!
//! let stream = simsfile::open_file("GameData/Objects/Objects.far")?;
//! let archive = FarArchive::parse(&mut *stream.borrow_mut())?;
//!
//! for name in archive.names().filter(|n| n.ends_with(".iff")) {
//!     let (iff, entry) = simsfile::open_iff_entry(&archive, name, &stream)?;
//!     println!("{name}: {:?}", iff.glob(&entry)?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod source;

// Re-export all sub-crates
pub use simsfile_cfp as cfp;
pub use simsfile_common as common;
pub use simsfile_far as far;
pub use simsfile_iff as iff;

pub use error::{Error, Result};
#[cfg(feature = "mmap")]
pub use source::map_file;
pub use source::{open_file, open_iff_entry};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use simsfile_cfp::{read_anim_channels, read_compressed_floats, AnimChannels, ChannelCounts};
    pub use simsfile_common::{DataStream, PrimitiveStream, SubRangeStream, TextOptions};
    pub use simsfile_far::{FarArchive, FarEntry};
    pub use simsfile_iff::{IffFile, Resource, ResourceHeader, ResourceRef, TypeCode};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
