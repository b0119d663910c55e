//! FAR archive reader for The Sims game files.
//!
//! FAR is a flat, uncompressed container: a 16-byte header, the entry data,
//! and a manifest of named byte ranges (usually at the end of the file).
//! All fields are little-endian.
//!
//! # Example
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::fs::File;
//! use simsfile_far::FarArchive;
//!
//! let file = RefCell::new(File::open("GameData/Global.far")?);
//! let archive = FarArchive::parse(&mut *file.borrow_mut())?;
//!
//! for name in archive.names() {
//!     println!("{name}");
//! }
//!
//! let mut stream = archive.open("Global.iff", &file)?;
//! let data = stream.read_remaining()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod archive;
mod entry;
mod error;
pub mod header;

pub use archive::FarArchive;
pub use entry::FarEntry;
pub use error::{Error, Result};
