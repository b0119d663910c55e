//! Opening physical streams.
//!
//! Every reader in this workspace borrows a caller-owned `RefCell<R>` where
//! `R: Read + Seek`. These helpers build one from a path.

use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

#[cfg(feature = "mmap")]
use std::io::Cursor;

#[cfg(feature = "mmap")]
use memmap2::Mmap;
use simsfile_common::SubRangeStream;
use simsfile_far::FarArchive;
use simsfile_iff::IffFile;
use tracing::debug;

use crate::Result;

/// A buffered file ready to be shared between readers.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<RefCell<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!(path = %path.display(), "opened file");
    Ok(RefCell::new(BufReader::new(file)))
}

/// A memory-mapped file ready to be shared between readers.
///
/// The file must not be modified while the mapping is alive.
#[cfg(feature = "mmap")]
pub fn map_file<P: AsRef<Path>>(path: P) -> Result<RefCell<Cursor<Mmap>>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    debug!(path = %path.display(), len = mmap.len(), "mapped file");
    Ok(RefCell::new(Cursor::new(mmap)))
}

/// Parse an IFF file stored as an entry of a FAR archive.
///
/// Returns the parsed file together with the entry stream it reads from;
/// resource streams handed out by the [`IffFile`] borrow that stream.
///
/// # Example
///
/// ```no_run
/// use simsfile::{open_file, open_iff_entry};
/// use simsfile::far::FarArchive;
///
/// let stream = open_file("GameData/Objects/Objects.far")?;
/// let archive = FarArchive::parse(&mut *stream.borrow_mut())?;
///
/// let (iff, entry) = open_iff_entry(&archive, "People\\maid.iff", &stream)?;
/// for resource in iff.iterate(|_| true, &entry) {
///     let resource = resource?;
///     println!("{} {}", resource.header.typecode, resource.header.name);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn open_iff_entry<'a, R: Read + Seek>(
    archive: &FarArchive,
    name: &str,
    stream: &'a RefCell<R>,
) -> Result<(IffFile, RefCell<SubRangeStream<'a, R>>)> {
    let entry = RefCell::new(archive.open(name, stream)?);
    let iff = IffFile::parse(&mut *entry.borrow_mut())?;
    Ok((iff, entry))
}
