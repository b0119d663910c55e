//! FAR archive reader.
//!
//! The archive keeps only the manifest. Entry data is never copied; every
//! [`open`](FarArchive::open) hands back a [`SubRangeStream`] over a physical
//! stream the caller owns, so any number of entries can be read side by side.

use std::cell::RefCell;
use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use rustc_hash::FxHashMap;
use simsfile_common::{ReadExt, SubRangeStream};
use tracing::{debug, trace};

use crate::header::{FarHeader, ManifestRecord};
use crate::{Error, FarEntry, Result};

/// Parsed FAR manifest.
pub struct FarArchive {
    version: i32,
    entries: Vec<FarEntry>,
    /// Name to index of the first entry with that name.
    index: FxHashMap<String, usize>,
}

impl FarArchive {
    /// Parse the manifest of a FAR archive.
    ///
    /// The reader is only used during this call; keep the physical stream
    /// around (in a [`RefCell`]) to open entries later.
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        if stream_len < FarHeader::SIZE as u64 {
            let mut actual = Vec::new();
            reader.read_to_end(&mut actual)?;
            return Err(Error::InvalidMagic { actual });
        }

        let header: FarHeader = reader.read_struct()?;
        if &header.magic != FarHeader::MAGIC {
            return Err(Error::InvalidMagic {
                actual: header.magic.to_vec(),
            });
        }

        let version = header.version.get();
        if version != FarHeader::SUPPORTED_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let manifest_offset = u64::from(header.manifest_offset.get());
        if manifest_offset + 4 > stream_len {
            return Err(Error::Format(format!(
                "manifest offset {manifest_offset} is past the end of the file ({stream_len} bytes)"
            )));
        }

        reader.seek(SeekFrom::Start(manifest_offset))?;
        let count = reader
            .read_u32::<LittleEndian>()
            .map_err(|e| simsfile_common::Error::from_read(e, 4))?;

        // Every record is at least 16 bytes, which bounds the count before
        // anything is allocated for it.
        let manifest_space = stream_len - manifest_offset - 4;
        if u64::from(count) * ManifestRecord::SIZE as u64 > manifest_space {
            return Err(Error::Format(format!(
                "manifest claims {count} entries but only {manifest_space} bytes follow"
            )));
        }

        let mut entries = Vec::with_capacity(count as usize);
        let mut position = manifest_offset + 4;

        for _ in 0..count {
            let record: ManifestRecord = reader.read_struct()?;
            position += ManifestRecord::SIZE as u64;

            let name_len = u64::from(record.name_len.get());
            if name_len > stream_len - position {
                return Err(Error::Format(format!(
                    "entry name of {name_len} bytes runs past the end of the file"
                )));
            }
            let name_bytes = reader.read_vec(name_len as usize)?;
            position += name_len;
            let name = String::from_utf8_lossy(&name_bytes).into_owned();

            let entry = FarEntry::new(
                name,
                u64::from(record.offset.get()),
                u64::from(record.stored_len.get()),
                u64::from(record.logical_len.get()),
            );
            if entry.end() > stream_len {
                return Err(Error::Format(format!(
                    "entry {:?} spans {}..{} beyond the end of the file ({stream_len} bytes)",
                    entry.name(),
                    entry.offset(),
                    entry.end()
                )));
            }

            trace!(
                name = entry.name(),
                offset = entry.offset(),
                len = entry.stored_len(),
                "FAR entry"
            );
            entries.push(entry);
        }

        Self::check_overlaps(&entries)?;

        let mut index = FxHashMap::default();
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.name().to_string()).or_insert(i);
        }

        debug!(version, entries = entries.len(), "parsed FAR manifest");

        Ok(Self {
            version,
            entries,
            index,
        })
    }

    /// Get the format version.
    #[inline]
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Get the number of entries.
    #[inline]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Entry names in manifest order. Call again to restart.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(FarEntry::name)
    }

    /// Entries in manifest order.
    #[inline]
    pub fn entries(&self) -> &[FarEntry] {
        &self.entries
    }

    /// Look up an entry by exact name.
    pub fn entry(&self, name: &str) -> Option<&FarEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Open a named entry as a view over `stream`.
    pub fn open<'a, R: Read + Seek>(
        &self,
        name: &str,
        stream: &'a RefCell<R>,
    ) -> Result<SubRangeStream<'a, R>> {
        let entry = self
            .entry(name)
            .ok_or_else(|| Error::EntryNotFound(name.to_string()))?;
        Ok(Self::open_entry(entry, stream))
    }

    /// Open an entry already looked up as a view over `stream`.
    pub fn open_entry<'a, R: Read + Seek>(
        entry: &FarEntry,
        stream: &'a RefCell<R>,
    ) -> SubRangeStream<'a, R> {
        SubRangeStream::new(stream, entry.offset(), entry.stored_len())
    }

    /// Open every entry, in manifest order.
    pub fn iter_open<'s, 'a: 's, R: Read + Seek>(
        &'s self,
        stream: &'a RefCell<R>,
    ) -> impl Iterator<Item = (&'s FarEntry, SubRangeStream<'a, R>)> + 's {
        self.entries
            .iter()
            .map(move |entry| (entry, Self::open_entry(entry, stream)))
    }

    fn check_overlaps(entries: &[FarEntry]) -> Result<()> {
        let mut ranges: Vec<&FarEntry> = entries.iter().filter(|e| e.stored_len() > 0).collect();
        ranges.sort_by_key(|e| e.offset());

        for pair in ranges.windows(2) {
            if pair[0].end() > pair[1].offset() {
                return Err(Error::Format(format!(
                    "entries {:?} and {:?} overlap",
                    pair[0].name(),
                    pair[1].name()
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FarArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FarArchive")
            .field("version", &self.version)
            .field("entries", &self.entries.len())
            .finish()
    }
}
