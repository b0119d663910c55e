//! IFF container parsing and resource lookup.

use std::cell::RefCell;
use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use simsfile_common::{BinaryReader, ReadExt, SubRangeStream};
use tracing::debug;

use crate::header::{RawResourceHeader, ResourceHeader, ResourceRef};
use crate::iter::ResourceIter;
use crate::rsmp::ResourceMap;
use crate::{Error, Result, TypeCode};

/// Length of the container header; resources start right after it.
pub const CONTAINER_HEADER_SIZE: usize = 64;

const SIGNATURE_PREFIX: &[u8] = b"IFF FILE ";
const SIGNATURE_SUFFIX: &[u8] = b":TYPE FOLLOWED BY SIZE";

/// Leading signature plus its NUL.
const SIGNATURE_LEN: usize = 35;

const SECONDARY_V2_5: &[u8; 25] = b" JAMIE DOORNBOS & MAXIS 1";
const SECONDARY_V2_0: &[u8; 29] = b" JAMIE DOORNBOS & MAXIS 1996\0";

/// Byte offset of the big-endian resource map offset in 2.5 files.
const MAP_OFFSET_POS: usize = 60;

/// Container format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IffVersion {
    /// Version 2.0: no resource map.
    V2_0,
    /// Version 2.5: optional resource map.
    V2_5,
}

impl IffVersion {
    /// The version token as written in the signature.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V2_0 => "2.0",
            Self::V2_5 => "2.5",
        }
    }
}

impl fmt::Display for IffVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed IFF container.
///
/// Holds the container version and the resource map (if any). Resource data
/// is read on demand from a caller-owned stream passed to each method.
///
/// # Example
///
/// ```no_run
/// use std::cell::RefCell;
/// use std::fs::File;
/// use simsfile_iff::{IffFile, TypeCode};
///
/// let file = RefCell::new(File::open("Objects/Door.iff")?);
/// let iff = IffFile::parse(&mut *file.borrow_mut())?;
///
/// for resource in iff.iterate(|r| r.is(b"STR#"), &file) {
///     let resource = resource?;
///     println!("{} #{} {:?}", resource.header.typecode, resource.header.id, resource.header.name);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct IffFile {
    version: IffVersion,
    resource_map: Option<ResourceMap>,
    stream_len: u64,
}

impl IffFile {
    /// Validate the container signature and load the resource map.
    ///
    /// The stream position is unspecified afterwards.
    pub fn parse<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let mut header = Vec::with_capacity(CONTAINER_HEADER_SIZE);
        reader
            .by_ref()
            .take(CONTAINER_HEADER_SIZE as u64)
            .read_to_end(&mut header)?;

        let version = parse_signature(&header)?;
        debug!(%version, stream_len, "opening IFF file");

        let resource_map = match version {
            IffVersion::V2_0 => None,
            IffVersion::V2_5 => {
                let map_offset = BinaryReader::new(&header[MAP_OFFSET_POS..]).read_u32_be()?;
                if map_offset == 0 {
                    None
                } else {
                    Some(load_map(reader, u64::from(map_offset), stream_len)?)
                }
            }
        };

        if let Some(map) = &resource_map {
            debug!(
                map_version = map.version(),
                entries = map.len(),
                "loaded resource map"
            );
        }

        Ok(Self {
            version,
            resource_map,
            stream_len,
        })
    }

    /// Container format version.
    #[inline]
    pub fn version(&self) -> IffVersion {
        self.version
    }

    /// The resource map, if the file has one.
    #[inline]
    pub fn resource_map(&self) -> Option<&ResourceMap> {
        self.resource_map.as_ref()
    }

    /// Whether the file has a resource map.
    #[inline]
    pub fn has_resource_map(&self) -> bool {
        self.resource_map.is_some()
    }

    /// Offset of the first resource.
    #[inline]
    pub fn resources_start(&self) -> u64 {
        CONTAINER_HEADER_SIZE as u64
    }

    /// Length of the stream the file was parsed from.
    #[inline]
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// Open the first resource matching `predicate`.
    ///
    /// The returned stream covers the whole resource, header included.
    pub fn open<'a, R, P>(&self, predicate: P, stream: &'a RefCell<R>) -> Result<SubRangeStream<'a, R>>
    where
        R: Read + Seek,
        P: FnMut(&ResourceRef<'_>) -> bool,
    {
        match self.iterate(predicate, stream).next() {
            Some(resource) => Ok(resource?.stream),
            None => Err(Error::ResourceNotFound),
        }
    }

    /// Lazily yield every resource matching `predicate`.
    ///
    /// Resources listed in the resource map come first, in map order. A full
    /// scan of the file follows, yielding matches the map did not list. Each
    /// resource is yielded at most once.
    ///
    /// A map entry whose offset does not hold a readable header of the listed
    /// type is skipped, so a stale map only costs the fast path. Malformed
    /// headers met by the scan end the iteration with an error.
    pub fn iterate<'f, 'a, R, P>(&'f self, predicate: P, stream: &'a RefCell<R>) -> ResourceIter<'f, 'a, R, P>
    where
        R: Read + Seek,
        P: FnMut(&ResourceRef<'_>) -> bool,
    {
        let map = self.resource_map.as_ref().map_or(&[][..], |m| m.entries());
        ResourceIter::new(self, map, predicate, stream)
    }

    /// Like [`iterate`](Self::iterate), but ignores the resource map and
    /// only scans.
    pub fn iterate_by_scan<'f, 'a, R, P>(
        &'f self,
        predicate: P,
        stream: &'a RefCell<R>,
    ) -> ResourceIter<'f, 'a, R, P>
    where
        R: Read + Seek,
        P: FnMut(&ResourceRef<'_>) -> bool,
    {
        ResourceIter::new(self, &[], predicate, stream)
    }

    /// Every resource header, in file order.
    pub fn headers<R: Read + Seek>(&self, stream: &RefCell<R>) -> Result<Vec<(u64, ResourceHeader)>> {
        self.iterate_by_scan(|_| true, stream)
            .map(|resource| resource.map(|r| (r.offset(), r.header)))
            .collect()
    }

    /// Decode the name stored in the `GLOB` resource, if there is one.
    ///
    /// The payload is interpreted as NUL-terminated text if it contains a
    /// zero byte, as length-prefixed text if its first byte is below 32, and
    /// as plain text otherwise.
    pub fn glob<R: Read + Seek>(&self, stream: &RefCell<R>) -> Result<Option<String>> {
        let resource = match self.iterate(|r| r.is(TypeCode::GLOB), stream).next() {
            Some(resource) => resource?,
            None => return Ok(None),
        };

        let payload = resource.payload().read_remaining()?;
        let text = decode_glob(&payload);
        let name = std::str::from_utf8(text).map_err(|e| {
            simsfile_common::Error::Decode(format!("GLOB name is not valid text: {e}"))
        })?;
        Ok(Some(name.to_string()))
    }

    /// Read and validate the resource header at `offset`.
    pub fn read_header_at<R: Read + Seek>(&self, stream: &RefCell<R>, offset: u64) -> Result<ResourceHeader> {
        let available = self.stream_len.saturating_sub(offset);
        if available < u64::from(ResourceHeader::SIZE) {
            return Err(Error::Truncated {
                offset,
                needed: u64::from(ResourceHeader::SIZE),
                available,
            });
        }

        let mut view = SubRangeStream::new(stream, offset, u64::from(ResourceHeader::SIZE));
        let raw: RawResourceHeader = view.read_struct()?;
        let header = ResourceHeader::from_raw(&raw);
        check_size(&header, offset, available)?;
        Ok(header)
    }
}

impl fmt::Debug for IffFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IffFile")
            .field("version", &self.version)
            .field(
                "resource_map_entries",
                &self.resource_map.as_ref().map(ResourceMap::len),
            )
            .field("stream_len", &self.stream_len)
            .finish()
    }
}

/// Validate both signatures and return the version they name.
fn parse_signature(header: &[u8]) -> Result<IffVersion> {
    let nul = memchr::memchr(0, header)
        .ok_or_else(|| Error::InvalidSignature("no terminated signature in the first 64 bytes".into()))?;
    let signature = &header[..nul];

    let token = signature
        .strip_prefix(SIGNATURE_PREFIX)
        .and_then(|rest| rest.strip_suffix(SIGNATURE_SUFFIX))
        .filter(|t| {
            t.len() == 3 && t[0].is_ascii_digit() && t[1] == b'.' && t[2].is_ascii_digit()
        })
        .ok_or_else(|| {
            Error::InvalidSignature(format!("unrecognized signature {:?}", signature.escape_ascii().to_string()))
        })?;

    let (version, secondary): (IffVersion, &[u8]) = match token {
        b"2.5" => (IffVersion::V2_5, SECONDARY_V2_5),
        b"2.0" => (IffVersion::V2_0, SECONDARY_V2_0),
        other => {
            return Err(Error::UnsupportedVersion(
                String::from_utf8_lossy(other).into_owned(),
            ))
        }
    };

    let actual = header
        .get(SIGNATURE_LEN..SIGNATURE_LEN + secondary.len())
        .ok_or_else(|| Error::InvalidSignature("file ends inside the signature block".into()))?;
    if actual != secondary {
        return Err(Error::InvalidSignature(format!(
            "secondary signature for version {version} is {:?}",
            actual.escape_ascii().to_string()
        )));
    }
    if header.len() < CONTAINER_HEADER_SIZE {
        return Err(Error::InvalidSignature("file ends inside the signature block".into()));
    }

    Ok(version)
}

fn load_map<R: Read + Seek>(reader: &mut R, offset: u64, stream_len: u64) -> Result<ResourceMap> {
    let available = stream_len.saturating_sub(offset);
    if available < u64::from(ResourceHeader::SIZE) {
        return Err(Error::Truncated {
            offset,
            needed: u64::from(ResourceHeader::SIZE),
            available,
        });
    }

    reader.seek(SeekFrom::Start(offset))?;
    let raw: RawResourceHeader = reader.read_struct()?;
    let header = ResourceHeader::from_raw(&raw);
    if header.typecode != TypeCode::RSMP {
        return Err(Error::Format(format!(
            "resource map offset {offset} points at a {} resource",
            header.typecode
        )));
    }
    check_size(&header, offset, available)?;

    let payload = reader.read_vec(header.payload_len() as usize)?;
    ResourceMap::parse(&payload)
}

fn check_size(header: &ResourceHeader, offset: u64, available: u64) -> Result<()> {
    if header.size < ResourceHeader::SIZE {
        return Err(Error::Format(format!(
            "{} resource at {offset} has size {} (less than its header)",
            header.typecode, header.size
        )));
    }
    if u64::from(header.size) > available {
        return Err(Error::Truncated {
            offset,
            needed: u64::from(header.size),
            available,
        });
    }
    Ok(())
}

fn decode_glob(payload: &[u8]) -> &[u8] {
    if let Some(nul) = memchr::memchr(0, payload) {
        return &payload[..nul];
    }
    match payload.first() {
        Some(&len) if len < 32 => {
            let end = (1 + len as usize).min(payload.len());
            &payload[1..end]
        }
        _ => payload,
    }
}
