//! Lazy resource iteration.

use std::cell::RefCell;
use std::io::{Read, Seek};
use std::iter::FusedIterator;

use rustc_hash::FxHashSet;
use simsfile_common::SubRangeStream;
use tracing::{debug, trace};

use crate::header::{ResourceHeader, ResourceRef};
use crate::rsmp::ResourceMapEntry;
use crate::{IffFile, Result};

/// A resource located in an IFF file.
#[derive(Debug)]
pub struct Resource<'a, R> {
    pub header: ResourceHeader,
    /// View over the whole resource, header included.
    pub stream: SubRangeStream<'a, R>,
}

impl<'a, R> Resource<'a, R> {
    fn at(header: ResourceHeader, source: &'a RefCell<R>, offset: u64) -> Self {
        let stream = SubRangeStream::new(source, offset, u64::from(header.size));
        Self { header, stream }
    }

    /// Absolute offset of the resource header.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.stream.begin()
    }

    /// A fresh view over the payload only.
    pub fn payload(&self) -> SubRangeStream<'a, R> {
        self.stream
            .sub_range(u64::from(ResourceHeader::SIZE), u64::from(self.header.payload_len()))
    }
}

/// Iterator returned by [`IffFile::iterate`] and [`IffFile::iterate_by_scan`].
///
/// Walks the resource map first, then scans the file from the first resource
/// to the end. Offsets already yielded from the map are skipped during the
/// scan. The first error ends the iteration.
pub struct ResourceIter<'f, 'a, R, P> {
    file: &'f IffFile,
    map: &'f [ResourceMapEntry],
    map_pos: usize,
    scan_offset: u64,
    yielded: FxHashSet<u64>,
    predicate: P,
    source: &'a RefCell<R>,
    done: bool,
}

impl<'f, 'a, R, P> ResourceIter<'f, 'a, R, P>
where
    R: Read + Seek,
    P: FnMut(&ResourceRef<'_>) -> bool,
{
    pub(crate) fn new(file: &'f IffFile, map: &'f [ResourceMapEntry], predicate: P, source: &'a RefCell<R>) -> Self {
        Self {
            file,
            map,
            map_pos: 0,
            scan_offset: file.resources_start(),
            yielded: FxHashSet::default(),
            predicate,
            source,
            done: false,
        }
    }

    fn next_from_map(&mut self) -> Option<Result<Resource<'a, R>>> {
        while let Some(entry) = self.map.get(self.map_pos) {
            self.map_pos += 1;

            let offset = u64::from(entry.offset);
            if self.yielded.contains(&offset) || !(self.predicate)(&entry.to_ref()) {
                continue;
            }

            // The scan pass still finds whatever a stale entry should have listed.
            let header = match self.file.read_header_at(self.source, offset) {
                Ok(header) if header.typecode == entry.typecode => header,
                Ok(header) => {
                    debug!(
                        expected = %entry.typecode,
                        found = %header.typecode,
                        offset,
                        "skipping stale map entry"
                    );
                    continue;
                }
                Err(e) => {
                    debug!(offset, error = %e, "skipping unreadable map entry");
                    continue;
                }
            };
            trace!(typecode = %header.typecode, id = header.id, offset, "resource from map");
            self.yielded.insert(offset);
            return Some(Ok(Resource::at(header, self.source, offset)));
        }
        None
    }

    fn next_from_scan(&mut self) -> Option<Result<Resource<'a, R>>> {
        while self.scan_offset < self.file.stream_len() {
            let offset = self.scan_offset;
            let header = match self.file.read_header_at(self.source, offset) {
                Ok(header) => header,
                Err(e) => return Some(Err(e)),
            };
            self.scan_offset += u64::from(header.size);

            if self.yielded.contains(&offset) || !(self.predicate)(&header.to_ref(offset)) {
                continue;
            }
            trace!(typecode = %header.typecode, id = header.id, offset, "resource from scan");
            return Some(Ok(Resource::at(header, self.source, offset)));
        }
        None
    }
}

impl<'f, 'a, R, P> Iterator for ResourceIter<'f, 'a, R, P>
where
    R: Read + Seek,
    P: FnMut(&ResourceRef<'_>) -> bool,
{
    type Item = Result<Resource<'a, R>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let item = self.next_from_map().or_else(|| self.next_from_scan());
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

impl<R, P> FusedIterator for ResourceIter<'_, '_, R, P>
where
    R: Read + Seek,
    P: FnMut(&ResourceRef<'_>) -> bool,
{
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::testutil::{IffBuilder, MapMode};
    use crate::{Error, TypeCode};

    fn cell(data: Vec<u8>) -> RefCell<Cursor<Vec<u8>>> {
        RefCell::new(Cursor::new(data))
    }

    fn sample() -> IffBuilder {
        IffBuilder::new()
            .resource(b"STR#", 128, "catalog", b"hello")
            .resource(b"BHAV", 4096, "main", &[9; 11])
            .resource(b"STR#", 129, "strings", b"world!")
            .resource(b"OBJD", 1, "door", &[0; 4])
    }

    fn collect_offsets<R: Read + Seek>(
        iff: &IffFile,
        data: &RefCell<R>,
        by_scan: bool,
    ) -> Vec<u64> {
        if by_scan {
            iff.iterate_by_scan(|_| true, data)
                .map(|r| r.unwrap().offset())
                .collect()
        } else {
            iff.iterate(|_| true, data)
                .map(|r| r.unwrap().offset())
                .collect()
        }
    }

    #[test]
    fn test_map_entries_come_first() {
        let data = cell(sample().build(MapMode::Partial));
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();
        let listed: Vec<u64> = iff
            .resource_map()
            .unwrap()
            .entries()
            .iter()
            .map(|e| u64::from(e.offset))
            .collect();

        let visited = collect_offsets(&iff, &data, false);
        assert_eq!(&visited[..listed.len()], &listed[..]);

        let mut sorted = visited.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), visited.len());
        assert_eq!(sorted, collect_offsets(&iff, &data, true));
    }

    #[test]
    fn test_same_offsets_for_every_map_mode() {
        for mode in [MapMode::Full, MapMode::Partial, MapMode::Absent] {
            let data = cell(sample().build(mode));
            let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();

            let mut with_map = collect_offsets(&iff, &data, false);
            with_map.sort_unstable();
            assert_eq!(with_map, collect_offsets(&iff, &data, true), "{mode:?}");
        }
    }

    #[test]
    fn test_duplicate_map_entries_yield_once() {
        let data = cell(sample().build(MapMode::Duplicated));
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();

        let mut visited = collect_offsets(&iff, &data, false);
        visited.sort_unstable();
        assert_eq!(visited, collect_offsets(&iff, &data, true));
    }

    #[test]
    fn test_stale_map_entries_are_skipped() {
        let data = cell(
            sample()
                .stale(b"STR#", 7, 1_000_000)
                .stale(b"OBJD", 8, 64)
                .build(MapMode::Partial),
        );
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();
        assert_eq!(iff.resource_map().unwrap().len(), 4);

        let mut visited = collect_offsets(&iff, &data, false);
        visited.sort_unstable();
        assert_eq!(visited, collect_offsets(&iff, &data, true));

        let ids: Vec<u16> = iff
            .iterate(|r| r.is(b"OBJD"), &data)
            .map(|r| r.unwrap().header.id)
            .collect();
        assert_eq!(ids, [1]);
    }

    #[test]
    fn test_predicate_filters() {
        let data = cell(sample().build(MapMode::Partial));
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();

        let mut names: Vec<String> = iff
            .iterate(|r| r.is(b"STR#"), &data)
            .map(|r| r.unwrap().header.name)
            .collect();
        names.sort();
        assert_eq!(names, ["catalog", "strings"]);

        let mut seen = 0;
        let count = iff
            .iterate(
                |r| {
                    seen += 1;
                    r.typecode == TypeCode::new(*b"OBJD")
                },
                &data,
            )
            .count();
        assert_eq!(count, 1);
        assert!(seen > 0);
    }

    #[test]
    fn test_resource_streams() {
        let data = cell(sample().build(MapMode::Full));
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();

        let mut resources: Vec<_> = iff
            .iterate(|r| r.is(b"STR#"), &data)
            .collect::<Result<_>>()
            .unwrap();
        resources.sort_by_key(|r| r.header.id);

        // Read the second before the first; views are independent.
        assert_eq!(resources[1].payload().read_remaining().unwrap(), b"world!");
        assert_eq!(resources[0].payload().read_remaining().unwrap(), b"hello");
        assert_eq!(
            resources[0].stream.read_remaining().unwrap().len(),
            76 + 5
        );
    }

    #[test]
    fn test_undersized_header_stops_iteration() {
        let data = cell(
            IffBuilder::new()
                .resource(b"STR#", 1, "", b"ok")
                .raw_header(b"BAD!", 10)
                .resource(b"STR#", 2, "", b"never")
                .build(MapMode::Absent),
        );
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();

        let mut iter = iff.iterate(|_| true, &data);
        assert!(iter.next().unwrap().is_ok());
        assert!(matches!(iter.next(), Some(Err(Error::Format(_)))));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_oversized_header_is_truncated() {
        let data = cell(
            IffBuilder::new()
                .resource(b"STR#", 1, "", b"ok")
                .raw_header(b"BIG!", 10_000)
                .build(MapMode::Absent),
        );
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();

        let results: Vec<_> = iff.iterate(|_| true, &data).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[1], Err(Error::Truncated { .. })));
    }

    #[test]
    fn test_trailing_partial_header() {
        let data = cell(
            IffBuilder::new()
                .resource(b"STR#", 1, "", b"ok")
                .raw(&[0u8; 20])
                .build(MapMode::Absent),
        );
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();

        let err = iff.headers(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                needed: 76,
                available: 20,
                ..
            }
        ));
    }

    #[test]
    fn test_abandoned_iteration() {
        let data = cell(sample().build(MapMode::Full));
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();

        let first = iff.iterate(|_| true, &data).next().unwrap().unwrap();
        let again = iff.iterate(|_| true, &data).next().unwrap().unwrap();
        assert_eq!(first.offset(), again.offset());
    }

    #[test]
    fn test_empty_file_has_no_resources() {
        let data = cell(IffBuilder::new().build(MapMode::Absent));
        let iff = IffFile::parse(&mut *data.borrow_mut()).unwrap();
        assert_eq!(iff.iterate(|_| true, &data).count(), 0);
        assert!(iff.headers(&data).unwrap().is_empty());
    }
}
