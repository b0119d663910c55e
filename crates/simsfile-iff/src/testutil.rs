//! In-memory IFF fixtures for unit tests.

use crate::header::ResourceHeader;

/// Which resources the generated map lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    Full,
    /// Every other resource, in reverse order.
    Partial,
    /// Every resource, listed twice.
    Duplicated,
    Absent,
}

struct Item {
    typecode: [u8; 4],
    id: u16,
    name: String,
    offset: usize,
}

pub struct IffBuilder {
    v2_0: bool,
    body: Vec<u8>,
    items: Vec<Item>,
    stale: Vec<Item>,
}

impl IffBuilder {
    pub fn new() -> Self {
        Self {
            v2_0: false,
            body: Vec::new(),
            items: Vec::new(),
            stale: Vec::new(),
        }
    }

    pub fn version_2_0(mut self) -> Self {
        self.v2_0 = true;
        self
    }

    pub fn resource(mut self, typecode: &[u8; 4], id: u16, name: &str, payload: &[u8]) -> Self {
        let offset = 64 + self.body.len();
        let size = ResourceHeader::SIZE + payload.len() as u32;
        self.push_header(typecode, size, id, name);
        self.body.extend_from_slice(payload);
        self.items.push(Item {
            typecode: *typecode,
            id,
            name: name.to_string(),
            offset,
        });
        self
    }

    /// A bare header with an arbitrary size field and no payload.
    pub fn raw_header(mut self, typecode: &[u8; 4], size: u32) -> Self {
        self.push_header(typecode, size, 0, "");
        self
    }

    /// A map entry pointing at `offset` with no matching resource behind it.
    pub fn stale(mut self, typecode: &[u8; 4], id: u16, offset: usize) -> Self {
        self.stale.push(Item {
            typecode: *typecode,
            id,
            name: String::new(),
            offset,
        });
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    fn push_header(&mut self, typecode: &[u8; 4], size: u32, id: u16, name: &str) {
        self.body.extend_from_slice(typecode);
        self.body.extend_from_slice(&size.to_be_bytes());
        self.body.extend_from_slice(&id.to_be_bytes());
        self.body.extend_from_slice(&0u16.to_be_bytes());
        let mut field = [0u8; 64];
        field[..name.len()].copy_from_slice(name.as_bytes());
        self.body.extend_from_slice(&field);
    }

    pub fn build(self, mode: MapMode) -> Vec<u8> {
        let mut out = Vec::new();
        if self.v2_0 {
            out.extend_from_slice(b"IFF FILE 2.0:TYPE FOLLOWED BY SIZE\0");
            out.extend_from_slice(b" JAMIE DOORNBOS & MAXIS 1996\0");
        } else {
            out.extend_from_slice(b"IFF FILE 2.5:TYPE FOLLOWED BY SIZE\0");
            out.extend_from_slice(b" JAMIE DOORNBOS & MAXIS 1");
            out.extend_from_slice(&0u32.to_be_bytes());
        }
        assert_eq!(out.len(), 64);
        out.extend_from_slice(&self.body);

        let mut listed: Vec<&Item> = match mode {
            MapMode::Absent => return out,
            MapMode::Full => self.items.iter().collect(),
            MapMode::Partial => self.items.iter().step_by(2).rev().collect(),
            MapMode::Duplicated => self.items.iter().chain(self.items.iter()).collect(),
        };
        listed.extend(self.stale.iter());

        let map_offset = out.len() as u32;
        out[60..64].copy_from_slice(&map_offset.to_be_bytes());

        let mut payload = Vec::new();
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(b"pmsr");
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&(listed.len() as u32).to_le_bytes());
        // One single-entry group per listed resource keeps the order exact.
        for item in listed {
            let mut code = item.typecode;
            code.reverse();
            payload.extend_from_slice(&code);
            payload.extend_from_slice(&1u32.to_le_bytes());
            payload.extend_from_slice(&(item.offset as u32).to_le_bytes());
            payload.extend_from_slice(&item.id.to_le_bytes());
            payload.extend_from_slice(&0u16.to_le_bytes());
            payload.extend_from_slice(item.name.as_bytes());
            payload.push(0);
            if (item.name.len() + 1) % 2 == 1 {
                payload.push(0);
            }
        }

        let size = ResourceHeader::SIZE + payload.len() as u32;
        out.extend_from_slice(b"rsmp");
        out.extend_from_slice(&size.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&[0u8; 64]);
        out.extend_from_slice(&payload);
        out
    }
}
