//! Fixture builders shared by the integration tests.

#![allow(dead_code)]

/// Lay out a version 1 FAR archive: header, entry data, manifest last.
pub fn build_far(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = b"FAR!byAZ".to_vec();
    out.extend_from_slice(&1i32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    let mut offsets = Vec::new();
    for (_, data) in files {
        offsets.push(out.len() as u32);
        out.extend_from_slice(data);
    }

    let manifest_offset = out.len() as u32;
    out[12..16].copy_from_slice(&manifest_offset.to_le_bytes());
    out.extend_from_slice(&(files.len() as u32).to_le_bytes());
    for ((name, data), offset) in files.iter().zip(offsets) {
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(name.len() as u32).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
    }
    out
}

/// One resource to place in a generated IFF file.
#[derive(Debug, Clone)]
pub struct Res {
    pub typecode: [u8; 4],
    pub id: u16,
    pub name: String,
    pub payload: Vec<u8>,
}

impl Res {
    pub fn new(typecode: &[u8; 4], id: u16, name: &str, payload: &[u8]) -> Self {
        Self {
            typecode: *typecode,
            id,
            name: name.to_string(),
            payload: payload.to_vec(),
        }
    }
}

/// A generated version 2.5 IFF file.
pub struct BuiltIff {
    pub bytes: Vec<u8>,
    /// Header offset of each input resource, in input order.
    pub offsets: Vec<u64>,
    /// Header offset of the resource map, if one was written.
    pub map_offset: Option<u64>,
}

/// Build a version 2.5 IFF file.
///
/// `listed` gives the indices of `resources` the version 1 resource map
/// lists, in map order; `None` writes no map.
pub fn build_iff(resources: &[Res], listed: Option<&[usize]>) -> BuiltIff {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"IFF FILE 2.5:TYPE FOLLOWED BY SIZE\0");
    bytes.extend_from_slice(b" JAMIE DOORNBOS & MAXIS 1");
    bytes.extend_from_slice(&0u32.to_be_bytes());

    let mut offsets = Vec::new();
    for res in resources {
        offsets.push(bytes.len() as u64);
        push_resource(&mut bytes, &res.typecode, res.id, &res.name, &res.payload);
    }

    let Some(listed) = listed else {
        return BuiltIff {
            bytes,
            offsets,
            map_offset: None,
        };
    };

    let mut map = Vec::new();
    map.extend_from_slice(&0u32.to_le_bytes());
    map.extend_from_slice(&1u32.to_le_bytes());
    map.extend_from_slice(b"pmsr");
    map.extend_from_slice(&0u32.to_le_bytes());
    map.extend_from_slice(&(listed.len() as u32).to_le_bytes());
    for &i in listed {
        let res = &resources[i];
        let mut code = res.typecode;
        code.reverse();
        map.extend_from_slice(&code);
        map.extend_from_slice(&1u32.to_le_bytes());
        map.extend_from_slice(&(offsets[i] as u32).to_le_bytes());
        map.extend_from_slice(&res.id.to_le_bytes());
        map.extend_from_slice(&0u32.to_le_bytes());
        map.push(res.name.len() as u8);
        map.extend_from_slice(res.name.as_bytes());
        if (res.name.len() + 1) % 2 == 1 {
            map.push(0);
        }
    }

    let map_offset = bytes.len() as u64;
    bytes[60..64].copy_from_slice(&(map_offset as u32).to_be_bytes());
    push_resource(&mut bytes, b"rsmp", 0, "", &map);

    BuiltIff {
        bytes,
        offsets,
        map_offset: Some(map_offset),
    }
}

fn push_resource(out: &mut Vec<u8>, typecode: &[u8; 4], id: u16, name: &str, payload: &[u8]) {
    out.extend_from_slice(typecode);
    out.extend_from_slice(&(76 + payload.len() as u32).to_be_bytes());
    out.extend_from_slice(&id.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes());
    let mut field = [0u8; 64];
    field[..name.len()].copy_from_slice(name.as_bytes());
    out.extend_from_slice(&field);
    out.extend_from_slice(payload);
}
