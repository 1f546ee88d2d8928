//! Writes archives. Mostly used to build small synthetic maps for tests, but
//! produces a file any WAD reader will accept.
//!
//! Layout written: header, then each lump's bytes in the order added, then the
//! directory.

use std::io;

use crate::map::MapLump;
use crate::types::*;
use crate::wad::{DIRECTORY_ENTRY_SIZE, HEADER_SIZE};

/// The record arrays of one map, in the order they are written after the
/// marker. REJECT and BLOCKMAP are always written empty.
#[derive(Debug, Default, Clone)]
pub struct MapLumps {
    pub things:     Vec<WadThing>,
    pub linedefs:   Vec<WadLineDef>,
    pub sidedefs:   Vec<WadSideDef>,
    pub vertexes:   Vec<WadVertex>,
    pub segments:   Vec<WadSegment>,
    pub subsectors: Vec<WadSubSector>,
    pub nodes:      Vec<WadNode>,
    pub sectors:    Vec<WadSector>,
}

#[derive(Debug, Clone)]
pub struct WadBuilder {
    wad_type: [u8; 4],
    lumps:    Vec<(String, Vec<u8>)>,
}

impl Default for WadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WadBuilder {
    pub fn new() -> Self {
        Self {
            wad_type: *b"IWAD",
            lumps:    Vec::new(),
        }
    }

    pub fn pwad() -> Self {
        Self {
            wad_type: *b"PWAD",
            lumps:    Vec::new(),
        }
    }

    pub fn add_lump(&mut self, name: &str, data: Vec<u8>) -> &mut Self {
        self.lumps.push((name.to_owned(), data));
        self
    }

    pub fn add_records<T: LumpRecord>(&mut self, name: &str, records: &[T]) -> io::Result<&mut Self> {
        let mut data = Vec::with_capacity(records.len() * T::SIZE);
        for r in records {
            r.write(&mut data)?;
        }
        Ok(self.add_lump(name, data))
    }

    /// A marker followed by the ten map lumps in their usual order
    pub fn add_map(&mut self, name: &str, map: &MapLumps) -> io::Result<&mut Self> {
        self.add_lump(name, Vec::new());
        self.add_records(MapLump::Things.name(), &map.things)?;
        self.add_records(MapLump::LineDefs.name(), &map.linedefs)?;
        self.add_records(MapLump::SideDefs.name(), &map.sidedefs)?;
        self.add_records(MapLump::Vertexes.name(), &map.vertexes)?;
        self.add_records(MapLump::Segs.name(), &map.segments)?;
        self.add_records(MapLump::SSectors.name(), &map.subsectors)?;
        self.add_records(MapLump::Nodes.name(), &map.nodes)?;
        self.add_records(MapLump::Sectors.name(), &map.sectors)?;
        self.add_lump(MapLump::Reject.name(), Vec::new());
        self.add_lump(MapLump::Blockmap.name(), Vec::new());
        Ok(self)
    }

    /// Lay out the archive. Names longer than 8 bytes are cut.
    pub fn finish(&self) -> Vec<u8> {
        let data_len: usize = self.lumps.iter().map(|(_, d)| d.len()).sum();
        let dir_offset = HEADER_SIZE as usize + data_len;

        let mut out = Vec::with_capacity(
            dir_offset + self.lumps.len() * DIRECTORY_ENTRY_SIZE as usize,
        );
        out.extend_from_slice(&self.wad_type);
        out.extend_from_slice(&(self.lumps.len() as i32).to_le_bytes());
        out.extend_from_slice(&(dir_offset as i32).to_le_bytes());

        let mut offsets = Vec::with_capacity(self.lumps.len());
        for (_, data) in &self.lumps {
            offsets.push(out.len() as i32);
            out.extend_from_slice(data);
        }

        for ((name, data), offset) in self.lumps.iter().zip(offsets) {
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&(data.len() as i32).to_le_bytes());
            let mut field = [0u8; 8];
            let bytes = name.as_bytes();
            let n = bytes.len().min(8);
            field[..n].copy_from_slice(&bytes[..n]);
            out.extend_from_slice(&field);
        }
        out
    }
}
