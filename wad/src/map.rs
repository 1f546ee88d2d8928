use std::io::{Read, Seek};

use log::{debug, info, warn};

use crate::error::{WadError, WadResult};
use crate::nodes::{BspNode, build_tree};
use crate::reader::WadReader;
use crate::types::*;
use crate::wad::{WadData, WadDirectory};

/// The number of lumps that follow a map marker
pub const MAP_LUMP_COUNT: usize = 10;

/// The lumps that make up one map, found as a run directly after the zero
/// sized marker lump named for the map
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapLump {
    /// Position and angle for all monster, powerup and spawn location
    Things,
    /// An array of lines referencing two vertices. Also points to one or two
    /// `SideDef` depending on if this line is a wall or a portal
    LineDefs,
    /// Defines upper, lower, and middle textures plus offsets
    SideDefs,
    /// An array of signed short X, Y pairs. All coordinates in this map
    /// block are indexes into this array
    Vertexes,
    /// Portions of lines cut due to Binary Space Partitioning
    Segs,
    /// Set of segments of a `LineDef` representing a convex subspace
    SSectors,
    /// BSP with segs, nodes and sub-sector leaves
    Nodes,
    /// Area surrounded by lines, with set ceiling and floor textures/heights
    Sectors,
    /// Sector-to-sector visibility matrix. Not decoded
    Reject,
    /// Grid partition of the map LINEDEFS. Not decoded
    Blockmap,
}

impl MapLump {
    pub const ALL: [MapLump; MAP_LUMP_COUNT] = [
        MapLump::Things,
        MapLump::LineDefs,
        MapLump::SideDefs,
        MapLump::Vertexes,
        MapLump::Segs,
        MapLump::SSectors,
        MapLump::Nodes,
        MapLump::Sectors,
        MapLump::Reject,
        MapLump::Blockmap,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            MapLump::Things => "THINGS",
            MapLump::LineDefs => "LINEDEFS",
            MapLump::SideDefs => "SIDEDEFS",
            MapLump::Vertexes => "VERTEXES",
            MapLump::Segs => "SEGS",
            MapLump::SSectors => "SSECTORS",
            MapLump::Nodes => "NODES",
            MapLump::Sectors => "SECTORS",
            MapLump::Reject => "REJECT",
            MapLump::Blockmap => "BLOCKMAP",
        }
    }

    pub fn from_name(name: &str) -> Option<MapLump> {
        Self::ALL.iter().copied().find(|l| l.name() == name)
    }
}

/// Everything decoded for one map. Built once by `WadData::load_map` and not
/// changed afterwards.
///
/// There is no REJECT table or BLOCKMAP here, those lumps are passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadMap {
    pub name:       String,
    pub things:     Vec<WadThing>,
    pub linedefs:   Vec<WadLineDef>,
    pub sidedefs:   Vec<WadSideDef>,
    pub vertexes:   Vec<WadVertex>,
    pub segments:   Vec<WadSegment>,
    pub subsectors: Vec<WadSubSector>,
    pub sectors:    Vec<WadSector>,
    /// Number of records the NODES lump held
    pub node_count: usize,
    /// Root of the tree built from the NODES lump
    pub root:       BspNode,
}

impl WadMap {
    /// Check every index the records hold against the arrays they index
    pub fn validate(&self) -> WadResult<()> {
        let vert_len = self.vertexes.len();
        let check_vert = |what: &str, i: usize, v: i16| {
            if v as u16 as usize >= vert_len {
                return Err(WadError::Parse(format!(
                    "{} {} references vertex {} of {}",
                    what, i, v, vert_len
                )));
            }
            Ok(())
        };

        for (i, line) in self.linedefs.iter().enumerate() {
            check_vert("linedef", i, line.start_vertex)?;
            check_vert("linedef", i, line.end_vertex)?;
        }
        for (i, seg) in self.segments.iter().enumerate() {
            check_vert("seg", i, seg.start_vertex)?;
            check_vert("seg", i, seg.end_vertex)?;
            if seg.linedef as u16 as usize >= self.linedefs.len() {
                return Err(WadError::Parse(format!(
                    "seg {} references linedef {} of {}",
                    i,
                    seg.linedef,
                    self.linedefs.len()
                )));
            }
        }
        for (i, ss) in self.subsectors.iter().enumerate() {
            if ss.seg_range().end > self.segments.len() {
                return Err(WadError::Parse(format!(
                    "subsector {} runs segs {:?} of {}",
                    i,
                    ss.seg_range(),
                    self.segments.len()
                )));
            }
        }
        for ss in self.root.subsectors() {
            if ss as usize >= self.subsectors.len() {
                return Err(WadError::Parse(format!(
                    "BSP leaf references subsector {} of {}",
                    ss,
                    self.subsectors.len()
                )));
            }
        }
        Ok(())
    }
}

/// Seek to the lump and decode `size / record size` records from it
fn read_lump<T: LumpRecord, R: Read + Seek>(
    r: &mut WadReader<R>,
    entry: &WadDirectory,
) -> WadResult<Vec<T>> {
    if entry.lump_offset < 0 || entry.lump_size < 0 {
        return Err(WadError::Parse(format!(
            "{} has offset {} and size {}",
            entry.lump_name, entry.lump_offset, entry.lump_size
        )));
    }
    let size = entry.lump_size as usize;
    if size % T::SIZE != 0 {
        return Err(WadError::Parse(format!(
            "{} is {} bytes, not a multiple of {}",
            entry.lump_name,
            size,
            T::SIZE
        )));
    }

    r.seek_to(entry.lump_offset as u64)?;
    let count = size / T::SIZE;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(T::read(r)?);
    }
    Ok(out)
}

fn required<T>(map: &str, lump: MapLump, v: Option<T>) -> WadResult<T> {
    v.ok_or_else(|| WadError::Parse(format!("{} has no {} lump", map, lump.name())))
}

impl WadData {
    /// Load the named map. The marker entry is found by exact name, then the
    /// ten entries after it are decoded by name, in whatever order they come.
    ///
    /// Any read failure aborts the whole load, a partial map is never returned.
    pub fn load_map(&self, map_name: &str) -> WadResult<WadMap> {
        let index = self
            .find_entry_index(map_name)
            .ok_or_else(|| WadError::MapNotFound(map_name.to_owned()))?;
        let run = self
            .lumps()
            .get(index + 1..index + 1 + MAP_LUMP_COUNT)
            .ok_or_else(|| {
                WadError::Parse(format!(
                    "{} is not followed by {} lumps",
                    map_name, MAP_LUMP_COUNT
                ))
            })?;

        let mut things = None;
        let mut linedefs = None;
        let mut sidedefs = None;
        let mut vertexes = None;
        let mut segments = None;
        let mut subsectors = None;
        let mut sectors = None;
        let mut nodes = None;

        let mut r = self.open_source()?;
        for entry in run {
            let Some(lump) = MapLump::from_name(&entry.lump_name) else {
                warn!("{}: skipping unknown lump {}", map_name, entry.lump_name);
                continue;
            };
            debug!(
                "{}: {} at 0x{:08X}, {} bytes",
                map_name, entry.lump_name, entry.lump_offset, entry.lump_size
            );
            match lump {
                MapLump::Things => things = Some(read_lump::<WadThing, _>(&mut r, entry)?),
                MapLump::LineDefs => linedefs = Some(read_lump::<WadLineDef, _>(&mut r, entry)?),
                MapLump::SideDefs => sidedefs = Some(read_lump::<WadSideDef, _>(&mut r, entry)?),
                MapLump::Vertexes => vertexes = Some(read_lump::<WadVertex, _>(&mut r, entry)?),
                MapLump::Segs => segments = Some(read_lump::<WadSegment, _>(&mut r, entry)?),
                MapLump::SSectors => {
                    subsectors = Some(read_lump::<WadSubSector, _>(&mut r, entry)?)
                }
                MapLump::Nodes => {
                    let raw = read_lump::<WadNode, _>(&mut r, entry)?;
                    nodes = Some((raw.len(), build_tree(&raw)?));
                }
                MapLump::Sectors => sectors = Some(read_lump::<WadSector, _>(&mut r, entry)?),
                MapLump::Reject | MapLump::Blockmap => {
                    debug!("{}: {} is not decoded", map_name, entry.lump_name);
                }
            }
        }
        drop(r);

        let (node_count, root) = required(map_name, MapLump::Nodes, nodes)?;
        let map = WadMap {
            name: map_name.to_owned(),
            things: things.unwrap_or_default(),
            linedefs: required(map_name, MapLump::LineDefs, linedefs)?,
            sidedefs: sidedefs.unwrap_or_default(),
            vertexes: required(map_name, MapLump::Vertexes, vertexes)?,
            segments: required(map_name, MapLump::Segs, segments)?,
            subsectors: required(map_name, MapLump::SSectors, subsectors)?,
            sectors: sectors.unwrap_or_default(),
            node_count,
            root,
        };
        map.validate()?;

        info!(
            "{}: Loaded {} things, {} linedefs, {} sidedefs, {} vertexes, {} segs, {} subsectors, {} nodes, {} sectors",
            map.name,
            map.things.len(),
            map.linedefs.len(),
            map.sidedefs.len(),
            map.vertexes.len(),
            map.segments.len(),
            map.subsectors.len(),
            map.node_count,
            map.sectors.len()
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::{MapLumps, WadBuilder};
    use crate::map::{MAP_LUMP_COUNT, MapLump};
    use crate::nodes::BspNode;
    use crate::types::*;
    use crate::{WadData, WadError};
    use simplelog::{Config, LevelFilter, TestLogger};

    fn square_lumps() -> MapLumps {
        MapLumps {
            things:     vec![WadThing::new(50, 50, 90, 1, 7), WadThing::new(10, 20, 0, 2, 7)],
            linedefs:   vec![
                WadLineDef::new(0, 1, 1, 0, 0, 0, None),
                WadLineDef::new(1, 2, 1, 0, 0, 1, None),
                WadLineDef::new(2, 3, 1, 0, 0, 2, None),
                WadLineDef::new(3, 0, 4, 11, 3, 3, Some(4)),
            ],
            sidedefs:   vec![
                WadSideDef {
                    x_offset:   0,
                    y_offset:   0,
                    upper_tex:  "-".to_owned(),
                    lower_tex:  "-".to_owned(),
                    middle_tex: "STARTAN3".to_owned(),
                    sector:     0,
                };
                5
            ],
            vertexes:   vec![
                WadVertex::new(0, 0),
                WadVertex::new(100, 0),
                WadVertex::new(100, 100),
                WadVertex::new(0, 100),
            ],
            segments:   vec![
                WadSegment::new(0, 1, 0, 0, 0, 0),
                WadSegment::new(1, 2, 16384, 1, 0, 0),
                WadSegment::new(2, 3, -32768, 2, 0, 0),
                WadSegment::new(3, 0, -16384, 3, 0, 0),
            ],
            subsectors: vec![WadSubSector::new(2, 0), WadSubSector::new(2, 2)],
            nodes:      vec![WadNode {
                x:           0,
                y:           0,
                dx:          100,
                dy:          100,
                right_box:   BBox::new(100, 0, 0, 100),
                left_box:    BBox::new(100, 0, 0, 100),
                right_child: 0x8000,
                left_child:  0x8001,
            }],
            sectors:    vec![WadSector {
                floor_height: 0,
                ceil_height:  72,
                floor_tex:    "FLOOR4_8".to_owned(),
                ceil_tex:     "CEIL3_5".to_owned(),
                light_level:  160,
                kind:         0,
                tag:          0,
            }],
        }
    }

    fn archive(lumps: &MapLumps) -> WadData {
        let _ = TestLogger::init(LevelFilter::Debug, Config::default());
        let mut b = WadBuilder::new();
        b.add_lump("PLAYPAL", vec![0; 8]);
        b.add_map("E1M1", lumps).unwrap();
        WadData::from_bytes(b.finish()).unwrap()
    }

    #[test]
    fn lump_names() {
        for lump in MapLump::ALL {
            assert_eq!(MapLump::from_name(lump.name()), Some(lump));
        }
        assert_eq!(MapLump::from_name("TEXTURE1"), None);
    }

    #[test]
    fn records_survive_encode_and_load() {
        let lumps = square_lumps();
        let map = archive(&lumps).load_map("E1M1").unwrap();
        assert_eq!(map.name, "E1M1");
        assert_eq!(map.things, lumps.things);
        assert_eq!(map.linedefs, lumps.linedefs);
        assert_eq!(map.sidedefs, lumps.sidedefs);
        assert_eq!(map.vertexes, lumps.vertexes);
        assert_eq!(map.segments, lumps.segments);
        assert_eq!(map.subsectors, lumps.subsectors);
        assert_eq!(map.sectors, lumps.sectors);
        assert_eq!(map.node_count, 1);
        assert_eq!(map.linedefs[3].back_sidedef, Some(4));
        assert_eq!(map.sidedefs[0].upper_tex, "-");
    }

    #[test]
    fn tree_built_from_nodes() {
        let map = archive(&square_lumps()).load_map("E1M1").unwrap();
        let BspNode::Internal(p) = &map.root else {
            panic!("root should be internal");
        };
        assert!(p.right.is_leaf());
        assert!(p.left.is_leaf());
    }

    #[test]
    fn loading_twice_is_equal() {
        let wad = archive(&square_lumps());
        assert_eq!(wad.load_map("E1M1").unwrap(), wad.load_map("E1M1").unwrap());
    }

    #[test]
    fn missing_map() {
        let err = archive(&square_lumps()).load_map("E1M2").unwrap_err();
        assert!(err.is_map_not_found());
    }

    #[test]
    fn lump_order_in_run_does_not_matter() {
        let lumps = square_lumps();
        let expected = archive(&lumps).load_map("E1M1").unwrap();

        let mut b = WadBuilder::new();
        b.add_lump("E1M1", Vec::new());
        b.add_records("NODES", &lumps.nodes).unwrap();
        b.add_lump("BLOCKMAP", vec![0; 8]);
        b.add_records("VERTEXES", &lumps.vertexes).unwrap();
        b.add_records("SECTORS", &lumps.sectors).unwrap();
        b.add_records("SSECTORS", &lumps.subsectors).unwrap();
        b.add_lump("REJECT", vec![0; 1]);
        b.add_records("SEGS", &lumps.segments).unwrap();
        b.add_records("SIDEDEFS", &lumps.sidedefs).unwrap();
        b.add_records("LINEDEFS", &lumps.linedefs).unwrap();
        b.add_records("THINGS", &lumps.things).unwrap();
        let wad = WadData::from_bytes(b.finish()).unwrap();
        assert_eq!(wad.load_map("E1M1").unwrap(), expected);
    }

    #[test]
    fn only_ten_entries_after_marker() {
        let lumps = square_lumps();
        let mut b = WadBuilder::new();
        b.add_lump("E1M1", Vec::new());
        b.add_records("THINGS", &lumps.things).unwrap();
        b.add_records("LINEDEFS", &lumps.linedefs).unwrap();
        b.add_records("SIDEDEFS", &lumps.sidedefs).unwrap();
        b.add_lump("DEHACKED", Vec::new());
        b.add_records("SEGS", &lumps.segments).unwrap();
        b.add_records("SSECTORS", &lumps.subsectors).unwrap();
        b.add_records("NODES", &lumps.nodes).unwrap();
        b.add_records("SECTORS", &lumps.sectors).unwrap();
        b.add_lump("REJECT", Vec::new());
        b.add_lump("BLOCKMAP", Vec::new());
        // eleventh entry, outside the run
        b.add_records("VERTEXES", &lumps.vertexes).unwrap();
        let wad = WadData::from_bytes(b.finish()).unwrap();
        assert_eq!(wad.lumps().len(), 1 + MAP_LUMP_COUNT + 1);
        assert!(matches!(wad.load_map("E1M1"), Err(WadError::Parse(_))));
    }

    #[test]
    fn ragged_lump_size() {
        let lumps = square_lumps();
        let mut b = WadBuilder::new();
        b.add_lump("E1M1", Vec::new());
        b.add_records("THINGS", &lumps.things).unwrap();
        b.add_records("LINEDEFS", &lumps.linedefs).unwrap();
        b.add_records("SIDEDEFS", &lumps.sidedefs).unwrap();
        b.add_lump("VERTEXES", vec![0; 6]);
        b.add_records("SEGS", &lumps.segments).unwrap();
        b.add_records("SSECTORS", &lumps.subsectors).unwrap();
        b.add_records("NODES", &lumps.nodes).unwrap();
        b.add_records("SECTORS", &lumps.sectors).unwrap();
        b.add_lump("REJECT", Vec::new());
        b.add_lump("BLOCKMAP", Vec::new());
        let wad = WadData::from_bytes(b.finish()).unwrap();
        assert!(matches!(wad.load_map("E1M1"), Err(WadError::Parse(_))));
    }

    #[test]
    fn lump_past_end_is_truncated() {
        let mut bytes = {
            let mut b = WadBuilder::new();
            b.add_map("E1M1", &square_lumps()).unwrap();
            b.finish()
        };
        // Point VERTEXES (entry 4) past the directory, at the last 2 bytes
        let dir_offset = i32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        let entry = dir_offset + 4 * 16;
        let at = (bytes.len() - 2) as i32;
        bytes[entry..entry + 4].copy_from_slice(&at.to_le_bytes());
        let wad = WadData::from_bytes(bytes).unwrap();
        assert!(matches!(
            wad.load_map("E1M1"),
            Err(WadError::TruncatedRead { .. })
        ));
    }

    #[test]
    fn bad_vertex_index() {
        let mut lumps = square_lumps();
        lumps.linedefs[1].end_vertex = 9;
        assert!(matches!(
            archive(&lumps).load_map("E1M1"),
            Err(WadError::Parse(_))
        ));
    }

    #[test]
    fn subsector_run_outside_segs() {
        let mut lumps = square_lumps();
        lumps.subsectors[1] = WadSubSector::new(3, 2);
        assert!(matches!(
            archive(&lumps).load_map("E1M1"),
            Err(WadError::Parse(_))
        ));
    }

    #[test]
    fn malformed_tree_aborts_load() {
        let mut lumps = square_lumps();
        lumps.nodes[0].left_child = 3;
        assert!(matches!(
            archive(&lumps).load_map("E1M1"),
            Err(WadError::MalformedTree { index: 3, len: 1 })
        ));
    }

    #[test]
    fn overly_deep_tree_aborts_load() {
        // each record hangs the previous one off its right side
        let mut lumps = square_lumps();
        let template = lumps.nodes[0].clone();
        lumps.nodes = (0..crate::MAX_TREE_DEPTH + 500)
            .map(|i| WadNode {
                right_child: if i == 0 { 0x8000 } else { (i - 1) as u16 },
                left_child: 0x8001,
                ..template.clone()
            })
            .collect();
        assert!(matches!(
            archive(&lumps).load_map("E1M1"),
            Err(WadError::MalformedTree { .. })
        ));
    }
}
