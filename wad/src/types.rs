//! Record structures, in WAD order. Each lump of a map is an array of one of
//! these, decoded one fixed-size record at a time.
//!
//! REJECT and BLOCKMAP have no record type here: they are skipped by the map
//! loader.

use std::io::{self, Read, Seek, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::WadResult;
use crate::reader::WadReader;

/// A record type that a lump is made of
pub trait LumpRecord: Sized {
    /// Width of one record in bytes
    const SIZE: usize;

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self>;

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()>;
}

/// Write a name in to an 8 byte NUL padded field
pub fn write_name<W: Write>(w: &mut W, name: &str) -> io::Result<()> {
    let bytes = name.as_bytes();
    if bytes.len() > 8 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("name {} longer than 8 bytes", name),
        ));
    }
    let mut field = [0u8; 8];
    field[..bytes.len()].copy_from_slice(bytes);
    w.write_all(&field)
}

#[inline]
fn write_i16s<W: Write>(w: &mut W, fields: &[i16]) -> io::Result<()> {
    for f in fields {
        w.write_i16::<LittleEndian>(*f)?;
    }
    Ok(())
}

/// A `Thing` describes only the position, type, and angle + spawn flags
///
/// The data in the WAD lump is structured as follows:
///
/// | Field Size | Data Type | Content    |
/// |------------|-----------|------------|
/// |  0x00-0x01 |    i16    | X Position |
/// |  0x02-0x03 |    i16    | Y Position |
/// |  0x04-0x05 |    i16    | Angle      |
/// |  0x06-0x07 |    i16    | Type       |
/// |  0x08-0x09 |    i16    | Flags      |
///
/// Each `Thing` record is 10 bytes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WadThing {
    pub x:     i16,
    pub y:     i16,
    pub angle: i16,
    pub kind:  i16,
    pub flags: i16,
}

impl WadThing {
    pub const fn new(x: i16, y: i16, angle: i16, kind: i16, flags: i16) -> WadThing {
        WadThing {
            x,
            y,
            angle,
            kind,
            flags,
        }
    }
}

impl LumpRecord for WadThing {
    const SIZE: usize = 10;

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self> {
        Ok(WadThing::new(
            r.read_i16()?,
            r.read_i16()?,
            r.read_i16()?,
            r.read_i16()?,
            r.read_i16()?,
        ))
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_i16s(w, &[self.x, self.y, self.angle, self.kind, self.flags])
    }
}

/// A `Vertex` is the basic struct used for any type of coordinate
/// in the map
///
/// | Field Size | Data Type | Content      |
/// |------------|-----------|--------------|
/// |  0x00-0x01 |    i16    | X Coordinate |
/// |  0x02-0x03 |    i16    | Y Coordinate |
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WadVertex {
    pub x: i16,
    pub y: i16,
}

impl WadVertex {
    pub const fn new(x: i16, y: i16) -> WadVertex {
        WadVertex { x, y }
    }
}

impl LumpRecord for WadVertex {
    const SIZE: usize = 4;

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self> {
        Ok(WadVertex::new(r.read_i16()?, r.read_i16()?))
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_i16s(w, &[self.x, self.y])
    }
}

/// Each linedef represents a line from one of the VERTEXES to another.
///
///| Field Size | Data Type | Content                                   |
///|------------|-----------|-------------------------------------------|
///|  0x00-0x01 |    i16    | Start vertex                              |
///|  0x02-0x03 |    i16    | End vertex                                |
///|  0x04-0x05 |    i16    | Flags                                     |
///|  0x06-0x07 |    i16    | Line type / Action                        |
///|  0x08-0x09 |    i16    | Sector tag                                |
///|  0x0A-0x0B |    i16    | Front sidedef                             |
///|  0x0C-0x0D |    i16    | Back sidedef  ( 0xFFFF side not present ) |
///
/// Each linedef's record is 14 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadLineDef {
    /// The line starts from this point
    pub start_vertex:  i16,
    /// The line ends at this point
    pub end_vertex:    i16,
    pub flags:         i16,
    pub special:       i16,
    /// Ties this line's effect to all SECTORS with the same tag
    pub sector_tag:    i16,
    /// The front (right) `SideDef` for this line
    pub front_sidedef: i16,
    /// The back (left) `SideDef`, `None` when the parsed value is `0xFFFF`
    pub back_sidedef:  Option<i16>,
}

impl WadLineDef {
    pub const NO_SIDE: i16 = -1;

    pub const fn new(
        start_vertex: i16,
        end_vertex: i16,
        flags: i16,
        special: i16,
        sector_tag: i16,
        front_sidedef: i16,
        back_sidedef: Option<i16>,
    ) -> WadLineDef {
        WadLineDef {
            start_vertex,
            end_vertex,
            flags,
            special,
            sector_tag,
            front_sidedef,
            back_sidedef,
        }
    }
}

impl LumpRecord for WadLineDef {
    const SIZE: usize = 14;

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self> {
        let start_vertex = r.read_i16()?;
        let end_vertex = r.read_i16()?;
        let flags = r.read_i16()?;
        let special = r.read_i16()?;
        let sector_tag = r.read_i16()?;
        let front_sidedef = r.read_i16()?;
        let back_sidedef = match r.read_i16()? {
            Self::NO_SIDE => None,
            side => Some(side),
        };
        Ok(WadLineDef::new(
            start_vertex,
            end_vertex,
            flags,
            special,
            sector_tag,
            front_sidedef,
            back_sidedef,
        ))
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_i16s(
            w,
            &[
                self.start_vertex,
                self.end_vertex,
                self.flags,
                self.special,
                self.sector_tag,
                self.front_sidedef,
                self.back_sidedef.unwrap_or(Self::NO_SIDE),
            ],
        )
    }
}

/// A sidedef is a definition of what wall texture(s) to draw along a
/// `LineDef`, and a group of sidedefs outline the space of a `Sector`
///
/// Each `SideDef` record is 30 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadSideDef {
    pub x_offset:   i16,
    pub y_offset:   i16,
    /// Name of upper texture used for example in the upper of a window
    pub upper_tex:  String,
    /// Name of lower texture used for example in the front of a step
    pub lower_tex:  String,
    /// The regular part of a wall
    pub middle_tex: String,
    /// Sector that this sidedef faces or helps to surround
    pub sector:     i16,
}

impl LumpRecord for WadSideDef {
    const SIZE: usize = 30;

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self> {
        Ok(WadSideDef {
            x_offset:   r.read_i16()?,
            y_offset:   r.read_i16()?,
            upper_tex:  r.read_name()?,
            lower_tex:  r.read_name()?,
            middle_tex: r.read_name()?,
            sector:     r.read_i16()?,
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_i16s(w, &[self.x_offset, self.y_offset])?;
        write_name(w, &self.upper_tex)?;
        write_name(w, &self.lower_tex)?;
        write_name(w, &self.middle_tex)?;
        w.write_i16::<LittleEndian>(self.sector)
    }
}

/// The Segments (SEGS) are in a sequential order determined by the `SubSector`
/// (SSECTOR), which are part of the NODES recursive tree
///
/// | Field Size | Data Type | Content                              |
/// |------------|-----------|--------------------------------------|
/// |  0x00-0x01 |    i16    | Index to vertex the line starts from |
/// |  0x02-0x03 |    i16    | Index to vertex the line ends with   |
/// |  0x04-0x05 |    i16    | Angle in Binary Angle Measurement (BAMS) |
/// |  0x06-0x07 |    i16    | Index to the linedef this seg travels along|
/// |  0x08-0x09 |    i16    | Direction along line. 0 == SEG is on the right and follows the line, 1 == SEG travels in opposite direction |
/// |  0x0A-0x0B |    i16    | Offset: this is the distance along the linedef this seg starts at |
///
/// Each `Segment` record is 12 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadSegment {
    pub start_vertex: i16,
    pub end_vertex:   i16,
    /// Binary Angle Measurement
    pub angle:        i16,
    /// The Linedef this segment travels along
    pub linedef:      i16,
    /// The `side`, 0 = front/right, 1 = back/left
    pub direction:    i16,
    /// Offset distance along the linedef (from `start_vertex`) to the start
    /// of this `Segment`
    pub offset:       i16,
}

impl WadSegment {
    pub const fn new(
        start_vertex: i16,
        end_vertex: i16,
        angle: i16,
        linedef: i16,
        direction: i16,
        offset: i16,
    ) -> WadSegment {
        WadSegment {
            start_vertex,
            end_vertex,
            angle,
            linedef,
            direction,
            offset,
        }
    }

    /// True if the seg runs opposite to its linedef
    pub const fn is_reversed(&self) -> bool {
        self.direction != 0
    }
}

impl LumpRecord for WadSegment {
    const SIZE: usize = 12;

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self> {
        Ok(WadSegment::new(
            r.read_i16()?,
            r.read_i16()?,
            r.read_i16()?,
            r.read_i16()?,
            r.read_i16()?,
            r.read_i16()?,
        ))
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_i16s(
            w,
            &[
                self.start_vertex,
                self.end_vertex,
                self.angle,
                self.linedef,
                self.direction,
                self.offset,
            ],
        )
    }
}

/// A `SubSector` divides up all the SECTORS into convex polygons. Each one
/// is a contiguous run of `Segment`s.
///
/// | Field Size | Data Type | Content                            |
/// |------------|-----------|------------------------------------|
/// |  0x00-0x01 |    i16    | How many segments line this sector |
/// |  0x02-0x03 |    i16    | Index to the starting segment      |
///
/// Each `SubSector` record is 4 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadSubSector {
    pub seg_count: i16,
    pub start_seg: i16,
}

impl WadSubSector {
    pub const fn new(seg_count: i16, start_seg: i16) -> WadSubSector {
        WadSubSector {
            seg_count,
            start_seg,
        }
    }

    /// The run of indices in to the SEGS array
    pub fn seg_range(&self) -> std::ops::Range<usize> {
        let start = self.start_seg as u16 as usize;
        start..start + self.seg_count as u16 as usize
    }
}

impl LumpRecord for WadSubSector {
    const SIZE: usize = 4;

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self> {
        Ok(WadSubSector::new(r.read_i16()?, r.read_i16()?))
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_i16s(w, &[self.seg_count, self.start_seg])
    }
}

/// A `Sector` is a horizontal area of the map where a floor height and
/// ceiling height is defined.
///
/// Each `Sector` record is 26 bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadSector {
    pub floor_height: i16,
    pub ceil_height:  i16,
    pub floor_tex:    String,
    pub ceil_tex:     String,
    /// Light level from 0-255
    pub light_level:  i16,
    /// Area-effect special
    pub kind:         i16,
    /// Matches LINEDEF(s) with the same tag number
    pub tag:          i16,
}

impl LumpRecord for WadSector {
    const SIZE: usize = 26;

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self> {
        Ok(WadSector {
            floor_height: r.read_i16()?,
            ceil_height:  r.read_i16()?,
            floor_tex:    r.read_name()?,
            ceil_tex:     r.read_name()?,
            light_level:  r.read_i16()?,
            kind:         r.read_i16()?,
            tag:          r.read_i16()?,
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_i16s(w, &[self.floor_height, self.ceil_height])?;
        write_name(w, &self.floor_tex)?;
        write_name(w, &self.ceil_tex)?;
        write_i16s(w, &[self.light_level, self.kind, self.tag])
    }
}

/// Axis aligned box as stored in a node record: top, bottom, left, right
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BBox {
    pub top:    i16,
    pub bottom: i16,
    pub left:   i16,
    pub right:  i16,
}

impl BBox {
    pub const fn new(top: i16, bottom: i16, left: i16, right: i16) -> BBox {
        BBox {
            top,
            bottom,
            left,
            right,
        }
    }

    /// `(left, top)`
    pub const fn top_left(&self) -> (i16, i16) {
        (self.left, self.top)
    }

    /// `(right, bottom)`
    pub const fn bottom_right(&self) -> (i16, i16) {
        (self.right, self.bottom)
    }

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self> {
        Ok(BBox::new(
            r.read_i16()?,
            r.read_i16()?,
            r.read_i16()?,
            r.read_i16()?,
        ))
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_i16s(w, &[self.top, self.bottom, self.left, self.right])
    }
}

/// The base node structure as parsed from the WAD records. What is stored in
/// the WAD is the splitting line used for splitting the map/node, a box which
/// encapsulates the left and right regions of the split, and the index numbers
/// for left and right children of the node; the index is in to the array built
/// from this lump.
///
/// **The last node is the root node**
///
/// | Field Size | Content                                          |
/// |------------|--------------------------------------------------|
/// | 0x00-0x01  | X coordinate of the splitter                     |
/// | 0x02-0x03  | Y coordinate of the splitter                     |
/// | 0x04-0x05  | The amount to move in X to reach end of splitter |
/// | 0x06-0x07  | The amount to move in Y to reach end of splitter |
/// | 0x08-0x0F  | Right (Front) box: top, bottom, left, right      |
/// | 0x10-0x17  | Left (Back) box: top, bottom, left, right        |
/// | 0x18-0x19  | Right (Front) child index + sub-sector indicator |
/// | 0x1A-0x1B  | Left (Back) child index + sub-sector indicator   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadNode {
    pub x:           i16,
    pub y:           i16,
    pub dx:          i16,
    pub dy:          i16,
    pub right_box:   BBox,
    pub left_box:    BBox,
    pub right_child: u16,
    pub left_child:  u16,
}

impl LumpRecord for WadNode {
    const SIZE: usize = 28;

    fn read<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<Self> {
        Ok(WadNode {
            x:           r.read_i16()?,
            y:           r.read_i16()?,
            dx:          r.read_i16()?,
            dy:          r.read_i16()?,
            right_box:   BBox::read(r)?,
            left_box:    BBox::read(r)?,
            right_child: r.read_u16()?,
            left_child:  r.read_u16()?,
        })
    }

    fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_i16s(w, &[self.x, self.y, self.dx, self.dy])?;
        self.right_box.write(w)?;
        self.left_box.write(w)?;
        w.write_u16::<LittleEndian>(self.right_child)?;
        w.write_u16::<LittleEndian>(self.left_child)
    }
}
