use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::fmt;

use log::{debug, info, warn};

use crate::error::{WadError, WadResult};
use crate::reader::{ReadSeek, WadReader};

/// Size of one directory record in bytes
pub const DIRECTORY_ENTRY_SIZE: u64 = 16;
/// Size of the header in bytes
pub const HEADER_SIZE: u64 = 12;

/// Header which tells us the WAD type and where the data is
///
/// The header structure in the WAD is as follows:
///
/// | Field Size | Data Type    | Content                                              |
/// |------------|--------------|------------------------------------------------------|
/// | 0x00-0x03  | 4 ASCII char | ASCII string, usually either "IWAD" or "PWAD"        |
/// | 0x04-0x07  | signed int   | The number entries in the directory                  |
/// | 0x08-0x0b  | signed int   | Offset in bytes to the directory in the WAD file     |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadHeader {
    /// Will be either `IWAD` for game, or `PWAD` for patch
    pub wad_type:   [u8; 4],
    /// The count of "lumps" of data
    pub dir_count:  i32,
    /// Offset in bytes that the directory starts at
    pub dir_offset: i32,
}

impl WadHeader {
    pub fn magic(&self) -> String {
        self.wad_type.iter().map(|b| *b as char).collect()
    }
}

impl fmt::Display for WadHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "MAGIC: {}\nNumber of Lumps: {}\nDirectory Offset: 0x{:08x}",
            self.magic(),
            self.dir_count,
            self.dir_offset
        )
    }
}

/// Contains the details for a lump of data: where it starts, the size of it,
/// and the name
///
/// | Field Size | Data Type    | Content                                                    |
/// |------------|--------------|------------------------------------------------------------|
/// | 0x00-0x03  | signed int   | Offset value to the start of the lump data in the WAD file |
/// | 0x04-0x07  | signed int   | The size of the lump in bytes                              |
/// | 0x08-0x0f  | 8 ASCII char | ASCII holding the name of the lump                         |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadDirectory {
    /// The offset in bytes where the lump data starts
    pub lump_offset:  i32,
    /// The size in bytes of the lump referenced
    pub lump_size:    i32,
    /// Name for the lump data, NUL padding removed
    pub lump_name:    String,
    /// Where this directory record itself sits in the file
    pub entry_offset: u64,
}

impl fmt::Display for WadDirectory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Name: {}\nOffset: 0x{:08X}\nsize: {:2.02}kb",
            self.lump_name,
            self.lump_offset,
            self.lump_size as f32 / 1024.0
        )
    }
}

/// Decode the 12 byte header at the start of the source
pub fn read_header<R: Read + Seek>(r: &mut WadReader<R>) -> WadResult<WadHeader> {
    r.seek_to(0)?;
    Ok(WadHeader {
        wad_type:   r.read_bytes::<4>()?,
        dir_count:  r.read_i32()?,
        dir_offset: r.read_i32()?,
    })
}

/// Read exactly `header.dir_count` directory records, in file order. The
/// order matters: a map's lumps are the run that follows its marker.
pub fn read_directory<R: Read + Seek>(
    header: &WadHeader,
    r: &mut WadReader<R>,
) -> WadResult<Vec<WadDirectory>> {
    if header.dir_count < 0 || header.dir_offset < 0 {
        return Err(WadError::Parse(format!(
            "negative directory count {} or offset {}",
            header.dir_count, header.dir_offset
        )));
    }
    let dir_end = header.dir_offset as u64 + header.dir_count as u64 * DIRECTORY_ENTRY_SIZE;
    let file_len = r.source_len()?;
    if dir_end > file_len {
        return Err(WadError::Parse(format!(
            "directory ends at {} but the archive is {} bytes",
            dir_end, file_len
        )));
    }

    r.seek_to(header.dir_offset as u64)?;
    let mut dirs = Vec::with_capacity(header.dir_count as usize);
    for _ in 0..header.dir_count {
        let entry_offset = r.position();
        dirs.push(WadDirectory {
            lump_offset: r.read_i32()?,
            lump_size: r.read_i32()?,
            lump_name: r.read_name()?,
            entry_offset,
        });
    }
    Ok(dirs)
}

#[derive(Clone)]
enum WadSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

impl fmt::Debug for WadSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WadSource::File(p) => write!(f, "File({:?})", p),
            WadSource::Memory(b) => write!(f, "Memory({} bytes)", b.len()),
        }
    }
}

/// "Where's All (the) Data": the header and directory of an archive, plus
/// where to find the lump bytes when a map is loaded.
///
/// The byte source is only held open while the index is read and while a
/// map is loaded, never in between.
#[derive(Debug, Clone)]
pub struct WadData {
    source:   WadSource,
    header:   WadHeader,
    wad_dirs: Vec<WadDirectory>,
}

impl WadData {
    /// Open an archive on disk and read its header and directory
    pub fn open<P: AsRef<Path>>(path: P) -> WadResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut wad = WadData {
            source:   WadSource::File(path),
            header:   WadHeader {
                wad_type:   [0; 4],
                dir_count:  0,
                dir_offset: 0,
            },
            wad_dirs: Vec::new(),
        };
        wad.read_index()?;
        Ok(wad)
    }

    /// Use an archive already in memory
    pub fn from_bytes(bytes: Vec<u8>) -> WadResult<Self> {
        let mut wad = WadData {
            source:   WadSource::Memory(bytes),
            header:   WadHeader {
                wad_type:   [0; 4],
                dir_count:  0,
                dir_offset: 0,
            },
            wad_dirs: Vec::new(),
        };
        wad.read_index()?;
        Ok(wad)
    }

    fn read_index(&mut self) -> WadResult<()> {
        let mut r = self.open_source()?;
        let header = read_header(&mut r)?;
        if &header.wad_type != b"IWAD" && &header.wad_type != b"PWAD" {
            warn!("Unexpected archive magic {:?}", header.magic());
        }
        let dirs = read_directory(&header, &mut r)?;
        drop(r);

        info!(
            "Opened {} {:?} with {} lumps",
            header.magic(),
            self.source,
            dirs.len()
        );
        self.header = header;
        self.wad_dirs = dirs;
        Ok(())
    }

    /// A fresh reader over the archive bytes, positioned at the start
    pub(crate) fn open_source(&self) -> WadResult<WadReader<Box<dyn ReadSeek + '_>>> {
        let source: Box<dyn ReadSeek + '_> = match &self.source {
            WadSource::File(path) => {
                debug!("Opening {:?}", path);
                Box::new(BufReader::new(File::open(path)?))
            }
            WadSource::Memory(bytes) => Box::new(Cursor::new(bytes.as_slice())),
        };
        WadReader::new(source)
    }

    pub fn header(&self) -> &WadHeader {
        &self.header
    }

    pub fn lumps(&self) -> &[WadDirectory] {
        &self.wad_dirs
    }

    /// First entry with exactly this name, no fallback
    pub fn find_entry(&self, name: &str) -> Option<&WadDirectory> {
        self.wad_dirs.iter().find(|d| d.lump_name == name)
    }

    pub(crate) fn find_entry_index(&self, name: &str) -> Option<usize> {
        self.wad_dirs.iter().position(|d| d.lump_name == name)
    }

    pub fn lump_exists(&self, name: &str) -> bool {
        self.find_entry(name).is_some()
    }

    /// Names of every map marker in directory order. A marker is a zero sized
    /// lump named `ExMy` or `MAPxx`.
    pub fn map_names(&self) -> Vec<&str> {
        self.wad_dirs
            .iter()
            .filter(|d| d.lump_size == 0 && is_map_name(&d.lump_name))
            .map(|d| d.lump_name.as_str())
            .collect()
    }
}

fn is_map_name(name: &str) -> bool {
    let b = name.as_bytes();
    match b {
        [b'E', e, b'M', m] => e.is_ascii_digit() && m.is_ascii_digit(),
        [b'M', b'A', b'P', x, y] => x.is_ascii_digit() && y.is_ascii_digit(),
        _ => false,
    }
}

impl fmt::Display for WadData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        write!(f, "DIRECTORY")?;
        for lump in &self.wad_dirs {
            write!(f, "\n{}", lump)?;
        }
        Ok(())
    }
}
