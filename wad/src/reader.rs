//! Fixed-width little-endian field decoding over any seekable byte source.

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{WadError, WadResult};

/// Anything the archive can be read from: an open file or a buffer in memory
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Wraps a byte source and tracks the absolute position so that a short read
/// can report where it happened.
///
/// Every read advances the position by exactly the width of the field. A read
/// that runs off the end of the source is a `WadError::TruncatedRead`.
pub struct WadReader<R> {
    inner: R,
    pos:   u64,
}

impl<R: Read + Seek> WadReader<R> {
    pub fn new(mut inner: R) -> WadResult<Self> {
        let pos = inner.stream_position()?;
        Ok(Self { inner, pos })
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    pub fn seek_to(&mut self, offset: u64) -> WadResult<()> {
        self.pos = self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Length of the whole source. The position is left untouched.
    pub fn source_len(&mut self) -> WadResult<u64> {
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(self.pos))?;
        Ok(end)
    }

    #[inline]
    fn advance<T>(&mut self, wanted: usize, res: io::Result<T>) -> WadResult<T> {
        match res {
            Ok(v) => {
                self.pos += wanted as u64;
                Ok(v)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(WadError::TruncatedRead {
                offset: self.pos,
                wanted,
            }),
            Err(e) => Err(WadError::Io(e)),
        }
    }

    pub fn read_i32(&mut self) -> WadResult<i32> {
        let res = self.inner.read_i32::<LittleEndian>();
        self.advance(4, res)
    }

    pub fn read_i16(&mut self) -> WadResult<i16> {
        let res = self.inner.read_i16::<LittleEndian>();
        self.advance(2, res)
    }

    pub fn read_u16(&mut self) -> WadResult<u16> {
        let res = self.inner.read_u16::<LittleEndian>();
        self.advance(2, res)
    }

    pub fn read_u8(&mut self) -> WadResult<u8> {
        let res = self.inner.read_u8();
        self.advance(1, res)
    }

    pub fn read_bytes<const N: usize>(&mut self) -> WadResult<[u8; N]> {
        let mut buf = [0u8; N];
        let res = self.inner.read_exact(&mut buf);
        self.advance(N, res).map(|_| buf)
    }

    /// An 8 byte ASCII name field. Trailing NUL padding is dropped.
    pub fn read_name(&mut self) -> WadResult<String> {
        let raw = self.read_bytes::<8>()?;
        Ok(name_from_bytes(&raw))
    }
}

/// Lump and texture names are stored NUL padded, better to address this early
/// to avoid many conversions later
pub fn name_from_bytes(raw: &[u8]) -> String {
    let end = raw.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    raw[..end].iter().map(|b| *b as char).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{WadReader, name_from_bytes};
    use crate::WadError;

    #[test]
    fn little_endian_fields() {
        let bytes = [
            0x78, 0x56, 0x34, 0x12, // i32
            0xFE, 0xFF, // i16 -2
            0x00, 0x80, // u16 32768
            0xAB, // u8
        ];
        let mut r = WadReader::new(Cursor::new(&bytes[..])).unwrap();
        assert_eq!(r.read_i32().unwrap(), 0x12345678);
        assert_eq!(r.read_i16().unwrap(), -2);
        assert_eq!(r.read_u16().unwrap(), 32768);
        assert_eq!(r.read_u8().unwrap(), 0xAB);
        assert_eq!(r.position(), 9);
    }

    #[test]
    fn short_read_reports_offset() {
        let bytes = [1u8, 0, 0, 0, 7];
        let mut r = WadReader::new(Cursor::new(&bytes[..])).unwrap();
        r.read_i32().unwrap();
        match r.read_i16() {
            Err(WadError::TruncatedRead { offset, wanted }) => {
                assert_eq!(offset, 4);
                assert_eq!(wanted, 2);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn seek_then_read() {
        let bytes = [0u8, 0, 0, 0, 0x10, 0x00];
        let mut r = WadReader::new(Cursor::new(&bytes[..])).unwrap();
        r.seek_to(4).unwrap();
        assert_eq!(r.read_i16().unwrap(), 16);
        assert_eq!(r.source_len().unwrap(), 6);
        assert_eq!(r.position(), 6);
    }

    #[test]
    fn names_lose_trailing_nul_only() {
        assert_eq!(name_from_bytes(b"E1M1\0\0\0\0"), "E1M1");
        assert_eq!(name_from_bytes(b"VERTEXES"), "VERTEXES");
        assert_eq!(name_from_bytes(b"\0\0\0\0\0\0\0\0"), "");
        assert_eq!(name_from_bytes(b"AB\0C\0\0\0\0"), "AB\0C");
    }
}
