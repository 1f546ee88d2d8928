use std::{error::Error, fmt, io};

pub type WadResult<T> = Result<T, WadError>;

/// Everything that can go wrong while reading an archive, loading a map from
/// it, or walking the tree built from it.
///
/// Only `MapNotFound` is something a caller is expected to recover from, the
/// rest abort whatever load or query was in progress.
#[derive(Debug)]
pub enum WadError {
    /// Opening or seeking the byte source failed
    Io(io::Error),
    /// The byte source ran out before a fixed-width field was complete
    TruncatedRead { offset: u64, wanted: usize },
    /// A decoded field breaks a structural rule of the format
    Parse(String),
    /// No directory entry carries the requested map name
    MapNotFound(String),
    /// A non-leaf child reference points outside the raw node records, or the
    /// references form a cycle
    MalformedTree { index: usize, len: usize },
    /// An internal precondition was broken by the caller
    ContractViolation(&'static str),
}

impl WadError {
    pub fn is_map_not_found(&self) -> bool {
        matches!(self, WadError::MapNotFound(_))
    }
}

impl Error for WadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for WadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WadError::Io(e) => write!(f, "I/O error: {}", e),
            WadError::TruncatedRead { offset, wanted } => {
                write!(f, "truncated read: wanted {} bytes at 0x{:08X}", wanted, offset)
            }
            WadError::Parse(m) => write!(f, "parse error: {}", m),
            WadError::MapNotFound(name) => write!(f, "map {} not found", name),
            WadError::MalformedTree { index, len } => write!(
                f,
                "malformed BSP tree: child reference {} with {} node records",
                index, len
            ),
            WadError::ContractViolation(m) => write!(f, "contract violation: {}", m),
        }
    }
}

impl From<io::Error> for WadError {
    fn from(e: io::Error) -> Self {
        WadError::Io(e)
    }
}
