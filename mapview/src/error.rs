use std::error::Error;
use std::fmt;

use wad::WadError;

pub type ViewResult<T> = Result<T, ViewError>;

#[derive(Debug)]
pub enum ViewError {
    /// Anything raised while reading the archive or walking the tree
    Wad(WadError),
    /// Bad or unreadable view configuration
    Config(String),
}

impl ViewError {
    /// The only failure a caller is expected to carry on from, by asking for
    /// another map
    pub fn is_map_not_found(&self) -> bool {
        matches!(self, ViewError::Wad(e) if e.is_map_not_found())
    }
}

impl Error for ViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ViewError::Wad(e) => Some(e),
            ViewError::Config(_) => None,
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::Wad(e) => write!(f, "{}", e),
            ViewError::Config(msg) => write!(f, "config: {}", msg),
        }
    }
}

impl From<WadError> for ViewError {
    fn from(e: WadError) -> Self {
        ViewError::Wad(e)
    }
}
