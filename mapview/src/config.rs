//! Display configuration. Stored as RON.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::info;
use nanoserde::{DeRon, SerRon};

use crate::error::{ViewError, ViewResult};

const LOG_TAG: &str = "ViewConfig";

/// The display area segments are projected in to, plus the viewer's field of
/// view. `inset` is the blank border, in pixels, kept on every side.
#[derive(Debug, Clone, Copy, PartialEq, DeRon, SerRon)]
pub struct ViewConfig {
    pub width:  u32,
    pub height: u32,
    pub inset:  u32,
    /// Degrees, full width of the cone
    pub fov:    f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            width:  1280,
            height: 800,
            inset:  30,
            fov:    90.0,
        }
    }
}

impl ViewConfig {
    #[inline]
    pub fn half_fov(&self) -> f32 {
        self.fov / 2.0
    }

    pub fn validate(&self) -> ViewResult<()> {
        let border = self.inset.saturating_mul(2);
        if self.width <= border || self.height <= border {
            return Err(ViewError::Config(format!(
                "display {}x{} leaves nothing inside an inset of {}",
                self.width, self.height, self.inset
            )));
        }
        if !(self.fov > 0.0 && self.fov < 360.0) {
            return Err(ViewError::Config(format!(
                "field of view {} is outside (0, 360)",
                self.fov
            )));
        }
        Ok(())
    }

    pub fn from_ron(data: &str) -> ViewResult<Self> {
        let config = ViewConfig::deserialize_ron(data)
            .map_err(|e| ViewError::Config(format!("could not deserialise: {:?}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> String {
        self.serialize_ron()
    }

    /// Read the config at `path`. A file that does not exist gives the
    /// defaults, anything else that goes wrong is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> ViewResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(data) => {
                let config = ViewConfig::from_ron(&data)?;
                info!(target: LOG_TAG, "Loaded view config {:?}", path);
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(target: LOG_TAG, "No config at {:?}, using defaults", path);
                Ok(ViewConfig::default())
            }
            Err(e) => Err(ViewError::Config(format!(
                "could not read {:?}: {}",
                path, e
            ))),
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> ViewResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_ron())
            .map_err(|e| ViewError::Config(format!("could not write {:?}: {}", path, e)))?;
        info!(target: LOG_TAG, "Saved view config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ViewConfig;
    use crate::error::ViewError;

    #[test]
    fn defaults() {
        let c = ViewConfig::default();
        assert_eq!((c.width, c.height, c.inset), (1280, 800, 30));
        assert_eq!(c.half_fov(), 45.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn ron_round_trip() {
        let c = ViewConfig {
            width:  640,
            height: 480,
            inset:  10,
            fov:    60.0,
        };
        let text = c.to_ron();
        assert_eq!(ViewConfig::from_ron(&text).unwrap(), c);
    }

    #[test]
    fn from_ron_text() {
        let c = ViewConfig::from_ron("(width: 320, height: 200, inset: 4, fov: 75.0)").unwrap();
        assert_eq!(c.width, 320);
        assert_eq!(c.height, 200);
        assert_eq!(c.inset, 4);
        assert_eq!(c.fov, 75.0);
    }

    #[test]
    fn rejects_garbage_and_bad_values() {
        assert!(matches!(
            ViewConfig::from_ron("not ron at all"),
            Err(ViewError::Config(_))
        ));
        let too_small = ViewConfig {
            width: 60,
            ..ViewConfig::default()
        };
        assert!(too_small.validate().is_err());
        let wide = ViewConfig {
            fov: 360.0,
            ..ViewConfig::default()
        };
        assert!(wide.validate().is_err());
        let none = ViewConfig {
            fov: 0.0,
            ..ViewConfig::default()
        };
        assert!(none.validate().is_err());
    }

    #[test]
    fn load_missing_and_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.ron");
        assert_eq!(ViewConfig::load(&path).unwrap(), ViewConfig::default());

        let c = ViewConfig {
            width: 1024,
            height: 768,
            ..ViewConfig::default()
        };
        c.write(&path).unwrap();
        assert_eq!(ViewConfig::load(&path).unwrap(), c);

        std::fs::write(&path, "(width: 1").unwrap();
        assert!(matches!(ViewConfig::load(&path), Err(ViewError::Config(_))));
    }
}
