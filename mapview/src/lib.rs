//! Top down view of a map from a WAD. Loads the map, walks its BSP tree from
//! a viewer's position and hands back, in draw order, the wall segs that can
//! be seen, already placed in display pixels.
//!
//! Drawing them is left to the caller. Alongside the visible segs a [`Map`]
//! offers the full linedef outline and the view cone as separate overlays.
//!
//! ```no_run
//! let wad = mapview::open("doom1.wad")?;
//! let map = mapview::load_map(&wad, "E1M1")?;
//! let viewer = map.default_viewer();
//! for seg in mapview::compute_frame(&map, &viewer)? {
//!     println!("{} -> {}", seg.start, seg.end);
//! }
//! # Ok::<(), mapview::ViewError>(())
//! ```

mod config;
mod error;
mod map;
mod projector;
mod viewer;
pub mod visibility;

use std::path::Path;

use log::info;
use wad::{BspNode, WadData};

pub use crate::config::ViewConfig;
pub use crate::error::{ViewError, ViewResult};
pub use crate::map::{FovOverlay, Map};
pub use crate::projector::{DrawSegment, MapBounds, Projector, build_draw_list};
pub use crate::viewer::Viewer;
pub use crate::visibility::{VisibleSubsectors, box_in_fov, visible_subsectors};
pub use wad;

/// Read an archive's header and directory. Lumps are read later, on demand.
pub fn open<P: AsRef<Path>>(path: P) -> ViewResult<WadData> {
    Ok(WadData::open(path)?)
}

/// Load `name` for the default display
pub fn load_map(wad: &WadData, name: &str) -> ViewResult<Map> {
    load_map_with(wad, name, ViewConfig::default())
}

pub fn load_map_with(wad: &WadData, name: &str, config: ViewConfig) -> ViewResult<Map> {
    let map = Map::new(wad.load_map(name)?, config)?;
    let bounds = map.bounds();
    info!(
        "{}: bounds ({}, {}) to ({}, {}), BSP depth {}",
        map.name(),
        bounds.min.x,
        bounds.min.y,
        bounds.max.x,
        bounds.max.y,
        map.root().depth()
    );
    Ok(map)
}

/// The visible segs from `viewer`, nearest half of the map first
pub fn compute_frame(map: &Map, viewer: &Viewer) -> ViewResult<Vec<DrawSegment>> {
    let visible = match map.root() {
        // No nodes, the whole map is the one subsector
        BspNode::Leaf { subsector } => VisibleSubsectors {
            near: vec![*subsector],
            far:  Vec::new(),
        },
        root => visible_subsectors(root, viewer)?,
    };
    Ok(build_draw_list(map, &visible))
}
