use glam::IVec2;
use log::debug;
use wad::{BspNode, WadError, WadMap};

use crate::config::ViewConfig;
use crate::error::ViewResult;
use crate::projector::{DrawSegment, MapBounds, Projector};
use crate::viewer::Viewer;

/// The view cone as display lines, for drawing over the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FovOverlay {
    /// Where the viewer is
    pub marker: IVec2,
    /// Counter-clockwise edge
    pub left:   DrawSegment,
    /// Clockwise edge
    pub right:  DrawSegment,
}

/// A loaded map ready to be viewed. The decoded records never change, the
/// projected vertex cache is rebuilt whenever the viewport does.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    data:      WadMap,
    config:    ViewConfig,
    projector: Projector,
    projected: Vec<IVec2>,
}

impl Map {
    /// Fails if the config is bad or any record indexes outside the arrays
    /// of `data`
    pub fn new(data: WadMap, config: ViewConfig) -> ViewResult<Self> {
        config.validate()?;
        data.validate()?;
        let bounds = MapBounds::from_vertexes(&data.vertexes)
            .ok_or_else(|| WadError::Parse(format!("map {} has no vertexes", data.name)))?;
        let projector = Projector::new(bounds, &config);
        let mut map = Map {
            data,
            config,
            projector,
            projected: Vec::new(),
        };
        map.project_vertexes();
        Ok(map)
    }

    fn project_vertexes(&mut self) {
        let projector = &self.projector;
        self.projected = self
            .data
            .vertexes
            .iter()
            .map(|v| projector.project_vertex(v))
            .collect();
        debug!(
            "Projected {} vertexes of {} in to {}x{}",
            self.projected.len(),
            self.data.name,
            self.config.width,
            self.config.height
        );
    }

    /// Change the display area and rebuild the projected vertex cache
    pub fn set_viewport(&mut self, config: ViewConfig) -> ViewResult<()> {
        config.validate()?;
        self.projector = Projector::new(*self.projector.bounds(), &config);
        self.config = config;
        self.project_vertexes();
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn data(&self) -> &WadMap {
        &self.data
    }

    pub fn root(&self) -> &BspNode {
        &self.data.root
    }

    pub fn bounds(&self) -> &MapBounds {
        self.projector.bounds()
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Every vertex in display space, same order as the VERTEXES lump
    pub fn projected_vertexes(&self) -> &[IVec2] {
        &self.projected
    }

    pub(crate) fn vertex_pair(&self, start: i16, end: i16) -> Option<DrawSegment> {
        Some(DrawSegment {
            start: *self.projected.get(start as u16 as usize)?,
            end:   *self.projected.get(end as u16 as usize)?,
        })
    }

    /// Every linedef in display space, for the whole-map outline
    pub fn linedef_overlay(&self) -> Vec<DrawSegment> {
        self.data
            .linedefs
            .iter()
            .filter_map(|l| self.vertex_pair(l.start_vertex, l.end_vertex))
            .collect()
    }

    /// Standing on the first thing, usually player one's start. A map with no
    /// things is viewed from the middle, facing east.
    pub fn default_viewer(&self) -> Viewer {
        match self.data.things.first() {
            Some(thing) => Viewer::from_thing(thing, self.config.fov),
            None => Viewer::new(self.bounds().center(), 0.0, self.config.fov),
        }
    }

    /// The two cone edges run a display height's worth of map units out from
    /// the viewer, and are clamped to the map like everything else
    pub fn fov_overlay(&self, viewer: &Viewer) -> FovOverlay {
        let reach = self.config.height as f32;
        let (left, right) = viewer.fov_edges();
        let marker = self.projector.project(viewer.position);
        FovOverlay {
            marker,
            left: DrawSegment {
                start: marker,
                end:   self.projector.project(viewer.position + left.unit() * reach),
            },
            right: DrawSegment {
                start: marker,
                end:   self.projector.project(viewer.position + right.unit() * reach),
            },
        }
    }
}
