//! Map space to display space. X is stretched over the display width and Y
//! over the height, flipped so map north is display up, both inside the inset
//! border.

use glam::{IVec2, Vec2};
use wad::WadVertex;

use crate::config::ViewConfig;
use crate::map::Map;
use crate::visibility::VisibleSubsectors;

/// Smallest box holding every vertex of a map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl MapBounds {
    /// `None` if there are no vertexes
    pub fn from_vertexes(vertexes: &[WadVertex]) -> Option<Self> {
        let first = vertexes.first()?;
        let first = Vec2::new(first.x as f32, first.y as f32);
        Some(vertexes.iter().fold(
            MapBounds {
                min: first,
                max: first,
            },
            |b, v| {
                let p = Vec2::new(v.x as f32, v.y as f32);
                MapBounds {
                    min: b.min.min(p),
                    max: b.max.max(p),
                }
            },
        ))
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }
}

/// A line to draw, display pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSegment {
    pub start: IVec2,
    pub end:   IVec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    bounds: MapBounds,
    height: f32,
    x_out:  (f32, f32),
    y_out:  (f32, f32),
}

impl Projector {
    pub fn new(bounds: MapBounds, config: &ViewConfig) -> Self {
        let inset = config.inset as f32;
        Self {
            bounds,
            height: config.height as f32,
            x_out: (inset, config.width as f32 - inset),
            y_out: (inset, config.height as f32 - inset),
        }
    }

    pub fn bounds(&self) -> &MapBounds {
        &self.bounds
    }

    #[inline]
    fn remap(value: f32, in_min: f32, in_max: f32, (out_min, out_max): (f32, f32)) -> f32 {
        let span = in_max - in_min;
        if span == 0.0 {
            return out_min;
        }
        (value.clamp(in_min, in_max) - in_min) * (out_max - out_min) / span + out_min
    }

    #[inline]
    pub fn remap_x(&self, x: f32) -> i32 {
        Self::remap(x, self.bounds.min.x, self.bounds.max.x, self.x_out) as i32
    }

    #[inline]
    pub fn remap_y(&self, y: f32) -> i32 {
        let (out_min, out_max) = self.y_out;
        // map the offset from the bottom edge, then flip
        let up = Self::remap(y, self.bounds.min.y, self.bounds.max.y, (0.0, out_max - out_min));
        (self.height - up - out_min) as i32
    }

    #[inline]
    pub fn project(&self, p: Vec2) -> IVec2 {
        IVec2::new(self.remap_x(p.x), self.remap_y(p.y))
    }

    #[inline]
    pub fn project_vertex(&self, v: &WadVertex) -> IVec2 {
        self.project(Vec2::new(v.x as f32, v.y as f32))
    }
}

/// Every seg of every visible subsector as a display line, `near` subsectors
/// first. Subsectors and segs are drawn in the order given.
pub fn build_draw_list(map: &Map, visible: &VisibleSubsectors) -> Vec<DrawSegment> {
    let data = map.data();
    let mut out = Vec::new();
    for subsector in visible.iter() {
        let Some(ss) = data.subsectors.get(subsector as usize) else {
            continue;
        };
        let Some(segs) = data.segments.get(ss.seg_range()) else {
            continue;
        };
        out.extend(
            segs.iter()
                .filter_map(|seg| map.vertex_pair(seg.start_vertex, seg.end_vertex)),
        );
    }
    out
}
