use glam::Vec2;
use math::Angle;
use wad::WadThing;

/// Where the map is being looked at from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewer {
    /// Map units
    pub position: Vec2,
    /// Facing, counter-clockwise from +X
    pub angle:    Angle,
    /// Full width of the view cone, degrees
    pub fov:      f32,
}

impl Viewer {
    pub fn new(position: Vec2, degrees: f32, fov: f32) -> Self {
        Self {
            position,
            angle: Angle::new(degrees),
            fov,
        }
    }

    /// Facing given in BAM, 65536 to a turn
    pub fn from_bam(position: Vec2, bam: u16, fov: f32) -> Self {
        Self {
            position,
            angle: Angle::from_bam(bam),
            fov,
        }
    }

    /// Stand on a thing's spawn spot. The facing is read as whole degrees
    /// (0 east, 90 north), which is how map editors write THINGS. Data that
    /// holds BAM there instead goes through [`Viewer::from_bam`].
    pub fn from_thing(thing: &WadThing, fov: f32) -> Self {
        Self::new(
            Vec2::new(thing.x as f32, thing.y as f32),
            thing.angle as f32,
            fov,
        )
    }

    #[inline]
    pub fn half_fov(&self) -> f32 {
        self.fov / 2.0
    }

    /// Both edges of the view cone, left (counter-clockwise) edge first
    pub fn fov_edges(&self) -> (Angle, Angle) {
        (self.angle + self.half_fov(), self.angle - self.half_fov())
    }
}

#[cfg(test)]
mod tests {
    use super::Viewer;
    use glam::Vec2;
    use wad::WadThing;

    #[test]
    fn from_thing_uses_degrees() {
        let thing = WadThing {
            x:     1056,
            y:     -3616,
            angle: 90,
            kind:  1,
            flags: 7,
        };
        let v = Viewer::from_thing(&thing, 90.0);
        assert_eq!(v.position, Vec2::new(1056.0, -3616.0));
        assert_eq!(v.angle.deg(), 90.0);
        assert_eq!(v.half_fov(), 45.0);
    }

    #[test]
    fn from_bam_and_wrap() {
        let v = Viewer::from_bam(Vec2::ZERO, 0x8000, 90.0);
        assert_eq!(v.angle.deg(), 180.0);
        let v = Viewer::new(Vec2::ZERO, -90.0, 90.0);
        assert_eq!(v.angle.deg(), 270.0);
    }

    #[test]
    fn cone_edges() {
        let v = Viewer::new(Vec2::ZERO, 20.0, 90.0);
        let (l, r) = v.fov_edges();
        assert!((l.deg() - 65.0).abs() < 1e-4);
        assert!((r.deg() - 335.0).abs() < 1e-4);
    }
}
