//! Angle and bearing helpers shared by the map crates. Map units are plain
//! `f32` here, angles are degrees.

mod angle;

pub use angle::*;
use glam::Vec2;

/// Binary Angle Measure units in a full turn
pub const BAM_PER_TURN: f32 = 65536.0;

/// Convert a BAM (Binary Angle Measure) to degrees
#[inline]
pub const fn bam_to_degrees(value: u16) -> f32 {
    value as f32 * 360.0 / BAM_PER_TURN
}

/// Convert degrees to the nearest lower BAM. A full turn wraps to 0.
#[inline]
pub fn degrees_to_bam(degrees: f32) -> u16 {
    let turns = degrees.rem_euclid(360.0) / 360.0;
    ((turns * BAM_PER_TURN) as u32 & 0xFFFF) as u16
}

/// Bearing in degrees from `from` towards `to`, in `(-180, 180]`. Not wrapped,
/// callers doing angular spans wrap the difference themselves.
#[inline]
pub fn point_to_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}

/// 2D cross product, positive when `rhs` is counter-clockwise of `lhs`
#[inline]
pub fn cross(lhs: Vec2, rhs: Vec2) -> f32 {
    lhs.x * rhs.y - lhs.y * rhs.x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bam_conversions() {
        assert_eq!(bam_to_degrees(0), 0.0);
        assert_eq!(bam_to_degrees(0x2000), 45.0);
        assert_eq!(bam_to_degrees(0xFFFF), 65535.0 * 360.0 / 65536.0);
        assert_eq!(degrees_to_bam(90.0), 0x4000);
        assert_eq!(degrees_to_bam(360.0), 0);
        assert_eq!(degrees_to_bam(-90.0), 0xC000);
    }

    #[test]
    fn bearings() {
        let o = Vec2::ZERO;
        assert!((point_to_angle(o, Vec2::new(1.0, 1.0)) - 45.0).abs() < 1e-4);
        assert!((point_to_angle(o, Vec2::new(-1.0, 0.0)) - 180.0).abs() < 1e-4);
        assert!((point_to_angle(o, Vec2::new(0.0, -1.0)) + 90.0).abs() < 1e-4);
        assert!(
            (point_to_angle(Vec2::new(10.0, 10.0), Vec2::new(10.0, 20.0)) - 90.0).abs() < 1e-4
        );
    }

    #[test]
    fn cross_sign() {
        let x = Vec2::new(1.0, 0.0);
        let y = Vec2::new(0.0, 1.0);
        assert_eq!(cross(x, y), 1.0);
        assert_eq!(cross(y, x), -1.0);
        assert_eq!(cross(x, x), 0.0);
    }
}
