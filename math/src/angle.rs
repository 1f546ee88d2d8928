use glam::Vec2;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

const FULL_TURN: f32 = 360.0;

/// An angle in degrees, counter-clockwise from +X. Always kept in `[0, 360)`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Angle(f32);

impl Angle {
    /// Will always wrap < 0 to < 360
    #[inline]
    pub const fn new(mut degrees: f32) -> Self {
        degrees %= FULL_TURN;
        if degrees < 0.0 {
            degrees += FULL_TURN;
        }
        // -tiny + 360 rounds to 360
        if degrees >= FULL_TURN {
            degrees = 0.0;
        }
        Angle(degrees)
    }

    /// From a Binary Angle Measure, 65536 units to a turn
    #[inline]
    pub const fn from_bam(bam: u16) -> Self {
        Angle(crate::bam_to_degrees(bam))
    }

    #[inline]
    pub const fn deg(&self) -> f32 {
        self.0
    }

    #[inline]
    pub fn rad(&self) -> f32 {
        self.0.to_radians()
    }

    #[inline]
    pub fn to_bam(&self) -> u16 {
        crate::degrees_to_bam(self.0)
    }

    #[inline]
    pub fn sin_cos(&self) -> (f32, f32) {
        self.rad().sin_cos()
    }

    #[inline(always)]
    pub fn unit(&self) -> Vec2 {
        let (y, x) = self.sin_cos();
        Vec2::new(x, y)
    }

    pub fn from_vector(input: Vec2) -> Self {
        Angle::new(input.y.atan2(input.x).to_degrees())
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, other: Angle) -> Angle {
        Angle::new(self.0 + other.0)
    }
}

impl Add<f32> for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, other: f32) -> Angle {
        Angle::new(self.0 + other)
    }
}

impl AddAssign<f32> for Angle {
    #[inline]
    fn add_assign(&mut self, other: f32) {
        *self = Angle::new(self.0 + other);
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, other: Angle) -> Angle {
        Angle::new(self.0 - other.0)
    }
}

impl Sub<f32> for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, other: f32) -> Angle {
        Angle::new(self.0 - other)
    }
}

impl SubAssign<f32> for Angle {
    #[inline]
    fn sub_assign(&mut self, other: f32) {
        *self = Angle::new(self.0 - other);
    }
}

impl Neg for Angle {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Angle::new(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Angle;
    use glam::Vec2;

    #[test]
    fn wraps_in_to_range() {
        assert_eq!(Angle::new(360.0).deg(), 0.0);
        assert_eq!(Angle::new(-90.0).deg(), 270.0);
        assert_eq!(Angle::new(450.0).deg(), 90.0);
        assert_eq!(Angle::new(-720.0).deg(), 0.0);
        let tiny = Angle::new(-1e-6).deg();
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn add_sub_wrap() {
        let a = Angle::new(350.0) + 20.0;
        assert!((a.deg() - 10.0).abs() < 1e-4);
        let b = Angle::new(10.0) - Angle::new(20.0);
        assert!((b.deg() - 350.0).abs() < 1e-4);
        let mut c = Angle::new(0.0);
        c -= 45.0;
        assert!((c.deg() - 315.0).abs() < 1e-4);
        assert!(((-Angle::new(90.0)).deg() - 270.0).abs() < 1e-4);
    }

    #[test]
    fn unit_vector() {
        let u = Angle::new(90.0).unit();
        assert!(u.x.abs() < 1e-6);
        assert!((u.y - 1.0).abs() < 1e-6);
        let a = Angle::from_vector(Vec2::new(-1.0, 0.0));
        assert!((a.deg() - 180.0).abs() < 1e-4);
        let a = Angle::from_vector(Vec2::new(0.0, -1.0));
        assert!((a.deg() - 270.0).abs() < 1e-4);
    }

    #[test]
    fn bam() {
        assert_eq!(Angle::from_bam(0x4000).deg(), 90.0);
        assert_eq!(Angle::from_bam(0x8000).deg(), 180.0);
        assert_eq!(Angle::new(270.0).to_bam(), 0xC000);
    }
}
