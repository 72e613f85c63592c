//! In-place vector algebra
//!
//! Collision math reads as a chain of mutations on a scratch vector
//! (`copy_from(a).subtract(b).set_projection_onto(n).scale_by(k)`). Every operation
//! here mutates the receiver and hands it back so those chains compose.

use glam::Vec2;

/// Mutating 2D vector operations on [`Vec2`]
pub trait VectorOps {
    fn add_vec(&mut self, other: Vec2) -> &mut Self;
    fn subtract(&mut self, other: Vec2) -> &mut Self;
    fn scale_by(&mut self, factor: f32) -> &mut Self;
    fn copy_from(&mut self, other: Vec2) -> &mut Self;

    /// Replace `self` with its projection onto `onto`: `(self·onto / onto·onto) * onto`.
    ///
    /// `onto` must be non-zero; callers only project onto contact normals
    /// they have already checked.
    fn set_projection_onto(&mut self, onto: Vec2) -> &mut Self;
}

impl VectorOps for Vec2 {
    #[inline]
    fn add_vec(&mut self, other: Vec2) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    #[inline]
    fn subtract(&mut self, other: Vec2) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    #[inline]
    fn scale_by(&mut self, factor: f32) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self
    }

    #[inline]
    fn copy_from(&mut self, other: Vec2) -> &mut Self {
        self.x = other.x;
        self.y = other.y;
        self
    }

    #[inline]
    fn set_projection_onto(&mut self, onto: Vec2) -> &mut Self {
        debug_assert!(onto != Vec2::ZERO, "projection onto a zero vector");
        let factor = self.dot(onto) / onto.dot(onto);
        self.copy_from(onto).scale_by(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_ops_mutate_receiver() {
        let mut v = Vec2::new(1.0, 2.0);
        v.add_vec(Vec2::new(3.0, 4.0)).scale_by(2.0).subtract(Vec2::ONE);
        assert_eq!(v, Vec2::new(7.0, 11.0));
    }

    #[test]
    fn copy_from_overwrites() {
        let mut v = Vec2::new(9.0, 9.0);
        v.copy_from(Vec2::new(-1.0, 0.5));
        assert_eq!(v, Vec2::new(-1.0, 0.5));
    }

    #[test]
    fn projection_uses_previous_value() {
        let mut v = Vec2::new(3.0, 4.0);
        v.set_projection_onto(Vec2::new(2.0, 0.0));
        assert_eq!(v, Vec2::new(3.0, 0.0));

        let mut diag = Vec2::new(2.0, 0.0);
        diag.set_projection_onto(Vec2::new(1.0, 1.0));
        assert!((diag - Vec2::new(1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn projection_of_perpendicular_is_zero() {
        let mut v = Vec2::new(0.0, 5.0);
        v.set_projection_onto(Vec2::new(-3.0, 0.0));
        assert!(v.length() < 1e-6);
    }
}
