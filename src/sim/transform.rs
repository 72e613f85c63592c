//! Polygons that lean with the agent's motion
//!
//! A [`SkewedPolygon`] keeps its vertices in a local frame and recomputes a
//! world-space [`ConvexPolygon`] once per step from the owner's position and
//! a lean direction. Collision queries always read the cached world polygon.

use glam::{Affine2, Mat2, Vec2};

use super::geometry::ConvexPolygon;

#[derive(Debug, Clone)]
pub struct SkewedPolygon {
    local: ConvexPolygon,
    /// Lean angle (radians); horizontal shear grows with height above the base
    pub direction: f32,
    world: ConvexPolygon,
}

impl SkewedPolygon {
    pub fn new(local: ConvexPolygon) -> Self {
        let world = local.clone();
        Self {
            local,
            direction: 0.0,
            world,
        }
    }

    /// Local-to-world transform for the current lean and `position`
    pub fn transform(&self, position: Vec2) -> Affine2 {
        let shear = Mat2::from_cols(Vec2::X, Vec2::new(self.direction.tan(), 1.0));
        Affine2::from_mat2_translation(shear, position)
    }

    /// Recompute the world polygon. Call once per step, after the owner has
    /// moved and `direction` has been set.
    pub fn pre_step(&mut self, position: Vec2) {
        let transform = self.transform(position);
        // A shear keeps the determinant at 1, so the winding survives
        let vertices = self
            .local
            .vertices()
            .iter()
            .map(|&v| transform.transform_point2(v))
            .collect();
        self.world = ConvexPolygon::from_wound(vertices);
    }

    pub fn local(&self) -> &ConvexPolygon {
        &self.local
    }

    pub fn world(&self) -> &ConvexPolygon {
        &self.world
    }
}
