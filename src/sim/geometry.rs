//! Collision geometry: circles, convex polygons and the target-zone rectangle
//!
//! Items are always circles and only the agent carries polygons, so the only
//! pairings needed are circle-circle, circle-polygon and circle-rectangle.
//! Every test returns a [`Contact`] whose point is used downstream purely for
//! the direction of the impulse.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circle snapshot. Built from its owner's current position every time it
/// is needed, so it never goes stale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        assert!(radius > 0.0, "circle radius must be positive, got {radius}");
        Self { center, radius }
    }
}

/// Result of an overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Contact point (meaningful only on hit)
    pub point: Vec2,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
        }
    }

    fn at(point: Vec2) -> Self {
        Self { hit: true, point }
    }
}

/// Convex polygon with counter-clockwise (positive signed area) winding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolygon {
    vertices: Vec<Vec2>,
}

impl ConvexPolygon {
    /// Build a polygon, normalizing winding so edge normals have a fixed sign.
    ///
    /// Panics on fewer than three vertices or zero area.
    pub fn new(mut vertices: Vec<Vec2>) -> Self {
        assert!(
            vertices.len() >= 3,
            "polygon needs at least 3 vertices, got {}",
            vertices.len()
        );
        let area = signed_area(&vertices);
        assert!(area.abs() > f32::EPSILON, "degenerate polygon (zero area)");
        if area < 0.0 {
            vertices.reverse();
        }
        Self { vertices }
    }

    /// Polygon whose vertices are already normalized (used by transforms
    /// that preserve orientation)
    pub(crate) fn from_wound(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Edges as (start, end) pairs, closing back to the first vertex
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// True if `point` lies inside or on the boundary
    pub fn contains(&self, point: Vec2) -> bool {
        self.edges()
            .all(|(a, b)| (b - a).perp_dot(point - a) >= 0.0)
    }

    /// Closest point on the boundary to `point`, with its distance
    pub fn nearest_boundary_point(&self, point: Vec2) -> (Vec2, f32) {
        let mut best = self.vertices[0];
        let mut best_dist = f32::INFINITY;
        for (a, b) in self.edges() {
            let candidate = closest_point_on_segment(point, a, b);
            let dist = candidate.distance(point);
            if dist < best_dist {
                best = candidate;
                best_dist = dist;
            }
        }
        (best, best_dist)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        assert!(min.x < max.x && min.y < max.y, "rectangle min must be below max");
        Self { min, max }
    }

    /// Overlap iff the clamped nearest point is within the radius
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        let nearest = circle.center.clamp(self.min, self.max);
        nearest.distance_squared(circle.center) < circle.radius * circle.radius
    }
}

fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let edge = b - a;
    let len_sq = edge.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    // Projection parameter clamped to the segment; outside it the nearest
    // vertex wins
    let t = ((point - a).dot(edge) / len_sq).clamp(0.0, 1.0);
    a + edge * t
}

/// Circle-circle overlap. The contact point sits on the line between the
/// centers, `a.radius` away from `a`'s center.
pub fn circle_intersects_circle(a: &Circle, b: &Circle) -> Contact {
    let offset = b.center - a.center;
    let dist_sq = offset.length_squared();
    let reach = a.radius + b.radius;
    if dist_sq >= reach * reach {
        return Contact::miss();
    }

    // Concentric circles have no defined axis; the center is the best we have
    let point = match offset.try_normalize() {
        Some(dir) => a.center + dir * a.radius,
        None => a.center,
    };
    Contact::at(point)
}

/// Circle-convex-polygon overlap. The contact point is the nearest point on
/// the polygon boundary to the circle center.
pub fn circle_intersects_polygon(circle: &Circle, polygon: &ConvexPolygon) -> Contact {
    let (nearest, dist) = polygon.nearest_boundary_point(circle.center);
    if dist < circle.radius || polygon.contains(circle.center) {
        Contact::at(nearest)
    } else {
        Contact::miss()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_square() -> ConvexPolygon {
        ConvexPolygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ])
    }

    #[test]
    fn test_circle_circle_contact_point() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 5.0);
        let b = Circle::new(Vec2::new(8.0, 0.0), 5.0);

        let contact = circle_intersects_circle(&a, &b);
        assert!(contact.hit);
        assert!((contact.point - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_circle_circle_touching_is_miss() {
        let a = Circle::new(Vec2::ZERO, 5.0);
        let b = Circle::new(Vec2::new(10.0, 0.0), 5.0);
        assert!(!circle_intersects_circle(&a, &b).hit);
    }

    #[test]
    #[should_panic]
    fn test_zero_radius_rejected() {
        let _ = Circle::new(Vec2::ZERO, 0.0);
    }

    #[test]
    #[should_panic]
    fn test_degenerate_polygon_rejected() {
        let _ = ConvexPolygon::new(vec![Vec2::ZERO, Vec2::X, Vec2::X * 2.0]);
    }

    #[test]
    fn test_winding_is_normalized() {
        let clockwise = ConvexPolygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
        ]);
        assert!(signed_area(clockwise.vertices()) > 0.0);
        assert!(clockwise.contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_circle_polygon_edge_hit() {
        let square = unit_square();
        let circle = Circle::new(Vec2::new(5.0, -2.0), 3.0);

        let contact = circle_intersects_polygon(&circle, &square);
        assert!(contact.hit);
        assert!((contact.point - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_circle_polygon_vertex_region() {
        let square = unit_square();
        // Diagonal from the corner: distance sqrt(2)*2 ≈ 2.83
        let near = Circle::new(Vec2::new(-2.0, -2.0), 3.0);
        let far = Circle::new(Vec2::new(-2.0, -2.0), 2.5);

        let contact = circle_intersects_polygon(&near, &square);
        assert!(contact.hit);
        assert!(contact.point.length() < 1e-5);
        assert!(!circle_intersects_polygon(&far, &square).hit);
    }

    #[test]
    fn test_circle_center_inside_polygon() {
        let square = unit_square();
        let circle = Circle::new(Vec2::new(5.0, 4.0), 1.0);

        let contact = circle_intersects_polygon(&circle, &square);
        assert!(contact.hit);
        assert!((contact.point - Vec2::new(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_rect_circle() {
        let rect = Rect::new(Vec2::new(100.0, 920.0), Vec2::new(900.0, 1000.0));
        assert!(rect.intersects_circle(&Circle::new(Vec2::new(500.0, 905.0), 20.0)));
        assert!(!rect.intersects_circle(&Circle::new(Vec2::new(500.0, 899.0), 20.0)));
        // Corner region uses true distance, not the bounding box
        assert!(!rect.intersects_circle(&Circle::new(Vec2::new(85.0, 905.0), 20.0)));
    }

    proptest! {
        #[test]
        fn circle_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ar in 0.1f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, br in 0.1f32..100.0,
        ) {
            let a = Circle::new(Vec2::new(ax, ay), ar);
            let b = Circle::new(Vec2::new(bx, by), br);
            prop_assert_eq!(
                circle_intersects_circle(&a, &b).hit,
                circle_intersects_circle(&b, &a).hit
            );
        }

        #[test]
        fn polygon_contact_lies_on_boundary(x in -20.0f32..30.0, y in -20.0f32..30.0) {
            let square = unit_square();
            let circle = Circle::new(Vec2::new(x, y), 4.0);
            let contact = circle_intersects_polygon(&circle, &square);
            if contact.hit {
                let p = contact.point;
                let on_x_edge = (p.x.abs() < 1e-3 || (p.x - 10.0).abs() < 1e-3) && (-1e-3..=10.001).contains(&p.y);
                let on_y_edge = (p.y.abs() < 1e-3 || (p.y - 10.0).abs() < 1e-3) && (-1e-3..=10.001).contains(&p.x);
                prop_assert!(on_x_edge || on_y_edge);
            }
        }
    }
}
