//! The player-controlled agent
//!
//! An open cup built from three convex polygons (two leaning walls and a
//! floor) sitting on a round head. The agent has infinite mass: items bounce
//! off it, it never bounces off items.

use glam::Vec2;
use serde::Serialize;

use super::collision::resolve_agent_contact;
use super::geometry::{Circle, ConvexPolygon, circle_intersects_circle, circle_intersects_polygon};
use super::state::Item;
use super::transform::SkewedPolygon;
use super::vector::VectorOps;
use crate::consts::*;
use crate::settings::AgentSettings;
use crate::sign;

#[derive(Debug, Clone)]
pub struct Agent {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Overall body width (world units)
    pub width: f32,
    /// Overall body height (world units)
    pub height: f32,
    /// Floor first, then left and right walls
    pub polygons: Vec<SkewedPolygon>,
    /// Head center relative to `pos`
    pub head_offset: Vec2,
    /// Set once the ranking runs out; never cleared
    pub disabled: bool,
    /// Normalized pointer position across the play field, 0..=1
    pointer: f32,
}

/// Body dimensions derived from the shape factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentDimensions {
    pub width: f32,
    pub skew: f32,
    pub thickness: f32,
    pub height: f32,
}

impl AgentDimensions {
    pub fn from_settings(settings: &AgentSettings) -> Self {
        let width = 80.0 + 350.0 * settings.width;
        let skew = width * (0.1 + 0.3 * settings.skew);
        let thickness = width * (0.1 + 0.2 * settings.thickness);
        let height = thickness + 10.0 + 90.0 * settings.height;
        Self {
            width,
            skew,
            thickness,
            height,
        }
    }
}

impl Agent {
    pub fn new(settings: &AgentSettings) -> Self {
        let AgentDimensions {
            width,
            skew,
            thickness,
            height,
        } = AgentDimensions::from_settings(settings);
        let half = width / 2.0;

        let left = [
            Vec2::new(-half + skew, 0.0),
            Vec2::new(-half, -height),
            Vec2::new(-half + thickness, -height),
            Vec2::new(-half + thickness + skew, 0.0),
        ];
        let right = left.map(|v| Vec2::new(-v.x, v.y));
        let inset = skew * (1.0 - thickness / height);
        let floor = [
            left[0],
            Vec2::new(-half + inset, -thickness),
            Vec2::new(half - inset, -thickness),
            right[0],
        ];

        let polygons = [floor, left, right]
            .into_iter()
            .map(|points| SkewedPolygon::new(ConvexPolygon::new(points.to_vec())))
            .collect();

        let mut agent = Self {
            pos: Vec2::new(WORLD_SIZE / 2.0, AGENT_START_Y),
            vel: Vec2::ZERO,
            width,
            height,
            polygons,
            head_offset: Vec2::new(0.0, HEAD_OFFSET_Y),
            disabled: false,
            pointer: 0.5,
        };
        agent.refresh_geometry();
        agent
    }

    pub fn head(&self) -> Circle {
        Circle::new(self.pos + self.head_offset, HEAD_RADIUS)
    }

    pub fn pointer(&self) -> f32 {
        self.pointer
    }

    /// Accept a pointer update unless the agent is disabled
    pub fn set_pointer(&mut self, fraction: f32) {
        if self.disabled || fraction.is_nan() {
            return;
        }
        self.pointer = fraction.clamp(0.0, 1.0);
    }

    /// Pointer mapped into world x, keeping the whole body inside the field
    pub fn target_x(&self) -> f32 {
        self.width / 2.0 + (WORLD_SIZE - self.width) * self.pointer
    }

    /// Lean for the current horizontal speed
    pub fn lean(&self) -> f32 {
        -(self.vel.x * std::f32::consts::PI * 0.00001) / SPEED_UNIT
    }

    /// Move by one step's velocity
    pub fn integrate(&mut self) {
        self.pos.add_vec(self.vel);
    }

    /// Refresh world geometry for this step, then run the control law
    pub fn step(&mut self) {
        self.refresh_geometry();
        self.steer();
    }

    /// Lean and place every body polygon for the current position and
    /// velocity. Anything that moves the agent outside `step` must call this.
    pub fn refresh_geometry(&mut self) {
        let lean = self.lean();
        for polygon in &mut self.polygons {
            polygon.direction = lean;
            polygon.pre_step(self.pos);
        }
    }

    /// Bang-bang pursuit of the pointer target: accelerate toward it, and
    /// once the projected stopping point passes it, brake.
    fn steer(&mut self) {
        let moving = sign(self.vel.x);
        let target = self.target_x();
        let wanted = sign(target - self.pos.x);

        if wanted != moving {
            self.vel.x += AGENT_ACCELERATION * wanted;
            return;
        }

        let time_to_stop = (self.vel.x / AGENT_ACCELERATION).abs();
        let stop_x = self.pos.x + self.vel.x * time_to_stop
            - moving * AGENT_ACCELERATION * time_to_stop * time_to_stop / 2.0;

        if sign(target - stop_x) == moving {
            self.vel.x += AGENT_ACCELERATION * moving;
        } else {
            self.vel.x -= AGENT_ACCELERATION * moving;
        }
    }

    /// Test the head and every body polygon against `item`, resolving each
    /// contact as it is found. Returns the number of impulses applied.
    pub fn check_collision(&self, item: &mut Item) -> u32 {
        let mut applied = 0;

        let contact = circle_intersects_circle(&self.head(), &item.circle());
        if resolve_agent_contact(self.vel, item.pos, &mut item.vel, &contact) {
            applied += 1;
        }

        for polygon in &self.polygons {
            let contact = circle_intersects_polygon(&item.circle(), polygon.world());
            if resolve_agent_contact(self.vel, item.pos, &mut item.vel, &contact) {
                applied += 1;
            }
        }

        applied
    }

    /// World-space vertices of every body polygon
    pub fn world_polygons(&self) -> Vec<Vec<Vec2>> {
        self.polygons
            .iter()
            .map(|p| p.world().vertices().to_vec())
            .collect()
    }
}
