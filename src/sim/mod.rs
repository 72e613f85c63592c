//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by item ID)
//! - No rendering or platform dependencies

pub mod agent;
pub mod clock;
pub mod collision;
pub mod geometry;
pub mod rules;
pub mod state;
pub mod tick;
pub mod transform;
pub mod vector;

pub use agent::{Agent, AgentDimensions};
pub use clock::{FrameClock, STEP_MS, StepBudget, step_budget};
pub use collision::{collision_impulse, resolve_agent_contact, resolve_item_contact};
pub use geometry::{
    Circle, Contact, ConvexPolygon, Rect, circle_intersects_circle, circle_intersects_polygon,
};
pub use rules::{RoundRules, RoundSummary, StandardRules, random_code};
pub use state::{
    AgentSnapshot, Item, ItemCode, RemovedItem, RoundPhase, RoundSnapshot, SimConfig, Simulation,
};
pub use transform::SkewedPolygon;
pub use vector::VectorOps;
