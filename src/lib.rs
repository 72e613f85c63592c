//! Rank Bot - catch the good links, bat the broken ones away
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, round rules)
//! - `tutorial`: Alternate rule set that walks a new player through the round
//! - `settings`: Persisted player preferences injected at construction
//! - `highscores`: End-of-round leaderboard
//! - `web`: Browser binding for the render/input layer (wasm32 only)

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tutorial;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::ConfigError;
pub use highscores::HighScores;
pub use settings::{AgentSettings, Settings};

/// Game configuration constants
///
/// Speeds are in world units per step, accelerations in world units per step².
pub mod consts {
    /// Fixed simulation rate
    pub const STEPS_PER_SECOND: f64 = 240.0;
    /// Longest frame gap the clock will ever convert into steps
    pub const MAX_FRAME_DELTA_MS: f64 = 500.0;

    /// One world unit per second, expressed per step
    pub const SPEED_UNIT: f32 = 1.0 / 240.0;
    /// One world unit per second², expressed per step²
    pub const ACCELERATION_UNIT: f32 = SPEED_UNIT / 240.0;
    pub const GRAVITY: f32 = 1000.0 * ACCELERATION_UNIT;
    pub const TERMINAL_VELOCITY: f32 = 5000.0 * SPEED_UNIT;

    /// Square play field, y grows downward
    pub const WORLD_SIZE: f32 = 1000.0;
    pub const ITEM_RADIUS: f32 = WORLD_SIZE / 50.0;

    /// Target zone (the search engine) hugging the bottom edge
    pub const ZONE_WIDTH: f32 = 0.8 * WORLD_SIZE;
    pub const ZONE_HEIGHT: f32 = 0.08 * WORLD_SIZE;

    /// Agent defaults
    pub const AGENT_ACCELERATION: f32 = GRAVITY * 10.0;
    pub const AGENT_START_Y: f32 = WORLD_SIZE * 0.83;
    pub const HEAD_RADIUS: f32 = 50.0;
    pub const HEAD_OFFSET_Y: f32 = 30.0;

    /// Velocity gain applied on every resolved contact (super-elastic on purpose)
    pub const RESTITUTION: f32 = 1.1;

    /// Ranking and score
    pub const MAX_RANKING: f32 = 100.0;
    pub const POSITIVE_RANKING_GAIN: f32 = 10.0;
    pub const NEGATIVE_RANKING_PENALTY: f32 = 3.0;
    pub const BASE_SCORE: u64 = 10;

    /// Rule timings in steps
    pub const FIRST_SPAWN_DELAY: f64 = 2.0 * STEPS_PER_SECOND;
    pub const INITIAL_SPAWN_INTERVAL: f64 = 2.0 * STEPS_PER_SECOND;
    pub const FINAL_SPAWN_INTERVAL: f64 = 0.5 * STEPS_PER_SECOND;
    pub const SPAWN_RAMP_STEPS: f64 = 60.0 * STEPS_PER_SECOND;
    pub const STORM_SPAWN_INTERVAL: f64 = 0.02 * STEPS_PER_SECOND;
    pub const DECAY_INTERVAL: f64 = 0.2 * STEPS_PER_SECOND;
    pub const DECAY_RAMP_STEPS: f64 = 120.0 * STEPS_PER_SECOND;
    pub const COMBO_WINDOW: u64 = 3 * 240;
    pub const MULTIPLIER_WINDOW: u64 = 10 * 240;
    pub const SETTLE_STEPS: u64 = 600; // 2.5s
}

/// Sign of `value`, with zero mapped to zero (unlike `f32::signum`)
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Clamp `value` into `[min, max]`
#[inline]
pub fn between(min: f64, max: f64, value: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(3.5), 1.0);
        assert_eq!(sign(-0.1), -1.0);
    }

    #[test]
    fn between_clamps_both_ends() {
        assert_eq!(between(0.0, 1.0, 1.5), 1.0);
        assert_eq!(between(0.0, 1.0, -2.0), 0.0);
        assert_eq!(between(0.0, 1.0, 0.25), 0.25);
    }
}
