//! Pluggable round rules
//!
//! The state machine calls these hooks at fixed points in a step. Swapping
//! the implementation (see `tutorial::TutorialRules`) changes the pacing of
//! a round without touching physics or the state invariants.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::ItemCode;
use crate::between;
use crate::consts::*;

/// Final numbers handed to [`RoundRules::on_round_end`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    pub score: u64,
    /// Step at which the ranking ran out
    pub step: u64,
    /// Steps survived since `initialize`
    pub steps_survived: u64,
}

/// Rule hooks consulted by the simulation. `elapsed` is the number of
/// steps since the round was initialized.
pub trait RoundRules {
    /// Steps between `initialize` and the first spawn
    fn first_spawn_delay(&self) -> f64 {
        FIRST_SPAWN_DELAY
    }

    /// Classification for a newly spawned item
    fn spawn_code(&mut self, elapsed: u64, rng: &mut Pcg32) -> ItemCode;

    /// New ranking after one decay tick (clamping happens afterwards)
    fn decay_ranking(&mut self, elapsed: u64, ranking: f32) -> f32;

    /// Steps until the next spawn while the round is active
    fn next_spawn_interval(&mut self, elapsed: u64) -> f64;

    /// Called once, on the step the round terminates
    fn on_round_end(&mut self, summary: &RoundSummary);
}

/// Weighted coin flip shared by every rule set
pub fn random_code(rng: &mut Pcg32, negative_chance: f32) -> ItemCode {
    if rng.random::<f32>() < negative_chance {
        ItemCode::Negative
    } else {
        ItemCode::Positive
    }
}

/// Default rules: spawns speed up over the first minute and ranking decay
/// ramps up over the first two.
#[derive(Debug, Clone)]
pub struct StandardRules {
    pub negative_chance: f32,
}

impl Default for StandardRules {
    fn default() -> Self {
        Self {
            negative_chance: 0.6,
        }
    }
}

impl RoundRules for StandardRules {
    fn spawn_code(&mut self, _elapsed: u64, rng: &mut Pcg32) -> ItemCode {
        random_code(rng, self.negative_chance)
    }

    fn decay_ranking(&mut self, elapsed: u64, ranking: f32) -> f32 {
        let progress = between(0.0, 1.0, elapsed as f64 / DECAY_RAMP_STEPS);
        ranking - (0.5 + 2.0 * progress) as f32
    }

    fn next_spawn_interval(&mut self, elapsed: u64) -> f64 {
        let progress = between(0.0, 1.0, elapsed as f64 / SPAWN_RAMP_STEPS);
        INITIAL_SPAWN_INTERVAL + (FINAL_SPAWN_INTERVAL - INITIAL_SPAWN_INTERVAL) * progress
    }

    fn on_round_end(&mut self, summary: &RoundSummary) {
        log::info!(
            "Round over: score {} after {} steps",
            summary.score,
            summary.steps_survived
        );
    }
}
