//! Round state and core simulation types
//!
//! The [`Simulation`] owns every entity: live items sit in a `Vec` kept in
//! ascending id order, and the single [`Agent`] lives alongside them. Nothing
//! outside holds a reference into either; the render/UI layer reads a
//! [`RoundSnapshot`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::collision::resolve_item_contact;
use super::geometry::{Circle, Rect, circle_intersects_circle};
use super::rules::{RoundRules, StandardRules};
use super::vector::VectorOps;
use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::{AgentSettings, Settings};

/// Item classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemCode {
    /// Good content (a 200); should land in the target zone
    Positive,
    /// Broken content (a 404); should be knocked away
    Negative,
}

impl ItemCode {
    /// HTTP-style label shown on the item
    pub fn label(&self) -> u16 {
        match self {
            ItemCode::Positive => 200,
            ItemCode::Negative => 404,
        }
    }
}

/// A falling item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub code: ItemCode,
}

impl Item {
    pub fn new(id: u32, pos: Vec2, code: ItemCode) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            code,
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, ITEM_RADIUS)
    }

    /// Move by one step, then fall a little faster (up to terminal speed)
    pub fn integrate(&mut self) {
        self.pos.add_vec(self.vel);
        self.vel.y = (self.vel.y + GRAVITY).min(TERMINAL_VELOCITY);
    }

    /// Resolve a collision with an item of higher id
    pub fn check_collision(&mut self, other: &mut Item) -> bool {
        let contact = circle_intersects_circle(&self.circle(), &other.circle());
        resolve_item_contact(&mut self.vel, other.pos, &mut other.vel, &contact)
    }

    /// Past the bottom edge of the world
    pub fn below_world(&self) -> bool {
        self.pos.y > WORLD_SIZE + ITEM_RADIUS
    }
}

/// The most recent item removal, for rule-driven UI hooks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovedItem {
    pub item: Item,
    /// Landed in the target zone (rather than falling off the bottom)
    pub hit_target: bool,
    pub step: u64,
}

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundPhase {
    /// Agent responsive, rules running
    Active,
    /// Ranking ran out at `at_step`; items keep falling while the round settles
    Terminated { at_step: u64 },
}

/// Values injected at construction
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// RNG seed for spawn positions and codes
    pub seed: u64,
    pub agent: AgentSettings,
    /// Probability that a spawn is [`ItemCode::Negative`]
    pub negative_chance: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            agent: AgentSettings::default(),
            negative_chance: 0.6,
        }
    }
}

impl SimConfig {
    pub fn from_settings(settings: &Settings, seed: u64) -> Result<Self, ConfigError> {
        let config = Self {
            seed,
            agent: settings.agent.clone(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.agent.validate()?;
        if !(0.0..=1.0).contains(&self.negative_chance) {
            return Err(ConfigError::OutOfRange {
                field: "negative_chance",
                value: self.negative_chance,
            });
        }
        Ok(())
    }
}

/// The deterministic simulation
#[derive(Debug, Clone)]
pub struct Simulation<R: RoundRules = StandardRules> {
    pub(crate) rules: R,
    pub(crate) rng: Pcg32,
    /// Live items (sorted by id)
    pub items: Vec<Item>,
    pub agent: Agent,
    /// Items touching this rectangle are scored
    pub target_zone: Rect,
    pub ranking: f32,
    pub score: u64,
    pub combo: u32,
    pub(crate) combo_expiry: u64,
    pub multiplier: u32,
    pub(crate) multiplier_expiry: u64,
    pub(crate) next_spawn: f64,
    pub(crate) next_decay: f64,
    pub(crate) start_step: u64,
    pub step: u64,
    pub last_removed: Option<RemovedItem>,
    pub phase: RoundPhase,
    next_id: u32,
}

impl Simulation<StandardRules> {
    pub fn new(config: &SimConfig) -> Self {
        let rules = StandardRules {
            negative_chance: config.negative_chance,
        };
        Self::with_rules(config, rules)
    }
}

impl<R: RoundRules> Simulation<R> {
    /// Build a round with custom rules.
    ///
    /// Panics if `config` fails [`SimConfig::validate`]; configs coming from
    /// player settings go through [`SimConfig::from_settings`] first.
    pub fn with_rules(config: &SimConfig, rules: R) -> Self {
        if let Err(e) = config.validate() {
            panic!("invalid simulation config: {e}");
        }
        let zone_min = Vec2::new((WORLD_SIZE - ZONE_WIDTH) / 2.0, WORLD_SIZE - ZONE_HEIGHT);
        let zone_max = Vec2::new((WORLD_SIZE + ZONE_WIDTH) / 2.0, WORLD_SIZE);
        let mut sim = Self {
            rules,
            rng: Pcg32::seed_from_u64(config.seed),
            items: Vec::new(),
            agent: Agent::new(&config.agent),
            target_zone: Rect::new(zone_min, zone_max),
            ranking: MAX_RANKING,
            score: 0,
            combo: 0,
            combo_expiry: 0,
            multiplier: 1,
            multiplier_expiry: 0,
            next_spawn: 0.0,
            next_decay: 0.0,
            start_step: 0,
            step: 0,
            last_removed: None,
            phase: RoundPhase::Active,
            next_id: 1,
        };
        sim.initialize(0);
        sim
    }

    /// Reset the step counter to `start_step`, schedule the first spawn and
    /// decay tick, and park the agent at its start position
    pub fn initialize(&mut self, start_step: u64) {
        self.step = start_step;
        self.start_step = start_step;
        self.next_spawn = start_step as f64 + self.rules.first_spawn_delay();
        self.next_decay = start_step as f64 + DECAY_INTERVAL;
        self.agent.pos = Vec2::new(WORLD_SIZE / 2.0, AGENT_START_Y);
        self.agent.vel = Vec2::ZERO;
        self.agent.refresh_geometry();
        self.score = 0;
        self.multiplier = 1;
        self.multiplier_expiry = start_step + MULTIPLIER_WINDOW;
        log::info!("Round initialized at step {start_step}");
    }

    /// Allocate a new item id
    pub fn next_item_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an item at `pos`. Ids only grow, so pushing keeps the order.
    pub fn spawn_item(&mut self, pos: Vec2, vel: Vec2, code: ItemCode) -> u32 {
        let id = self.next_item_id();
        let mut item = Item::new(id, pos, code);
        item.vel = vel;
        self.items.push(item);
        id
    }

    pub fn set_pointer(&mut self, fraction: f32) {
        self.agent.set_pointer(fraction);
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, RoundPhase::Terminated { .. })
    }

    /// Terminated and the settle delay has elapsed
    pub fn is_over(&self) -> bool {
        match self.phase {
            RoundPhase::Active => false,
            RoundPhase::Terminated { at_step } => self.step >= at_step + SETTLE_STEPS,
        }
    }

    /// Run `steps` fixed steps back to back
    pub fn advance(&mut self, steps: u32) {
        for _ in 0..steps {
            self.advance_one_step();
        }
    }

    /// Read-only view for the render/UI layer
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            step: self.step,
            phase: self.phase,
            over: self.is_over(),
            ranking: self.ranking,
            score: self.score,
            combo: self.combo,
            multiplier: self.multiplier,
            items: self.items.clone(),
            agent: AgentSnapshot {
                pos: self.agent.pos,
                vel: self.agent.vel,
                head: self.agent.head(),
                polygons: self.agent.world_polygons(),
                disabled: self.agent.disabled,
            },
            last_removed: self.last_removed.clone(),
        }
    }
}

/// Agent portion of a [`RoundSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub head: Circle,
    /// World-space body polygons
    pub polygons: Vec<Vec<Vec2>>,
    pub disabled: bool,
}

/// Everything the render/UI layer may look at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub step: u64,
    pub phase: RoundPhase,
    pub over: bool,
    pub ranking: f32,
    pub score: u64,
    pub combo: u32,
    pub multiplier: u32,
    pub items: Vec<Item>,
    pub agent: AgentSnapshot,
    pub last_removed: Option<RemovedItem>,
}
