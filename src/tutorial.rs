//! Tutorial rule set
//!
//! A guided round: each stage waits for a condition on the round snapshot,
//! the UI shows its popup, then calls [`TutorialRules::advance`]. While a
//! stage is pending the ranking cannot drop below 20, so the player cannot
//! lose before the tutorial is done.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sim::{ItemCode, RoundRules, RoundSnapshot, RoundSummary, random_code};

/// Items must fall this far before the tutorial points at them
const ITEM_FOCUS_DEPTH: f32 = WORLD_SIZE * 0.2;
/// Ranking floor while a stage is pending
const TUTORIAL_RANKING_FLOOR: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorialStage {
    Intro,
    Agent,
    PositiveItem,
    PositiveScored,
    NegativeItem,
    NegativeDiverted,
    Combo,
    End,
}

impl TutorialStage {
    pub fn next(self) -> Option<Self> {
        use TutorialStage::*;
        match self {
            Intro => Some(Agent),
            Agent => Some(PositiveItem),
            PositiveItem => Some(PositiveScored),
            PositiveScored => Some(NegativeItem),
            NegativeItem => Some(NegativeDiverted),
            NegativeDiverted => Some(Combo),
            Combo => Some(End),
            End => None,
        }
    }

    /// Popup text for the stage
    pub fn message(self) -> &'static str {
        use TutorialStage::*;
        match self {
            Intro => "Welcome to the tutorial! Improve the website's ranking.",
            Agent => "Move the robot with the mouse, or your finger on touch devices.",
            PositiveItem => "200 items are good content. Let them fall on the search engine.",
            PositiveScored => "A 200 on the search engine raises the ranking and earns points.",
            NegativeItem => "404 items must not reach the search engine.",
            NegativeDiverted => "Good job! Knock 404s away quickly to build a combo.",
            Combo => "During a combo every point you earn is multiplied.",
            End => "This is the end of the tutorial.",
        }
    }
}

fn falling_item(snapshot: &RoundSnapshot, code: ItemCode) -> Option<Vec2> {
    snapshot
        .items
        .iter()
        .find(|item| item.code == code && item.pos.y > ITEM_FOCUS_DEPTH)
        .map(|item| item.pos)
}

#[derive(Debug, Clone)]
pub struct TutorialRules {
    stage: Option<TutorialStage>,
    /// Round ended while running these rules
    pub completed: bool,
    /// Used only by the stages that don't force a code
    pub negative_chance: f32,
}

impl Default for TutorialRules {
    fn default() -> Self {
        Self {
            stage: Some(TutorialStage::Intro),
            completed: false,
            negative_chance: 0.4,
        }
    }
}

impl TutorialRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage, `None` once the last popup was dismissed
    pub fn stage(&self) -> Option<TutorialStage> {
        self.stage
    }

    /// Whether the current stage's popup should be shown now
    pub fn ready(&self, snapshot: &RoundSnapshot) -> bool {
        use TutorialStage::*;
        let Some(stage) = self.stage else {
            return false;
        };
        match stage {
            Intro | Agent | End => true,
            PositiveItem => falling_item(snapshot, ItemCode::Positive).is_some(),
            NegativeItem => falling_item(snapshot, ItemCode::Negative).is_some(),
            PositiveScored => snapshot
                .last_removed
                .as_ref()
                .is_some_and(|removed| removed.hit_target),
            NegativeDiverted => snapshot.last_removed.as_ref().is_some_and(|removed| {
                removed.item.code == ItemCode::Negative && !removed.hit_target
            }),
            Combo => snapshot.multiplier >= 2,
        }
    }

    /// World point the popup highlights, if any
    pub fn focus(&self, snapshot: &RoundSnapshot) -> Option<Vec2> {
        use TutorialStage::*;
        match self.stage? {
            Intro | End => None,
            Agent => {
                let agent = &snapshot.agent;
                let top = agent
                    .polygons
                    .iter()
                    .flatten()
                    .map(|v| v.y)
                    .fold(agent.pos.y, f32::min);
                Some(Vec2::new(agent.pos.x, (agent.pos.y + top) / 2.0))
            }
            PositiveItem => falling_item(snapshot, ItemCode::Positive),
            NegativeItem => falling_item(snapshot, ItemCode::Negative),
            PositiveScored | NegativeDiverted => {
                snapshot.last_removed.as_ref().map(|removed| removed.item.pos)
            }
            Combo => Some(Vec2::new(WORLD_SIZE * 0.95, WORLD_SIZE * 0.24)),
        }
    }

    /// Move past the current stage once its popup was dismissed
    pub fn advance(&mut self) {
        if let Some(stage) = self.stage {
            self.stage = stage.next();
            log::debug!("Tutorial stage {:?} -> {:?}", stage, self.stage);
        }
    }
}

impl RoundRules for TutorialRules {
    fn first_spawn_delay(&self) -> f64 {
        5.0 * STEPS_PER_SECOND
    }

    fn spawn_code(&mut self, _elapsed: u64, rng: &mut Pcg32) -> ItemCode {
        use TutorialStage::*;
        match self.stage {
            Some(PositiveItem | PositiveScored) => ItemCode::Positive,
            Some(NegativeItem | NegativeDiverted | Combo | End) => ItemCode::Negative,
            _ => random_code(rng, self.negative_chance),
        }
    }

    fn decay_ranking(&mut self, _elapsed: u64, ranking: f32) -> f32 {
        if self.stage.is_some() {
            (ranking - 1.0).max(TUTORIAL_RANKING_FLOOR)
        } else {
            ranking - 5.0
        }
    }

    fn next_spawn_interval(&mut self, _elapsed: u64) -> f64 {
        match self.stage {
            Some(TutorialStage::Combo | TutorialStage::End) => STEPS_PER_SECOND,
            _ => 5.0 * STEPS_PER_SECOND,
        }
    }

    fn on_round_end(&mut self, summary: &RoundSummary) {
        self.completed = true;
        log::info!("Tutorial finished with score {}", summary.score);
    }
}
