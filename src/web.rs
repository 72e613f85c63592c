//! Browser binding
//!
//! The JS side owns rendering, input, popups and LocalStorage. It drives a
//! [`WebGame`] from `requestAnimationFrame`, feeds pointer positions in, and
//! reads the round back as JSON.

use wasm_bindgen::prelude::*;

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::sim::{FrameClock, RoundSnapshot, SimConfig, Simulation};
use crate::tutorial::TutorialRules;

/// Pause between pressing play and the clock producing steps
const START_DELAY_MS: f64 = 1000.0;

fn js_error(err: ConfigError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

enum Round {
    Standard(Simulation),
    Tutorial(Simulation<TutorialRules>),
}

impl Round {
    fn advance(&mut self, steps: u32) {
        match self {
            Round::Standard(sim) => sim.advance(steps),
            Round::Tutorial(sim) => sim.advance(steps),
        }
    }

    fn set_pointer(&mut self, fraction: f32) {
        match self {
            Round::Standard(sim) => sim.set_pointer(fraction),
            Round::Tutorial(sim) => sim.set_pointer(fraction),
        }
    }

    fn snapshot(&self) -> RoundSnapshot {
        match self {
            Round::Standard(sim) => sim.snapshot(),
            Round::Tutorial(sim) => sim.snapshot(),
        }
    }

    fn is_over(&self) -> bool {
        match self {
            Round::Standard(sim) => sim.is_over(),
            Round::Tutorial(sim) => sim.is_over(),
        }
    }

    fn tutorial(&self) -> Option<&Simulation<TutorialRules>> {
        match self {
            Round::Tutorial(sim) => Some(sim),
            Round::Standard(_) => None,
        }
    }
}

/// One round, as seen from JavaScript
#[wasm_bindgen]
pub struct WebGame {
    round: Round,
    clock: FrameClock,
}

#[wasm_bindgen]
impl WebGame {
    /// Build a round from the stored settings JSON. `now_ms` is the
    /// `requestAnimationFrame` timestamp of the frame that started it.
    #[wasm_bindgen(constructor)]
    pub fn new(
        settings_json: &str,
        seed: f64,
        tutorial: bool,
        now_ms: f64,
    ) -> Result<WebGame, JsValue> {
        let settings = Settings::from_json(settings_json).map_err(js_error)?;
        let config = SimConfig::from_settings(&settings, seed as u64).map_err(js_error)?;
        let round = if tutorial {
            Round::Tutorial(Simulation::with_rules(&config, TutorialRules::new()))
        } else {
            Round::Standard(Simulation::new(&config))
        };
        log::info!("Round created (tutorial: {tutorial}, seed: {seed})");
        Ok(Self {
            round,
            clock: FrameClock::new(now_ms + START_DELAY_MS),
        })
    }

    /// Pointer x as a fraction of the world width
    pub fn set_pointer(&mut self, fraction: f32) {
        self.round.set_pointer(fraction);
    }

    /// Run the steps owed for this frame; returns how many ran
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let steps = self.clock.advance(now_ms);
        self.round.advance(steps);
        steps
    }

    /// Restart the clock after a pause without replaying the gap
    pub fn resume(&mut self, now_ms: f64) {
        self.clock.resume(now_ms);
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.round.snapshot())
            .map_err(|e| js_error(ConfigError::Parse(e)))
    }

    pub fn is_over(&self) -> bool {
        self.round.is_over()
    }

    /// Popup text when the tutorial wants to interrupt this frame
    pub fn tutorial_popup(&self) -> Option<String> {
        let sim = self.round.tutorial()?;
        let rules = sim.rules();
        let stage = rules.stage()?;
        rules
            .ready(&sim.snapshot())
            .then(|| stage.message().to_string())
    }

    /// World point the current popup highlights, as `[x, y]`
    pub fn tutorial_focus(&self) -> Option<Vec<f32>> {
        let sim = self.round.tutorial()?;
        let focus = sim.rules().focus(&sim.snapshot())?;
        Some(vec![focus.x, focus.y])
    }

    /// Popup dismissed
    pub fn continue_tutorial(&mut self, now_ms: f64) {
        if let Round::Tutorial(sim) = &mut self.round {
            sim.rules_mut().advance();
        }
        self.clock.resume(now_ms);
    }

    /// Fold the finished round into the settings and return the JSON to
    /// persist
    pub fn record_round(&self, settings_json: &str, timestamp: f64) -> Result<String, JsValue> {
        let mut settings = Settings::from_json(settings_json).map_err(js_error)?;
        let snapshot = self.round.snapshot();
        match &self.round {
            Round::Tutorial(sim) => {
                if sim.rules().completed {
                    settings.played_tutorial = true;
                }
            }
            Round::Standard(_) => {
                settings
                    .high_scores
                    .add_score(snapshot.score, snapshot.step, timestamp);
            }
        }
        settings.to_json().map_err(js_error)
    }

    /// Best score to show on the game-over screen
    pub fn best_score(&self, settings_json: &str) -> Result<f64, JsValue> {
        let settings = Settings::from_json(settings_json).map_err(js_error)?;
        Ok(settings.high_scores.best(self.round.snapshot().score) as f64)
    }
}
