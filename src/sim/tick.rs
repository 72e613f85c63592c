//! Fixed timestep simulation tick
//!
//! One call advances the round by exactly one step. Order within a step:
//! agent, items (scoring/removal then integration), collisions, step counter,
//! spawning, ranking decay, multiplier expiry, termination.

use glam::Vec2;
use rand::Rng;

use super::rules::{RoundRules, RoundSummary};
use super::state::{ItemCode, RemovedItem, RoundPhase, Simulation};
use crate::consts::*;

impl<R: RoundRules> Simulation<R> {
    /// Advance the simulation by one fixed step
    pub fn advance_one_step(&mut self) {
        self.agent.integrate();
        self.agent.step();

        self.update_items();
        self.resolve_collisions();

        self.step += 1;

        self.run_spawner();

        let active = !self.agent.disabled;
        if active && self.next_decay < self.step as f64 {
            self.next_decay += DECAY_INTERVAL;
            let decayed = self.rules.decay_ranking(self.elapsed(), self.ranking);
            self.set_ranking(decayed);
        }

        if self.multiplier_expiry < self.step {
            let combo_live = self.combo_expiry >= self.step;
            self.update_multiplier(if combo_live { self.combo } else { 1 });
        }

        if active && self.ranking <= 0.0 {
            self.terminate();
        }
    }

    /// Score or discard items touching the zone or past the bottom edge,
    /// then integrate the survivors
    fn update_items(&mut self) {
        let zone = self.target_zone;
        let step = self.step;
        let mut removed = Vec::new();

        self.items.retain_mut(|item| {
            if zone.intersects_circle(&item.circle()) {
                removed.push(RemovedItem {
                    item: item.clone(),
                    hit_target: true,
                    step,
                });
                return false;
            }
            if item.below_world() {
                removed.push(RemovedItem {
                    item: item.clone(),
                    hit_target: false,
                    step,
                });
                return false;
            }
            item.integrate();
            true
        });

        for removal in removed {
            self.on_item_removed(removal);
        }
    }

    fn on_item_removed(&mut self, removal: RemovedItem) {
        log::trace!(
            "item {} ({}) removed, hit target: {}",
            removal.item.id,
            removal.item.code.label(),
            removal.hit_target
        );

        if !self.agent.disabled {
            match (removal.item.code, removal.hit_target) {
                (ItemCode::Positive, true) => {
                    self.set_ranking(self.ranking + POSITIVE_RANKING_GAIN);
                    self.score += BASE_SCORE * u64::from(self.multiplier);
                }
                (ItemCode::Negative, true) => {
                    self.set_ranking(self.ranking - NEGATIVE_RANKING_PENALTY);
                }
                (ItemCode::Negative, false) => self.increase_combo(),
                (ItemCode::Positive, false) => {}
            }
        }

        self.last_removed = Some(removal);
    }

    /// Item pairs first (only while the agent is active), then the agent
    /// against every item
    fn resolve_collisions(&mut self) {
        if !self.agent.disabled {
            for i in 0..self.items.len() {
                let (head, tail) = self.items.split_at_mut(i + 1);
                let first = &mut head[i];
                for second in tail.iter_mut() {
                    // Sorted by id, so first.id < second.id always holds
                    debug_assert!(first.id < second.id);
                    first.check_collision(second);
                }
            }
        }

        for item in &mut self.items {
            self.agent.check_collision(item);
        }
    }

    fn run_spawner(&mut self) {
        if self.next_spawn > self.step as f64 {
            return;
        }

        let x = (0.1 + 0.8 * self.rng.random::<f32>()) * WORLD_SIZE;
        let elapsed = self.elapsed();
        let code = self.rules.spawn_code(elapsed, &mut self.rng);

        if self.agent.disabled {
            // Post-round storm: fast cadence, scattered sideways
            let vx = (self.rng.random::<f32>() - 0.5) * 1000.0 * SPEED_UNIT;
            self.spawn_item(Vec2::new(x, -ITEM_RADIUS), Vec2::new(vx, 0.0), code);
            self.next_spawn += STORM_SPAWN_INTERVAL;
        } else {
            self.spawn_item(Vec2::new(x, -ITEM_RADIUS), Vec2::ZERO, code);
            self.next_spawn += self.rules.next_spawn_interval(elapsed);
        }
    }

    /// Steps since `initialize`
    fn elapsed(&self) -> u64 {
        self.step - self.start_step
    }

    fn set_ranking(&mut self, ranking: f32) {
        self.ranking = ranking.clamp(0.0, MAX_RANKING);
    }

    fn increase_combo(&mut self) {
        self.combo = if self.combo_expiry >= self.step {
            self.combo + 1
        } else {
            1
        };
        self.combo_expiry = self.step + COMBO_WINDOW;
        log::debug!("combo {} at step {}", self.combo, self.step);
        self.update_multiplier(self.combo);
    }

    /// Raise immediately; lower only once the current window has lapsed
    fn update_multiplier(&mut self, value: u32) {
        if self.multiplier_expiry >= self.step && value <= self.multiplier {
            return;
        }
        if value != self.multiplier {
            log::debug!("multiplier {} -> {value}", self.multiplier);
        }
        self.multiplier = value;
        self.multiplier_expiry = self.step + MULTIPLIER_WINDOW;
    }

    fn terminate(&mut self) {
        self.agent.disabled = true;
        self.phase = RoundPhase::Terminated { at_step: self.step };
        self.next_spawn = self.step as f64;
        log::info!("Ranking exhausted at step {}, score {}", self.step, self.score);

        let summary = RoundSummary {
            score: self.score,
            step: self.step,
            steps_survived: self.elapsed(),
        };
        self.rules.on_round_end(&summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SimConfig;

    fn fresh() -> Simulation {
        Simulation::new(&SimConfig::default())
    }

    #[test]
    fn test_first_spawn_after_delay() {
        let mut sim = fresh();
        sim.advance(FIRST_SPAWN_DELAY as u32 - 1);
        assert!(sim.items.is_empty());
        sim.advance(1);
        assert_eq!(sim.items.len(), 1);
        let item = &sim.items[0];
        assert_eq!(item.pos.y, -ITEM_RADIUS);
        assert!(item.pos.x >= 0.1 * WORLD_SIZE && item.pos.x <= 0.9 * WORLD_SIZE);
        assert_eq!(item.vel, Vec2::ZERO);
    }

    #[test]
    fn test_ranking_decays_while_active() {
        let mut sim = fresh();
        sim.advance(STEPS_PER_SECOND as u32);
        assert!(sim.ranking < MAX_RANKING);
        assert!(sim.ranking > MAX_RANKING - 5.0);
    }

    #[test]
    fn test_termination_happens_once() {
        let mut sim = fresh();
        sim.ranking = 0.4;
        let mut terminations = 0;
        for _ in 0..200 {
            let was = sim.is_terminated();
            sim.advance_one_step();
            if !was && sim.is_terminated() {
                terminations += 1;
            }
        }
        assert_eq!(terminations, 1);
        assert!(sim.agent.disabled);
        // Decay stops once the round is over, so it stays at the floor
        assert_eq!(sim.ranking, 0.0);
        assert!(!sim.is_over());
    }

    #[test]
    fn test_round_over_after_settle_delay() {
        let mut sim = fresh();
        sim.ranking = 0.1;
        while !sim.is_terminated() {
            sim.advance_one_step();
        }
        let RoundPhase::Terminated { at_step } = sim.phase else {
            panic!("expected terminated phase");
        };
        sim.advance(SETTLE_STEPS as u32 - 1);
        assert!(!sim.is_over());
        sim.advance(1);
        assert!(sim.is_over());
        assert_eq!(sim.step, at_step + SETTLE_STEPS);
    }

    #[test]
    fn test_storm_after_termination() {
        let mut sim = fresh();
        sim.ranking = 0.1;
        while !sim.is_terminated() {
            sim.advance_one_step();
        }
        let before = sim.items.len();
        sim.advance(STEPS_PER_SECOND as u32 / 4);
        // 60 steps at one spawn per 4.8 steps
        assert!(sim.items.len() >= before + 10);
        assert!(sim.items.iter().any(|i| i.vel.x != 0.0));
    }

    #[test]
    fn test_multiplier_holds_then_lapses() {
        let mut sim = fresh();
        sim.combo = 2;
        sim.combo_expiry = sim.step + COMBO_WINDOW;
        sim.update_multiplier(2);
        assert_eq!(sim.multiplier, 2);

        // A lower value inside the window is ignored
        sim.update_multiplier(1);
        assert_eq!(sim.multiplier, 2);

        // No spawns, so no stray diverts can touch the combo
        sim.next_spawn = f64::INFINITY;
        sim.advance(MULTIPLIER_WINDOW as u32 + 1);
        assert_eq!(sim.multiplier, 1);
    }

    #[test]
    fn test_pairs_collide_only_while_active() {
        let mut sim = fresh();
        sim.spawn_item(Vec2::new(300.0, 100.0), Vec2::new(1.0, 0.0), ItemCode::Positive);
        sim.spawn_item(Vec2::new(330.0, 100.0), Vec2::new(-1.0, 0.0), ItemCode::Positive);
        sim.resolve_collisions();
        assert!(sim.items[0].vel.x < 0.0);
        assert!(sim.items[1].vel.x > 0.0);

        let mut sim = fresh();
        sim.agent.disabled = true;
        sim.spawn_item(Vec2::new(300.0, 100.0), Vec2::new(1.0, 0.0), ItemCode::Positive);
        sim.spawn_item(Vec2::new(330.0, 100.0), Vec2::new(-1.0, 0.0), ItemCode::Positive);
        sim.resolve_collisions();
        assert_eq!(sim.items[0].vel.x, 1.0);
        assert_eq!(sim.items[1].vel.x, -1.0);
    }

    #[test]
    fn test_determinism() {
        let config = SimConfig {
            seed: 99_999,
            ..SimConfig::default()
        };
        let mut a = Simulation::new(&config);
        let mut b = Simulation::new(&config);

        let pointers = [0.1, 0.8, 0.5, 0.3];
        for (i, pointer) in pointers.iter().cycle().take(40).enumerate() {
            a.set_pointer(*pointer);
            b.set_pointer(*pointer);
            let steps = 37 + (i as u32 % 5) * 11;
            a.advance(steps);
            b.advance(steps);
        }

        assert_eq!(a.snapshot(), b.snapshot());
        assert!(!a.items.is_empty() || a.last_removed.is_some());
    }
}
