//! Fixed-step clock
//!
//! Converts wall-clock frame timestamps into whole simulation steps at
//! [`STEPS_PER_SECOND`](crate::consts::STEPS_PER_SECOND), carrying the
//! sub-step remainder into the next frame. Timestamps are milliseconds as
//! delivered by the host's frame callback.

use crate::consts::{MAX_FRAME_DELTA_MS, STEPS_PER_SECOND};

/// Length of one step in milliseconds
pub const STEP_MS: f64 = 1000.0 / STEPS_PER_SECOND;

/// Outcome of converting one frame gap into steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepBudget {
    /// Whole steps to run this frame
    pub steps: u32,
    /// Usable time after the catch-up clamp (ms)
    pub delta_ms: f64,
    /// Time carried into the next frame (ms), always in `[0, STEP_MS)`
    pub remainder_ms: f64,
}

/// Pure step computation.
///
/// `delta = min(500, current - previous + remainder)`. A gap that runs
/// backwards (host clock reset) runs no steps and carries nothing.
pub fn step_budget(previous_ms: f64, current_ms: f64, remainder_ms: f64) -> StepBudget {
    let delta_ms = (current_ms - previous_ms + remainder_ms).min(MAX_FRAME_DELTA_MS);
    if delta_ms <= 0.0 {
        return StepBudget {
            steps: 0,
            delta_ms: 0.0,
            remainder_ms: 0.0,
        };
    }

    // Multiply before dividing so whole-second gaps stay exact
    let steps = (delta_ms * STEPS_PER_SECOND / 1000.0).trunc() as u32;
    let consumed_ms = f64::from(steps) * 1000.0 / STEPS_PER_SECOND;
    StepBudget {
        steps,
        delta_ms,
        remainder_ms: (delta_ms - consumed_ms).clamp(0.0, STEP_MS),
    }
}

/// Stateful clock driven once per rendered frame
#[derive(Debug, Clone)]
pub struct FrameClock {
    previous_ms: f64,
    remainder_ms: f64,
    /// Frames before this time run no steps (start delay)
    not_before_ms: f64,
}

impl FrameClock {
    /// Start counting from `start_ms`. A start time in the future delays
    /// the first steps until the host clock reaches it.
    pub fn new(start_ms: f64) -> Self {
        Self {
            previous_ms: start_ms,
            remainder_ms: 0.0,
            not_before_ms: start_ms,
        }
    }

    /// Steps owed for a frame rendered at `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        if now_ms <= self.not_before_ms {
            return 0;
        }
        // Started; later timestamps are only compared with each other
        self.not_before_ms = f64::NEG_INFINITY;
        let budget = step_budget(self.previous_ms, now_ms, self.remainder_ms);
        self.previous_ms = now_ms;
        self.remainder_ms = budget.remainder_ms;
        if budget.steps > 0 {
            log::trace!(
                "frame at {now_ms:.2}ms -> {} steps ({:.3}ms carried)",
                budget.steps,
                budget.remainder_ms
            );
        }
        budget.steps
    }

    /// Forget the gap since the last frame (e.g. when resuming from pause)
    pub fn resume(&mut self, now_ms: f64) {
        self.previous_ms = now_ms.max(self.not_before_ms);
        self.remainder_ms = 0.0;
    }

    pub fn remainder_ms(&self) -> f64 {
        self.remainder_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_one_second_gap_is_clamped_to_half() {
        let budget = step_budget(0.0, 1000.0, 0.0);
        assert_eq!(budget.delta_ms, MAX_FRAME_DELTA_MS);
        assert_eq!(budget.steps, 120);
        assert_eq!(budget.remainder_ms, 0.0);
    }

    #[test]
    fn test_gap_under_clamp_converts_exactly() {
        let budget = step_budget(0.0, 400.0, 0.0);
        assert_eq!(budget.steps, 96);
        assert_eq!(budget.remainder_ms, 0.0);
    }

    #[test]
    fn test_short_frame_carries_everything() {
        let budget = step_budget(0.0, 3.0, 0.0);
        assert_eq!(budget.steps, 0);
        assert_eq!(budget.remainder_ms, 3.0);
    }

    #[test]
    fn test_catch_up_is_clamped() {
        let budget = step_budget(0.0, 10_000.0, 0.0);
        assert_eq!(budget.delta_ms, MAX_FRAME_DELTA_MS);
        assert_eq!(budget.steps, 120);
    }

    #[test]
    fn test_backwards_gap_carries_nothing() {
        let budget = step_budget(1000.0, 0.0, 2.0);
        assert_eq!(budget.steps, 0);
        assert_eq!(budget.remainder_ms, 0.0);
    }

    #[test]
    fn test_remainder_accumulates_across_frames() {
        let mut clock = FrameClock::new(0.0);
        assert_eq!(clock.advance(3.0), 0);
        // 3ms carried + 3ms new = 6ms = 1 step (4.1667ms)
        assert_eq!(clock.advance(6.0), 1);
        assert!((clock.remainder_ms() - (6.0 - STEP_MS)).abs() < 1e-9);
    }

    #[test]
    fn test_future_start_delays_steps() {
        let mut clock = FrameClock::new(1000.0);
        assert_eq!(clock.advance(16.0), 0);
        assert_eq!(clock.remainder_ms(), 0.0);
        assert_eq!(clock.advance(500.0), 0);
        assert_eq!(clock.advance(1000.0), 0);
        // Counting starts at the delayed start time, not the first frame
        assert_eq!(clock.advance(1100.0), 24);
    }

    #[test]
    fn test_clock_regression_does_not_freeze() {
        let mut clock = FrameClock::new(0.0);
        clock.advance(16.0);
        assert_eq!(clock.advance(-60_000.0), 0);

        let mut now = -60_000.0;
        let mut idle_frames = 0;
        for _ in 0..100 {
            now += 16.0;
            if clock.advance(now) == 0 {
                idle_frames += 1;
            }
        }
        assert_eq!(idle_frames, 0);
        assert!(clock.remainder_ms() >= 0.0 && clock.remainder_ms() < STEP_MS);
    }

    #[test]
    fn test_resume_skips_gap() {
        let mut clock = FrameClock::new(0.0);
        clock.advance(10.0);
        clock.resume(60_000.0);
        assert_eq!(clock.remainder_ms(), 0.0);
        assert_eq!(clock.advance(60_000.0), 0);
        assert_eq!(clock.advance(60_100.0), 24);
    }

    #[test]
    fn test_resume_keeps_start_delay() {
        let mut clock = FrameClock::new(1000.0);
        clock.resume(200.0);
        assert_eq!(clock.advance(900.0), 0);
        assert_eq!(clock.advance(1100.0), 24);
    }

    proptest! {
        #[test]
        fn steps_plus_remainder_account_for_delta(
            previous in 0.0f64..1.0e6,
            gap in 0.0f64..2000.0,
            carried in 0.0f64..4.0,
        ) {
            let budget = step_budget(previous, previous + gap, carried);
            prop_assert!(budget.delta_ms <= MAX_FRAME_DELTA_MS);
            prop_assert!(budget.steps <= 120);
            prop_assert!(budget.remainder_ms >= 0.0);
            prop_assert!(budget.remainder_ms < STEP_MS + 1e-9);
            let total = f64::from(budget.steps) * STEP_MS + budget.remainder_ms;
            prop_assert!((total - budget.delta_ms).abs() < 1e-6);
        }

        #[test]
        fn remainder_stays_bounded_under_any_timestamps(
            stamps in prop::collection::vec(-1.0e5f64..1.0e5, 1..60),
        ) {
            let mut clock = FrameClock::new(0.0);
            for now in stamps {
                clock.advance(now);
                prop_assert!(clock.remainder_ms() >= 0.0);
                prop_assert!(clock.remainder_ms() < STEP_MS + 1e-9);
            }
        }
    }
}
