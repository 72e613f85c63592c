//! Leaderboard of finished rounds
//!
//! Lives inside [`Settings`](crate::Settings) so the host persists it with
//! everything else. Keeps the ten best scores.

use serde::{Deserialize, Serialize};

use crate::consts::STEPS_PER_SECOND;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighEntry {
    /// Final score
    pub score: u64,
    /// Steps survived before the ranking ran out
    pub steps: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Best rounds, highest score first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighEntry>,
}

impl HighEntry {
    /// Time survived in seconds
    pub fn seconds(&self) -> f64 {
        self.steps as f64 / STEPS_PER_SECOND
    }
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a round with `score` would take. Ties rank below existing
    /// entries; zero never places.
    fn placement(&self, score: u64) -> Option<usize> {
        let index = self.entries.partition_point(|e| e.score >= score);
        (score > 0 && index < MAX_HIGH_SCORES).then_some(index)
    }

    pub fn qualifies(&self, score: u64) -> bool {
        self.placement(score).is_some()
    }

    /// Record a finished round. Returns its 1-based rank if it made the table.
    pub fn add_score(&mut self, score: u64, steps: u64, timestamp: f64) -> Option<usize> {
        let index = self.placement(score)?;
        self.entries.insert(
            index,
            HighEntry {
                score,
                steps,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("High score {score} ranked #{}", index + 1);
        Some(index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Best of the table and `score`, for the game-over screen
    pub fn best(&self, score: u64) -> u64 {
        self.top_score().map_or(score, |top| top.max(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 100, 0.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_descending_with_ranks() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(50, 10, 0.0), Some(1));
        assert_eq!(scores.add_score(80, 10, 0.0), Some(1));
        assert_eq!(scores.add_score(60, 10, 0.0), Some(2));
        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![80, 60, 50]);
    }

    #[test]
    fn test_table_is_capped() {
        let mut scores = HighScores::new();
        for s in 1..=15 {
            scores.add_score(s * 10, s, 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(150));
        assert!(!scores.qualifies(10));
        assert!(scores.qualifies(70));
    }

    #[test]
    fn test_tie_ranks_below_existing() {
        let mut scores = HighScores::new();
        scores.add_score(40, 100, 0.0);
        assert_eq!(scores.add_score(40, 200, 1.0), Some(2));
        assert_eq!(scores.entries[0].steps, 100);
    }

    #[test]
    fn test_entry_seconds() {
        let mut scores = HighScores::new();
        scores.add_score(40, 480, 0.0);
        assert_eq!(scores.entries[0].seconds(), 2.0);
    }

    #[test]
    fn test_best_includes_current_round() {
        let mut scores = HighScores::new();
        assert_eq!(scores.best(30), 30);
        scores.add_score(90, 1, 0.0);
        assert_eq!(scores.best(30), 90);
    }
}
