use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use sumfun_core::Score;

/// Receives the final score of every finished game.
pub trait ScoreSink: Send {
    fn record(&mut self, score: Score);
}

impl<T: ScoreSink> ScoreSink for Arc<Mutex<T>> {
    fn record(&mut self, score: Score) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(score);
    }
}

/// Bounded leaderboard, best score first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    limit: usize,
    entries: Vec<Score>,
}

impl HighScores {
    pub const DEFAULT_LIMIT: usize = 10;

    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            entries: Vec::with_capacity(limit),
        }
    }

    pub fn entries(&self) -> &[Score] {
        &self.entries
    }

    pub fn best(&self) -> Option<Score> {
        self.entries.first().copied()
    }

    pub fn qualifies(&self, score: Score) -> bool {
        self.entries.len() < self.limit || self.entries.last().is_some_and(|&last| score > last)
    }

    /// Inserts `score` and returns its zero-based rank, or `None` if it did not make the board.
    pub fn insert(&mut self, score: Score) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        // ties keep the earlier entry ahead
        let rank = self.entries.partition_point(|&existing| existing >= score);
        self.entries.insert(rank, score);
        self.entries.truncate(self.limit);
        Some(rank)
    }
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

impl ScoreSink for HighScores {
    fn record(&mut self, score: Score) {
        match self.insert(score) {
            Some(rank) => log::info!("Score {score} entered the high scores at #{}", rank + 1),
            None => log::debug!("Score {score} did not make the high scores"),
        }
    }
}
