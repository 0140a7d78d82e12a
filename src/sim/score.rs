//! Run score, item score and the persisted best score

use crate::persistence::BestScoreStore;

/// Score counters for the current run plus the best score ever reached
#[derive(Debug)]
pub struct ScoreTracker<S> {
    score: u64,
    item_score: u64,
    best_score: u64,
    store: S,
}

impl<S: BestScoreStore> ScoreTracker<S> {
    /// Read the best score once; an unreadable store counts as 0
    pub fn new(mut store: S) -> Self {
        let best_score = match store.load_best_score() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Best score unavailable, starting from 0: {}", e);
                0
            }
        };
        Self {
            score: 0,
            item_score: 0,
            best_score,
            store,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn item_score(&self) -> u64 {
        self.item_score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Count a passed obstacle; returns true if it set a new best
    pub(crate) fn record_pass(&mut self) -> bool {
        self.score += 1;
        if self.score <= self.best_score {
            return false;
        }

        self.best_score = self.score;
        if let Err(e) = self.store.save_best_score(self.best_score) {
            // Best effort: the next record will try again with a newer value
            log::warn!("Failed to persist best score {}: {}", self.best_score, e);
        }
        true
    }

    /// Count a collected item
    pub(crate) fn record_pickup(&mut self) {
        self.item_score += 1;
    }

    /// Zero the run counters; the best score survives
    pub(crate) fn reset_run(&mut self) {
        self.score = 0;
        self.item_score = 0;
    }
}
