//! Best-score persistence
//!
//! The sim only sees the `BestScoreStore` trait. Backends:
//! - `MemoryStore`: in-process key-value map
//! - `JsonFileStore`: JSON object on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Failures are reported to the caller; the score tracker decides how to
//! degrade.

use std::collections::BTreeMap;

use crate::consts::BEST_SCORE_KEY;
use crate::error::StoreError;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Key-value access to the persisted best score
pub trait BestScoreStore {
    fn load_best_score(&mut self) -> Result<u64, StoreError>;
    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError>;
}

/// In-memory store, also counts writes
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, u64>,
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a best score
    pub fn with_best_score(score: u64) -> Self {
        let mut store = Self::new();
        store.values.insert(BEST_SCORE_KEY.to_string(), score);
        store
    }

    /// Number of successful `save_best_score` calls
    pub fn writes(&self) -> u32 {
        self.writes
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best_score(&mut self) -> Result<u64, StoreError> {
        Ok(self.get(BEST_SCORE_KEY).unwrap_or(0))
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.values.insert(BEST_SCORE_KEY.to_string(), score);
        self.writes += 1;
        Ok(())
    }
}

impl<T: BestScoreStore + ?Sized> BestScoreStore for Box<T> {
    fn load_best_score(&mut self) -> Result<u64, StoreError> {
        (**self).load_best_score()
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        (**self).save_best_score(score)
    }
}
