//! Browser LocalStorage backend (wasm32 only)

use super::BestScoreStore;
use crate::error::StoreError;

/// Best score kept in `window.localStorage`
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flap_sim_best_score";

    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage".to_string()))
    }
}

impl BestScoreStore for LocalStorageStore {
    fn load_best_score(&mut self) -> Result<u64, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Ok(serde_json::from_str(&json)?),
            Ok(None) => Ok(0),
            Err(_) => Err(StoreError::Unavailable("LocalStorage read".to_string())),
        }
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&score)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable("LocalStorage write".to_string()))?;
        log::info!("Best score saved ({})", score);
        Ok(())
    }
}
