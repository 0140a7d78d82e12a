//! JSON file backend (native only)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::BestScoreStore;
use crate::consts::BEST_SCORE_KEY;
use crate::error::StoreError;

/// Key-value JSON object on disk, e.g. `{"BEST": 12}`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, u64>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl BestScoreStore for JsonFileStore {
    fn load_best_score(&mut self) -> Result<u64, StoreError> {
        Ok(self.read_all()?.get(BEST_SCORE_KEY).copied().unwrap_or(0))
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        // Keep unrelated keys; start over if the file is corrupt
        let mut values = self.read_all().unwrap_or_default();
        values.insert(BEST_SCORE_KEY.to_string(), score);

        // Write to a temp file first so a crash never leaves a torn save
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!("Best score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("flap-sim-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let mut store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.load_best_score().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut store = JsonFileStore::new(&path);
        store.save_best_score(17).unwrap();

        let mut reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load_best_score().unwrap(), 17);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load_best_score(), Err(StoreError::Json(_))));

        // Saving recovers the file
        store.save_best_score(3).unwrap();
        assert_eq!(store.load_best_score().unwrap(), 3);
        let _ = std::fs::remove_file(&path);
    }
}
