use std::path::{Path, PathBuf};

use mothur_core::CurrentState;
use tracing::debug;

use crate::traits::{StateStore, StoreError};

pub const DEFAULT_STATE_FILE: &str = "mothur_current.json";

/// `{"current": {...}, "dirs": {...}}` on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    pub path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_STATE_FILE))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<CurrentState, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::Missing(self.path.clone()));
        }
        let bytes = std::fs::read(&self.path).map_err(|source| StoreError::Read { path: self.path.clone(), source })?;
        let state: CurrentState =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), files = state.files.len(), dirs = state.dirs.len(), "loaded state");
        Ok(state)
    }

    fn save(&self, state: &CurrentState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let bytes = serde_json::to_vec_pretty(state).map_err(StoreError::Serialize)?;
        std::fs::write(&self.path, bytes).map_err(|source| StoreError::Write { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), "saved state");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
