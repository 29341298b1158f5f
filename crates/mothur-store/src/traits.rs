use std::path::PathBuf;

use mothur_core::CurrentState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no saved state at {}", .0.display())]
    Missing(PathBuf),
    #[error("read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
}

impl StoreError {
    /// First use rather than a broken file.
    pub fn is_missing(&self) -> bool {
        matches!(self, StoreError::Missing(_))
    }
}

pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<CurrentState, StoreError>;

    /// Overwrites whatever was saved before.
    fn save(&self, state: &CurrentState) -> Result<(), StoreError>;

    /// Human-readable location, for notices.
    fn describe(&self) -> String;
}
