use std::sync::Mutex;

use mothur_core::CurrentState;

use crate::traits::{StateStore, StoreError};

/// Non-durable store for tests and sessions with persistence turned off.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<CurrentState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: CurrentState) -> Self {
        Self { inner: Mutex::new(Some(state)) }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<CurrentState, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.clone().ok_or_else(|| StoreError::Missing("<memory>".into()))
    }

    fn save(&self, state: &CurrentState) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *inner = Some(state.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
