//! In-memory project store for tests and embedding.

use std::sync::{Arc, PoisonError, RwLock};

use crate::workflow::{
    domain::ProjectCollection,
    ports::{ProjectStore, StoreError, StoreResult, check_next_version},
};

/// Thread-safe in-memory project store.
///
/// Clones share the same underlying snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    state: Arc<RwLock<ProjectCollection>>,
}

impl InMemoryProjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with an existing collection.
    #[must_use]
    pub fn with_collection(collection: ProjectCollection) -> Self {
        Self {
            state: Arc::new(RwLock::new(collection)),
        }
    }
}

fn poisoned<T>(err: &PoisonError<T>) -> StoreError {
    StoreError::io(std::io::Error::other(err.to_string()))
}

impl ProjectStore for InMemoryProjectStore {
    fn load(&self) -> StoreResult<ProjectCollection> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state.clone())
    }

    fn save(&self, collection: &ProjectCollection) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        if *state == *collection {
            return Ok(());
        }
        check_next_version(state.version(), collection.version())?;
        collection.check_invariants()?;
        *state = collection.clone();
        Ok(())
    }
}
