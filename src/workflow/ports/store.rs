//! Persistence port for the project collection.

use crate::workflow::domain::{ProjectCollection, WorkflowDomainError};
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Load/save contract for the whole project collection.
///
/// Both calls are all-or-nothing. Saving a snapshot identical to the stored
/// collection is a no-op. Any other `save` must carry a version exactly one
/// past the version currently stored, and is rejected with
/// [`StoreError::Conflict`] otherwise.
pub trait ProjectStore: Send + Sync {
    /// Loads the current collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the backing store is unreadable and
    /// [`StoreError::Malformed`] when its content is not a valid collection.
    fn load(&self) -> StoreResult<ProjectCollection>;

    /// Replaces the stored collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the stored version moved on
    /// since the snapshot was loaded, and [`StoreError::Io`] on write
    /// failure.
    fn save(&self, collection: &ProjectCollection) -> StoreResult<()>;
}

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(Arc<dyn std::error::Error + Send + Sync>),

    /// The stored content does not form a valid collection.
    #[error("stored collection is malformed: {0}")]
    Malformed(String),

    /// The snapshot is stale: another writer saved in between.
    #[error("stale write rejected: stored version is {stored}, snapshot version is {attempted}")]
    Conflict {
        /// Version currently stored.
        stored: u64,
        /// Version carried by the rejected snapshot.
        attempted: u64,
    },
}

impl StoreError {
    /// Wraps an I/O-level error.
    pub fn io(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Io(Arc::new(err))
    }

    /// Creates a malformed-content error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

impl From<WorkflowDomainError> for StoreError {
    fn from(err: WorkflowDomainError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Checks the optimistic version rule shared by store adapters.
///
/// # Errors
///
/// Returns [`StoreError::Conflict`] unless `attempted == stored + 1`.
pub fn check_next_version(stored: u64, attempted: u64) -> StoreResult<()> {
    if stored.checked_add(1) == Some(attempted) {
        Ok(())
    } else {
        Err(StoreError::Conflict { stored, attempted })
    }
}
