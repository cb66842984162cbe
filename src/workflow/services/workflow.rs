//! Service layer running workflow operations against a project store.

use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{
    operations::{self, Applied, OperationResult},
    responses::{
        AddedTasks, ApprovedTask, CreatedProject, DeletedProject, DeletedTask, FinalizedProject,
        NextTask, ProjectList,
    },
};
use crate::workflow::{
    actions::{TaskRef, ValidationError},
    domain::{
        Project, ProjectCollection, ProjectDraft, ProjectFilter, ProjectId, Task, TaskChanges,
        TaskDraft, WorkflowDomainError,
    },
    ports::{ProjectStore, StoreError},
};

/// Service-level errors for workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The tool call failed schema or field validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A workflow rule rejected the operation.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),
    /// The store failed to load or save the collection.
    #[error(transparent)]
    Storage(#[from] StoreError),
    /// A result could not be encoded for the caller.
    #[error("failed to encode result: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Stable error category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowErrorKind {
    /// Malformed or incomplete input.
    ValidationError,
    /// Unknown project or task.
    NotFound,
    /// Status change outside the transition table.
    InvalidTransition,
    /// Approval of a task that is not done.
    NotApprovable,
    /// Finalization with unfinished tasks.
    IncompleteProject,
    /// Change to a finalized project.
    ProjectFinalized,
    /// Load or save failure.
    StorageError,
    /// Broken internal state or encoding failure.
    InternalError,
}

impl WorkflowErrorKind {
    /// Returns the wire name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::NotFound => "not_found",
            Self::InvalidTransition => "invalid_transition",
            Self::NotApprovable => "not_approvable",
            Self::IncompleteProject => "incomplete_project",
            Self::ProjectFinalized => "project_finalized",
            Self::StorageError => "storage_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl std::fmt::Display for WorkflowErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WorkflowError {
    /// Returns the category reported to callers.
    #[must_use]
    pub const fn kind(&self) -> WorkflowErrorKind {
        match self {
            Self::Validation(_) => WorkflowErrorKind::ValidationError,
            Self::Domain(err) => domain_kind(err),
            Self::Storage(_) => WorkflowErrorKind::StorageError,
            Self::Encoding(_) => WorkflowErrorKind::InternalError,
        }
    }
}

const fn domain_kind(err: &WorkflowDomainError) -> WorkflowErrorKind {
    match err {
        WorkflowDomainError::EmptyInitialPrompt
        | WorkflowDomainError::EmptyTaskList
        | WorkflowDomainError::EmptyTaskTitle
        | WorkflowDomainError::EmptyTaskDescription
        | WorkflowDomainError::MissingCompletedDetails(_) => WorkflowErrorKind::ValidationError,
        WorkflowDomainError::ProjectNotFound(_) | WorkflowDomainError::TaskNotFound { .. } => {
            WorkflowErrorKind::NotFound
        }
        WorkflowDomainError::InvalidStatusTransition { .. } => {
            WorkflowErrorKind::InvalidTransition
        }
        WorkflowDomainError::NotApprovable { .. } => WorkflowErrorKind::NotApprovable,
        WorkflowDomainError::IncompleteProject { .. } => WorkflowErrorKind::IncompleteProject,
        WorkflowDomainError::ProjectFinalized(_) => WorkflowErrorKind::ProjectFinalized,
        WorkflowDomainError::DuplicateProject(_)
        | WorkflowDomainError::InvariantViolation(_)
        | WorkflowDomainError::VersionOverflow(_) => WorkflowErrorKind::InternalError,
    }
}

/// Result type for workflow service operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Workflow orchestration service.
///
/// Every call is one load, transform, save cycle. Writes advance the
/// collection version by one before saving; a change that leaves the
/// collection identical is not saved.
#[derive(Clone)]
pub struct WorkflowService<S, C>
where
    S: ProjectStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> WorkflowService<S, C>
where
    S: ProjectStore,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a project with its first tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Storage`] when the collection cannot be
    /// loaded or saved.
    pub fn create_project(&self, draft: ProjectDraft) -> WorkflowResult<CreatedProject> {
        self.commit("project.create", |snapshot, clock| {
            operations::create_project(snapshot, draft, clock)
        })
    }

    /// Appends tasks to a project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] for an unknown or finalized
    /// project, or [`WorkflowError::Storage`] on store failure.
    pub fn add_tasks(
        &self,
        project_id: &ProjectId,
        drafts: Vec<TaskDraft>,
    ) -> WorkflowResult<AddedTasks> {
        self.commit("project.add_tasks", |snapshot, clock| {
            operations::add_tasks(snapshot, project_id, drafts, clock)
        })
    }

    /// Reads one task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] when the project or task is
    /// unknown, or [`WorkflowError::Storage`] on load failure.
    pub fn read_task(&self, target: &TaskRef) -> WorkflowResult<Task> {
        self.query("task.read", |snapshot| {
            operations::read_task(snapshot, target)
        })
    }

    /// Changes fields of one task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] when a task rule rejects the
    /// change, or [`WorkflowError::Storage`] on store failure.
    pub fn update_task(&self, target: &TaskRef, changes: &TaskChanges) -> WorkflowResult<Task> {
        self.commit("task.update", |snapshot, clock| {
            operations::update_task(snapshot, target, changes, clock)
        })
    }

    /// Approves one done task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] when the task is unknown or not
    /// done, or [`WorkflowError::Storage`] on store failure.
    pub fn approve_task(&self, target: &TaskRef) -> WorkflowResult<ApprovedTask> {
        self.commit("task.approve", |snapshot, clock| {
            operations::approve_task(snapshot, target, clock)
        })
    }

    /// Deletes one task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] when the task is unknown or the
    /// project is finalized, or [`WorkflowError::Storage`] on store failure.
    pub fn delete_task(&self, target: &TaskRef) -> WorkflowResult<DeletedTask> {
        self.commit("task.delete", |snapshot, clock| {
            operations::delete_task(snapshot, target, clock)
        })
    }

    /// Finalizes a project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] when tasks are still blocking, or
    /// [`WorkflowError::Storage`] on store failure.
    pub fn finalize_project(&self, project_id: &ProjectId) -> WorkflowResult<FinalizedProject> {
        self.commit("project.finalize", |snapshot, clock| {
            operations::finalize_project(snapshot, project_id, clock)
        })
    }

    /// Deletes a project and its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] for an unknown project, or
    /// [`WorkflowError::Storage`] on store failure.
    pub fn delete_project(&self, project_id: &ProjectId) -> WorkflowResult<DeletedProject> {
        self.commit("project.delete", |snapshot, _| {
            operations::delete_project(snapshot, project_id)
        })
    }

    /// Lists project summaries passing `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Storage`] on load failure.
    pub fn list_projects(&self, filter: ProjectFilter) -> WorkflowResult<ProjectList> {
        self.query("project.list", |snapshot| {
            Ok(operations::list_projects(snapshot, filter))
        })
    }

    /// Reads one project with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] for an unknown project, or
    /// [`WorkflowError::Storage`] on load failure.
    pub fn read_project(&self, project_id: &ProjectId) -> WorkflowResult<Project> {
        self.query("project.read", |snapshot| {
            operations::read_project(snapshot, project_id)
        })
    }

    /// Reports the next task to work on.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Domain`] for an unknown project, or
    /// [`WorkflowError::Storage`] on load failure.
    pub fn next_task(&self, project_id: &ProjectId) -> WorkflowResult<NextTask> {
        self.query("project.next_task", |snapshot| {
            operations::next_task(snapshot, project_id)
        })
    }

    fn commit<T>(
        &self,
        action: &'static str,
        apply: impl FnOnce(&ProjectCollection, &C) -> OperationResult<Applied<T>>,
    ) -> WorkflowResult<T> {
        let result = self.load().and_then(|snapshot| {
            let Applied {
                mut collection,
                outcome,
            } = apply(&snapshot, &*self.clock)?;
            if collection == snapshot {
                debug!(action, "no change to save");
                return Ok(outcome);
            }
            collection.advance_version()?;
            self.store.save(&collection)?;
            info!(action, version = collection.version(), "saved workflow change");
            Ok(outcome)
        });
        result.inspect_err(|err| warn!(action, kind = %err.kind(), error = %err, "rejected"))
    }

    fn query<T>(
        &self,
        action: &'static str,
        read: impl FnOnce(&ProjectCollection) -> OperationResult<T>,
    ) -> WorkflowResult<T> {
        let result = self.load().and_then(|snapshot| {
            let value = read(&snapshot)?;
            debug!(action, version = snapshot.version(), "served read");
            Ok(value)
        });
        result.inspect_err(|err| warn!(action, kind = %err.kind(), error = %err, "rejected"))
    }

    fn load(&self) -> WorkflowResult<ProjectCollection> {
        Ok(self.store.load()?)
    }
}
