//! Error types for workflow domain rules and parsing.

use super::{BlockingTask, ProjectId, TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned when a domain rule rejects an operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// The initial prompt is empty after trimming.
    #[error("initialPrompt must not be empty")]
    EmptyInitialPrompt,

    /// A project must be created with at least one task.
    #[error("at least one task is required")]
    EmptyTaskList,

    /// A task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// A task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyTaskDescription,

    /// No project carries the identifier.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The project exists but holds no task with the identifier.
    #[error("task {task_id} not found in project {project_id}")]
    TaskNotFound {
        /// Project that was searched.
        project_id: ProjectId,
        /// Missing task identifier.
        task_id: TaskId,
    },

    /// A project with the same identifier is already stored.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The requested status change is not an edge of the transition table.
    #[error("invalid status transition for task {task_id}: '{from}' -> '{to}'")]
    InvalidStatusTransition {
        /// Task whose status was to change.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// A task would be `done` without completion details.
    #[error("completedDetails is required when status is 'done' (task {0})")]
    MissingCompletedDetails(TaskId),

    /// Approval was requested for a task that is not `done`.
    #[error("task {task_id} cannot be approved while its status is '{status}'")]
    NotApprovable {
        /// Task that was to be approved.
        task_id: TaskId,
        /// Current status of the task.
        status: TaskStatus,
    },

    /// Finalization was requested while some tasks are unfinished.
    #[error(
        "project {project_id} cannot be finalized; blocking tasks: {}",
        format_blocking(.blocking)
    )]
    IncompleteProject {
        /// Project that was to be finalized.
        project_id: ProjectId,
        /// Tasks that are not both done and approved, in project order.
        blocking: Vec<BlockingTask>,
    },

    /// The project is finalized and no longer accepts task changes.
    #[error("project {0} is finalized and can no longer be modified")]
    ProjectFinalized(ProjectId),

    /// A loaded collection breaks a structural invariant.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The collection version counter cannot advance any further.
    #[error("collection version {0} cannot be advanced")]
    VersionOverflow(u64),
}

fn format_blocking(blocking: &[BlockingTask]) -> String {
    blocking
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error returned while parsing a task status string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
