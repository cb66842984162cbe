//! Application services for workflow orchestration.
//!
//! [`operations`] holds the pure snapshot-to-snapshot functions;
//! [`WorkflowService`] runs them against a [`crate::workflow::ports::ProjectStore`].

pub mod operations;
pub mod responses;
mod workflow;

pub use responses::{
    AddedTasks, ApprovedTask, CreatedProject, DeletedProject, DeletedTask, FinalizedProject,
    NextTask, ProjectList, ProjectSummary,
};
pub use workflow::{WorkflowError, WorkflowErrorKind, WorkflowResult, WorkflowService};
