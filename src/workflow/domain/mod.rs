//! Domain model for projects, tasks and their workflow rules.
//!
//! Everything here is pure: no I/O, no global state. Timestamps come from an
//! injected [`mockable::Clock`].

mod collection;
mod error;
mod ids;
mod project;
mod status;
mod task;

pub use collection::{ProjectCollection, ProjectFilter};
pub use error::{ParseTaskStatusError, WorkflowDomainError};
pub use ids::{ProjectId, TaskId};
pub use project::{BlockingTask, FinalizeOutcome, Project, ProjectDraft, TaskCounts};
pub use status::TaskStatus;
pub use task::{ApprovalOutcome, Task, TaskChanges, TaskDraft};
