//! Schema validation for incoming tool calls.
//!
//! A tool call arrives as `{ "tool", "params": { "action", "arguments" } }`.
//! [`parse_tool_call`] selects the single matching variant from the closed
//! action set, decodes its arguments strictly (unknown fields are
//! rejected), then runs the field rules in [`rules`]. Nothing here touches
//! the store.

mod error;
pub mod rules;
mod schema;

pub use error::ValidationError;

use crate::workflow::domain::{
    ProjectDraft, ProjectFilter, ProjectId, TaskChanges, TaskDraft, TaskId,
};
use schema::{decode_arguments, decode_envelope};
use serde_json::Value;

/// Reference to one task inside one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    /// Owning project.
    pub project_id: ProjectId,
    /// Task within the project.
    pub task_id: TaskId,
}

/// Validated actions of the `project` tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectAction {
    /// List project summaries.
    List {
        /// State filter, `all` by default.
        filter: ProjectFilter,
    },
    /// Create a project with its first tasks.
    Create(ProjectDraft),
    /// Delete a project and its tasks.
    Delete {
        /// Project to delete.
        project_id: ProjectId,
    },
    /// Append tasks to a project.
    AddTasks {
        /// Project to extend.
        project_id: ProjectId,
        /// Tasks to append, in order.
        tasks: Vec<TaskDraft>,
    },
    /// Mark a project completed.
    Finalize {
        /// Project to finalize.
        project_id: ProjectId,
    },
    /// Read a project with all its tasks.
    Read {
        /// Project to read.
        project_id: ProjectId,
    },
    /// Find the first task that is not done.
    NextTask {
        /// Project to inspect.
        project_id: ProjectId,
    },
}

/// Validated actions of the `task` tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Read one task.
    Read(TaskRef),
    /// Change fields of one task.
    Update {
        /// Task to change.
        target: TaskRef,
        /// Requested changes; never empty.
        changes: TaskChanges,
    },
    /// Delete one task.
    Delete(TaskRef),
    /// Approve the completion of one task.
    Approve(TaskRef),
}

/// A validated tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// An action of the `project` tool.
    Project(ProjectAction),
    /// An action of the `task` tool.
    Task(TaskAction),
}

impl Action {
    /// Returns the `tool.action` name, used for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Project(ProjectAction::List { .. }) => "project.list",
            Self::Project(ProjectAction::Create(_)) => "project.create",
            Self::Project(ProjectAction::Delete { .. }) => "project.delete",
            Self::Project(ProjectAction::AddTasks { .. }) => "project.add_tasks",
            Self::Project(ProjectAction::Finalize { .. }) => "project.finalize",
            Self::Project(ProjectAction::Read { .. }) => "project.read",
            Self::Project(ProjectAction::NextTask { .. }) => "project.next_task",
            Self::Task(TaskAction::Read(_)) => "task.read",
            Self::Task(TaskAction::Update { .. }) => "task.update",
            Self::Task(TaskAction::Delete(_)) => "task.delete",
            Self::Task(TaskAction::Approve(_)) => "task.approve",
        }
    }
}

/// Validates a raw tool call payload.
///
/// # Errors
///
/// Returns [`ValidationError`] describing every violation when the payload
/// is malformed, names an unknown tool or action, or breaks a field rule.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use taskqueue::workflow::actions::{Action, ProjectAction, parse_tool_call};
///
/// let payload = json!({
///     "tool": "project",
///     "params": { "action": "list", "arguments": {} }
/// });
/// let action = parse_tool_call(&payload).expect("valid call");
/// assert!(matches!(action, Action::Project(ProjectAction::List { .. })));
/// ```
pub fn parse_tool_call(payload: &Value) -> Result<Action, ValidationError> {
    let call = decode_envelope(payload)?;
    let arguments = call.params.arguments;
    match (call.tool.as_str(), call.params.action.as_str()) {
        ("project", "list") => {
            rules::refine_list(decode_arguments(arguments)?).map(Action::Project)
        }
        ("project", "create") => {
            rules::refine_create(decode_arguments(arguments)?).map(Action::Project)
        }
        ("project", "delete") => rules::refine_project_ref(decode_arguments(arguments)?)
            .map(|project_id| Action::Project(ProjectAction::Delete { project_id })),
        ("project", "add_tasks") => {
            rules::refine_add_tasks(decode_arguments(arguments)?).map(Action::Project)
        }
        ("project", "finalize") => rules::refine_project_ref(decode_arguments(arguments)?)
            .map(|project_id| Action::Project(ProjectAction::Finalize { project_id })),
        ("project", "read") => rules::refine_project_ref(decode_arguments(arguments)?)
            .map(|project_id| Action::Project(ProjectAction::Read { project_id })),
        ("project", "next_task") => rules::refine_project_ref(decode_arguments(arguments)?)
            .map(|project_id| Action::Project(ProjectAction::NextTask { project_id })),
        ("task", "read") => rules::refine_task_ref(decode_arguments(arguments)?)
            .map(|target| Action::Task(TaskAction::Read(target))),
        ("task", "update") => rules::refine_update(decode_arguments(arguments)?).map(Action::Task),
        ("task", "delete") => rules::refine_task_ref(decode_arguments(arguments)?)
            .map(|target| Action::Task(TaskAction::Delete(target))),
        ("task", "approve") => rules::refine_task_ref(decode_arguments(arguments)?)
            .map(|target| Action::Task(TaskAction::Approve(target))),
        ("project" | "task", action) => Err(ValidationError::UnknownAction {
            tool: call.tool.clone(),
            action: action.to_owned(),
        }),
        (tool, _) => Err(ValidationError::UnknownTool(tool.to_owned())),
    }
}
