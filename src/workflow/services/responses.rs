//! Serializable results returned by workflow operations.

use serde::Serialize;

use crate::workflow::domain::{Project, ProjectId, Task, TaskId};

/// Result of creating a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    /// Identifier of the new project.
    pub project_id: ProjectId,
    /// Identifiers of the new tasks, in order.
    pub task_ids: Vec<TaskId>,
    /// Number of tasks created.
    pub task_count: usize,
}

/// Result of appending tasks to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedTasks {
    /// Project that received the tasks.
    pub project_id: ProjectId,
    /// Identifiers of the appended tasks, in order.
    pub task_ids: Vec<TaskId>,
}

/// Per-project counts shown by the list action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Prompt the project was created from.
    pub initial_prompt: String,
    /// Whether the project is finalized.
    pub completed: bool,
    /// Number of tasks.
    pub total_tasks: usize,
    /// Number of tasks whose status is `done`.
    pub completed_tasks: usize,
    /// Number of approved tasks.
    pub approved_tasks: usize,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        let counts = project.task_counts();
        Self {
            project_id: project.id().clone(),
            initial_prompt: project.initial_prompt().to_owned(),
            completed: project.completed(),
            total_tasks: counts.total,
            completed_tasks: counts.completed,
            approved_tasks: counts.approved,
        }
    }
}

/// Result of the list action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectList {
    /// Matching projects in collection order.
    pub projects: Vec<ProjectSummary>,
}

/// Result of deleting a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProject {
    /// Identifier of the removed project.
    pub project_id: ProjectId,
    /// Number of tasks removed with it.
    pub removed_tasks: usize,
}

/// Result of deleting a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTask {
    /// Owning project.
    pub project_id: ProjectId,
    /// Identifier of the removed task.
    pub task_id: TaskId,
}

/// Result of approving a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedTask {
    /// Owning project.
    pub project_id: ProjectId,
    /// The task after approval.
    pub task: Task,
    /// Whether the task had been approved before this call.
    pub already_approved: bool,
}

/// Result of finalizing a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedProject {
    /// Finalized project.
    pub project_id: ProjectId,
    /// Whether the project had been finalized before this call.
    pub already_finalized: bool,
}

/// Result of the next-task query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "state",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum NextTask {
    /// A task still has work left.
    Pending {
        /// First task, in order, whose status is not `done`.
        task: Task,
    },
    /// Every task is done but some still await approval.
    AwaitingApproval {
        /// Done tasks that are not yet approved, in order.
        task_ids: Vec<TaskId>,
    },
    /// Every task is done and approved; the project can be finalized.
    ReadyToFinalize,
    /// The project is already finalized.
    Finalized,
}

impl NextTask {
    /// Derives the next-task answer for `project`.
    #[must_use]
    pub fn for_project(project: &Project) -> Self {
        if let Some(task) = project.next_task() {
            return Self::Pending { task: task.clone() };
        }
        if project.completed() {
            return Self::Finalized;
        }
        let task_ids: Vec<TaskId> = project
            .tasks()
            .iter()
            .filter(|task| !task.approved())
            .map(|task| task.id().clone())
            .collect();
        if task_ids.is_empty() {
            Self::ReadyToFinalize
        } else {
            Self::AwaitingApproval { task_ids }
        }
    }
}
