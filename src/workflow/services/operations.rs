//! Workflow operations as pure functions over a collection snapshot.
//!
//! Write operations clone the snapshot, change the clone and hand it back
//! with their outcome. The input snapshot is never touched, so a rejected
//! operation leaves nothing half-applied.

use mockable::Clock;

use super::responses::{
    AddedTasks, ApprovedTask, CreatedProject, DeletedProject, DeletedTask, FinalizedProject,
    NextTask, ProjectList, ProjectSummary,
};
use crate::workflow::{
    actions::TaskRef,
    domain::{
        ApprovalOutcome, FinalizeOutcome, Project, ProjectCollection, ProjectDraft, ProjectFilter,
        ProjectId, Task, TaskChanges, TaskDraft, WorkflowDomainError,
    },
};

/// Result type for workflow operations.
pub type OperationResult<T> = Result<T, WorkflowDomainError>;

/// A changed collection paired with the outcome of the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied<T> {
    /// Collection after the operation.
    pub collection: ProjectCollection,
    /// Operation-specific result.
    pub outcome: T,
}

impl<T> Applied<T> {
    const fn new(collection: ProjectCollection, outcome: T) -> Self {
        Self {
            collection,
            outcome,
        }
    }
}

/// Creates a project with its first tasks and appends it.
///
/// # Errors
///
/// Returns [`WorkflowDomainError::DuplicateProject`] if the generated
/// identifier collides, which [`ProjectCollection::fresh_project_id`]
/// rules out in practice.
pub fn create_project(
    snapshot: &ProjectCollection,
    draft: ProjectDraft,
    clock: &impl Clock,
) -> OperationResult<Applied<CreatedProject>> {
    let mut collection = snapshot.clone();
    let project = Project::new(collection.fresh_project_id(), draft, clock);
    let outcome = CreatedProject {
        project_id: project.id().clone(),
        task_ids: project
            .tasks()
            .iter()
            .map(|task| task.id().clone())
            .collect(),
        task_count: project.tasks().len(),
    };
    collection.insert(project)?;
    Ok(Applied::new(collection, outcome))
}

/// Appends tasks to an existing project.
///
/// # Errors
///
/// Returns [`WorkflowDomainError::ProjectNotFound`],
/// [`WorkflowDomainError::ProjectFinalized`] or
/// [`WorkflowDomainError::EmptyTaskList`].
pub fn add_tasks(
    snapshot: &ProjectCollection,
    project_id: &ProjectId,
    drafts: Vec<TaskDraft>,
    clock: &impl Clock,
) -> OperationResult<Applied<AddedTasks>> {
    let mut collection = snapshot.clone();
    let task_ids = collection
        .project_mut(project_id)?
        .add_tasks(drafts, clock)?;
    let outcome = AddedTasks {
        project_id: project_id.clone(),
        task_ids,
    };
    Ok(Applied::new(collection, outcome))
}

/// Returns a copy of one task.
///
/// # Errors
///
/// Returns [`WorkflowDomainError::ProjectNotFound`] or
/// [`WorkflowDomainError::TaskNotFound`].
pub fn read_task(snapshot: &ProjectCollection, target: &TaskRef) -> OperationResult<Task> {
    snapshot
        .project(&target.project_id)?
        .task(&target.task_id)
        .cloned()
}

/// Applies field changes to one task and returns the updated task.
///
/// # Errors
///
/// Returns a not-found error for an unknown project or task,
/// [`WorkflowDomainError::ProjectFinalized`] for a finalized project, and
/// [`WorkflowDomainError::InvalidStatusTransition`] or
/// [`WorkflowDomainError::MissingCompletedDetails`] when the change breaks
/// a task rule.
pub fn update_task(
    snapshot: &ProjectCollection,
    target: &TaskRef,
    changes: &TaskChanges,
    clock: &impl Clock,
) -> OperationResult<Applied<Task>> {
    let mut collection = snapshot.clone();
    let task = collection
        .project_mut(&target.project_id)?
        .update_task(&target.task_id, changes, clock)?
        .clone();
    Ok(Applied::new(collection, task))
}

/// Approves one `done` task. Approving twice is accepted.
///
/// # Errors
///
/// Returns a not-found error for an unknown project or task and
/// [`WorkflowDomainError::NotApprovable`] unless the task is `done`.
pub fn approve_task(
    snapshot: &ProjectCollection,
    target: &TaskRef,
    clock: &impl Clock,
) -> OperationResult<Applied<ApprovedTask>> {
    let mut collection = snapshot.clone();
    let project = collection.project_mut(&target.project_id)?;
    let approval = project.approve_task(&target.task_id, clock)?;
    let task = project.task(&target.task_id)?.clone();
    let outcome = ApprovedTask {
        project_id: target.project_id.clone(),
        task,
        already_approved: approval == ApprovalOutcome::AlreadyApproved,
    };
    Ok(Applied::new(collection, outcome))
}

/// Removes one task from its project.
///
/// # Errors
///
/// Returns a not-found error for an unknown project or task and
/// [`WorkflowDomainError::ProjectFinalized`] for a finalized project.
pub fn delete_task(
    snapshot: &ProjectCollection,
    target: &TaskRef,
    clock: &impl Clock,
) -> OperationResult<Applied<DeletedTask>> {
    let mut collection = snapshot.clone();
    let removed = collection
        .project_mut(&target.project_id)?
        .remove_task(&target.task_id, clock)?;
    let outcome = DeletedTask {
        project_id: target.project_id.clone(),
        task_id: removed.id().clone(),
    };
    Ok(Applied::new(collection, outcome))
}

/// Marks a project completed once every task is done and approved.
///
/// # Errors
///
/// Returns [`WorkflowDomainError::ProjectNotFound`] or
/// [`WorkflowDomainError::IncompleteProject`] listing the blocking tasks.
pub fn finalize_project(
    snapshot: &ProjectCollection,
    project_id: &ProjectId,
    clock: &impl Clock,
) -> OperationResult<Applied<FinalizedProject>> {
    let mut collection = snapshot.clone();
    let finalized = collection.project_mut(project_id)?.finalize(clock)?;
    let outcome = FinalizedProject {
        project_id: project_id.clone(),
        already_finalized: finalized == FinalizeOutcome::AlreadyFinalized,
    };
    Ok(Applied::new(collection, outcome))
}

/// Removes a project together with its tasks.
///
/// # Errors
///
/// Returns [`WorkflowDomainError::ProjectNotFound`].
pub fn delete_project(
    snapshot: &ProjectCollection,
    project_id: &ProjectId,
) -> OperationResult<Applied<DeletedProject>> {
    let mut collection = snapshot.clone();
    let removed = collection.remove(project_id)?;
    let outcome = DeletedProject {
        project_id: removed.id().clone(),
        removed_tasks: removed.tasks().len(),
    };
    Ok(Applied::new(collection, outcome))
}

/// Summarizes the projects passing `filter`, in collection order.
#[must_use]
pub fn list_projects(snapshot: &ProjectCollection, filter: ProjectFilter) -> ProjectList {
    ProjectList {
        projects: snapshot
            .filtered(filter)
            .map(ProjectSummary::from)
            .collect(),
    }
}

/// Returns a copy of one project with all its tasks.
///
/// # Errors
///
/// Returns [`WorkflowDomainError::ProjectNotFound`].
pub fn read_project(
    snapshot: &ProjectCollection,
    project_id: &ProjectId,
) -> OperationResult<Project> {
    snapshot.project(project_id).cloned()
}

/// Reports the first unfinished task or what the project is waiting on.
///
/// # Errors
///
/// Returns [`WorkflowDomainError::ProjectNotFound`].
pub fn next_task(
    snapshot: &ProjectCollection,
    project_id: &ProjectId,
) -> OperationResult<NextTask> {
    snapshot.project(project_id).map(NextTask::for_project)
}
