//! Project aggregate root and its ordered task list.

use super::{
    ApprovalOutcome, ProjectId, Task, TaskChanges, TaskDraft, TaskId, TaskStatus,
    WorkflowDomainError,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Validated input for a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    initial_prompt: String,
    project_plan: Option<String>,
    auto_approve: bool,
    tasks: Vec<TaskDraft>,
}

impl ProjectDraft {
    /// Creates a draft from the originating prompt and its first tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyInitialPrompt`] for a blank
    /// prompt and [`WorkflowDomainError::EmptyTaskList`] when no task is
    /// given.
    pub fn new(
        initial_prompt: impl Into<String>,
        tasks: Vec<TaskDraft>,
    ) -> Result<Self, WorkflowDomainError> {
        let prompt = initial_prompt.into();
        if prompt.trim().is_empty() {
            return Err(WorkflowDomainError::EmptyInitialPrompt);
        }
        if tasks.is_empty() {
            return Err(WorkflowDomainError::EmptyTaskList);
        }
        Ok(Self {
            initial_prompt: prompt,
            project_plan: None,
            auto_approve: false,
            tasks,
        })
    }

    /// Sets the free-form project plan.
    #[must_use]
    pub fn with_project_plan(mut self, plan: impl Into<String>) -> Self {
        self.project_plan = Some(plan.into());
        self
    }

    /// Sets whether completed tasks are approved without review.
    #[must_use]
    pub const fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }
}

/// A task that prevents finalization, with the state that blocks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockingTask {
    /// Blocking task identifier.
    pub id: TaskId,
    /// Current status.
    pub status: TaskStatus,
    /// Current approval flag.
    pub approved: bool,
}

impl fmt::Display for BlockingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (status: {}, approved: {})",
            self.id, self.status, self.approved
        )
    }
}

/// Task tallies for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    /// Number of tasks.
    pub total: usize,
    /// Number of tasks whose status is `done`.
    pub completed: usize,
    /// Number of approved tasks.
    pub approved: usize,
}

/// Result of finalizing a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The project moved to completed.
    Finalized,
    /// The project was already completed; nothing changed.
    AlreadyFinalized,
}

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Project {
    project_id: ProjectId,
    initial_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project_plan: Option<String>,
    tasks: Vec<Task>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    auto_approve: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project holding fresh tasks for every draft, in order.
    #[must_use]
    pub fn new(project_id: ProjectId, draft: ProjectDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let mut project = Self {
            project_id,
            initial_prompt: draft.initial_prompt,
            project_plan: draft.project_plan,
            tasks: Vec::with_capacity(draft.tasks.len()),
            completed: false,
            auto_approve: draft.auto_approve,
            created_at: timestamp,
            updated_at: timestamp,
        };
        project.push_tasks(draft.tasks, clock);
        project
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the originating prompt.
    #[must_use]
    pub fn initial_prompt(&self) -> &str {
        &self.initial_prompt
    }

    /// Returns the project plan, if any.
    #[must_use]
    pub fn project_plan(&self) -> Option<&str> {
        self.project_plan.as_deref()
    }

    /// Returns the tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns whether the project has been finalized.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Returns whether completed tasks are approved without review.
    #[must_use]
    pub const fn auto_approve(&self) -> bool {
        self.auto_approve
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest change timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Looks up a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::TaskNotFound`] when absent.
    pub fn task(&self, task_id: &TaskId) -> Result<&Task, WorkflowDomainError> {
        self.tasks
            .iter()
            .find(|task| task.id() == task_id)
            .ok_or_else(|| self.task_not_found(task_id))
    }

    /// Returns task tallies.
    #[must_use]
    pub fn task_counts(&self) -> TaskCounts {
        self.tasks
            .iter()
            .fold(TaskCounts::default(), |counts, task| TaskCounts {
                total: counts.total + 1,
                completed: counts.completed + usize::from(task.status().is_done()),
                approved: counts.approved + usize::from(task.approved()),
            })
    }

    /// Returns tasks that are not both done and approved, in order.
    #[must_use]
    pub fn blocking_tasks(&self) -> Vec<BlockingTask> {
        self.tasks
            .iter()
            .filter(|task| !task.is_finished())
            .map(|task| BlockingTask {
                id: task.id().clone(),
                status: task.status(),
                approved: task.approved(),
            })
            .collect()
    }

    /// Returns the first task whose status is not `done`.
    #[must_use]
    pub fn next_task(&self) -> Option<&Task> {
        self.tasks.iter().find(|task| !task.status().is_done())
    }

    /// Returns whether any task is done but still awaiting approval.
    #[must_use]
    pub fn has_pending_approvals(&self) -> bool {
        self.tasks
            .iter()
            .any(|task| task.status().is_done() && !task.approved())
    }

    /// Appends fresh tasks and returns their identifiers in order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::ProjectFinalized`] for a completed
    /// project and [`WorkflowDomainError::EmptyTaskList`] when `drafts` is
    /// empty.
    pub fn add_tasks(
        &mut self,
        drafts: Vec<TaskDraft>,
        clock: &impl Clock,
    ) -> Result<Vec<TaskId>, WorkflowDomainError> {
        self.ensure_open()?;
        if drafts.is_empty() {
            return Err(WorkflowDomainError::EmptyTaskList);
        }
        let ids = self.push_tasks(drafts, clock);
        self.touch(clock);
        Ok(ids)
    }

    /// Applies field changes to one task.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::ProjectFinalized`] for a completed
    /// project, [`WorkflowDomainError::TaskNotFound`] for an unknown task,
    /// or any rule violation from [`Task::apply_changes`].
    pub fn update_task(
        &mut self,
        task_id: &TaskId,
        changes: &TaskChanges,
        clock: &impl Clock,
    ) -> Result<&Task, WorkflowDomainError> {
        self.ensure_open()?;
        let auto_approve = self.auto_approve;
        let index = self.task_index(task_id)?;
        let task = self
            .tasks
            .get_mut(index)
            .ok_or_else(|| WorkflowDomainError::TaskNotFound {
                project_id: self.project_id.clone(),
                task_id: task_id.clone(),
            })?;
        task.apply_changes(changes, auto_approve, clock)?;
        self.updated_at = clock.utc();
        self.task(task_id)
    }

    /// Approves the completion of one task.
    ///
    /// Approving an already approved task changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::TaskNotFound`] for an unknown task and
    /// [`WorkflowDomainError::NotApprovable`] unless the task is `done`.
    pub fn approve_task(
        &mut self,
        task_id: &TaskId,
        clock: &impl Clock,
    ) -> Result<ApprovalOutcome, WorkflowDomainError> {
        let index = self.task_index(task_id)?;
        let task = self
            .tasks
            .get_mut(index)
            .ok_or_else(|| WorkflowDomainError::TaskNotFound {
                project_id: self.project_id.clone(),
                task_id: task_id.clone(),
            })?;
        let outcome = task.approve(clock)?;
        if outcome == ApprovalOutcome::Approved {
            self.touch(clock);
        }
        Ok(outcome)
    }

    /// Removes one task and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::ProjectFinalized`] for a completed
    /// project and [`WorkflowDomainError::TaskNotFound`] for an unknown task.
    pub fn remove_task(
        &mut self,
        task_id: &TaskId,
        clock: &impl Clock,
    ) -> Result<Task, WorkflowDomainError> {
        self.ensure_open()?;
        let index = self.task_index(task_id)?;
        let removed = self.tasks.remove(index);
        self.touch(clock);
        Ok(removed)
    }

    /// Marks the project completed when every task is done and approved.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::IncompleteProject`] listing the
    /// blocking tasks otherwise.
    pub fn finalize(&mut self, clock: &impl Clock) -> Result<FinalizeOutcome, WorkflowDomainError> {
        let blocking = self.blocking_tasks();
        if !blocking.is_empty() {
            return Err(WorkflowDomainError::IncompleteProject {
                project_id: self.project_id.clone(),
                blocking,
            });
        }
        if self.completed {
            return Ok(FinalizeOutcome::AlreadyFinalized);
        }
        self.completed = true;
        self.touch(clock);
        Ok(FinalizeOutcome::Finalized)
    }

    /// Checks the per-project invariants of a loaded project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvariantViolation`] describing the
    /// first broken invariant.
    pub fn check_invariants(&self) -> Result<(), WorkflowDomainError> {
        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id()) {
                return Err(self.violation(format!("duplicate task identifier {}", task.id())));
            }
            if task.approved() && !task.status().is_done() {
                return Err(self.violation(format!(
                    "task {} is approved but its status is '{}'",
                    task.id(),
                    task.status()
                )));
            }
            if task.status().is_done() && task.completed_details().trim().is_empty() {
                return Err(self.violation(format!(
                    "task {} is done without completedDetails",
                    task.id()
                )));
            }
        }
        if self.completed && self.tasks.iter().any(|task| !task.is_finished()) {
            return Err(self.violation("project is completed but has unfinished tasks".to_owned()));
        }
        Ok(())
    }

    fn push_tasks(&mut self, drafts: Vec<TaskDraft>, clock: &impl Clock) -> Vec<TaskId> {
        drafts
            .into_iter()
            .map(|draft| {
                let id = self.fresh_task_id();
                self.tasks.push(Task::new(id.clone(), draft, clock));
                id
            })
            .collect()
    }

    fn fresh_task_id(&self) -> TaskId {
        loop {
            let candidate = TaskId::generate();
            if self.tasks.iter().all(|task| task.id() != &candidate) {
                return candidate;
            }
        }
    }

    fn task_index(&self, task_id: &TaskId) -> Result<usize, WorkflowDomainError> {
        self.tasks
            .iter()
            .position(|task| task.id() == task_id)
            .ok_or_else(|| self.task_not_found(task_id))
    }

    fn task_not_found(&self, task_id: &TaskId) -> WorkflowDomainError {
        WorkflowDomainError::TaskNotFound {
            project_id: self.project_id.clone(),
            task_id: task_id.clone(),
        }
    }

    fn ensure_open(&self) -> Result<(), WorkflowDomainError> {
        if self.completed {
            return Err(WorkflowDomainError::ProjectFinalized(self.project_id.clone()));
        }
        Ok(())
    }

    fn violation(&self, detail: String) -> WorkflowDomainError {
        WorkflowDomainError::InvariantViolation(format!("project {}: {detail}", self.project_id))
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
