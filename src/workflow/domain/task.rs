//! Task entity and the values used to create and change it.

use super::{TaskId, TaskStatus, WorkflowDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated input for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    tool_recommendations: Option<String>,
    rule_recommendations: Option<String>,
}

impl TaskDraft {
    /// Creates a draft with the required text fields.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyTaskTitle`] or
    /// [`WorkflowDomainError::EmptyTaskDescription`] when either value is
    /// blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, WorkflowDomainError> {
        let title_text = title.into();
        let description_text = description.into();
        if title_text.trim().is_empty() {
            return Err(WorkflowDomainError::EmptyTaskTitle);
        }
        if description_text.trim().is_empty() {
            return Err(WorkflowDomainError::EmptyTaskDescription);
        }
        Ok(Self {
            title: title_text,
            description: description_text,
            tool_recommendations: None,
            rule_recommendations: None,
        })
    }

    /// Sets advisory tool recommendations.
    #[must_use]
    pub fn with_tool_recommendations(mut self, value: impl Into<String>) -> Self {
        self.tool_recommendations = Some(value.into());
        self
    }

    /// Sets advisory rule recommendations.
    #[must_use]
    pub fn with_rule_recommendations(mut self, value: impl Into<String>) -> Self {
        self.rule_recommendations = Some(value.into());
        self
    }

    /// Returns the draft title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the draft description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Field changes requested for an existing task.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Requested status.
    pub status: Option<TaskStatus>,
    /// Replacement completion details.
    pub completed_details: Option<String>,
    /// Replacement tool recommendations.
    pub tool_recommendations: Option<String>,
    /// Replacement rule recommendations.
    pub rule_recommendations: Option<String>,
}

impl TaskChanges {
    /// Returns `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.completed_details.is_none()
            && self.tool_recommendations.is_none()
            && self.rule_recommendations.is_none()
    }
}

/// Result of approving a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// The task moved from unapproved to approved.
    Approved,
    /// The task was already approved; nothing changed.
    AlreadyApproved,
}

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    #[serde(default)]
    approved: bool,
    #[serde(default)]
    completed_details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_recommendations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rule_recommendations: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a `not started`, unapproved task from a draft.
    #[must_use]
    pub fn new(id: TaskId, draft: TaskDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            title: draft.title,
            description: draft.description,
            status: TaskStatus::NotStarted,
            approved: false,
            completed_details: String::new(),
            tool_recommendations: draft.tool_recommendations,
            rule_recommendations: draft.rule_recommendations,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns whether the current completion has been approved.
    #[must_use]
    pub const fn approved(&self) -> bool {
        self.approved
    }

    /// Returns the completion details, empty when none were given.
    #[must_use]
    pub fn completed_details(&self) -> &str {
        &self.completed_details
    }

    /// Returns the tool recommendations, if any.
    #[must_use]
    pub fn tool_recommendations(&self) -> Option<&str> {
        self.tool_recommendations.as_deref()
    }

    /// Returns the rule recommendations, if any.
    #[must_use]
    pub fn rule_recommendations(&self) -> Option<&str> {
        self.rule_recommendations.as_deref()
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

    /// Returns `true` when the task is done and its completion approved.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.status.is_done() && self.approved
    }

    /// Applies a set of field changes as one step.
    ///
    /// Every rule is checked before any field is written, so a rejected
    /// change leaves the task untouched. Leaving `done` clears the approval,
    /// and so does rewriting the details of a `done` task. Entering `done`
    /// approves the task immediately when `auto_approve` is set, which also
    /// keeps a rewritten `done` task approved.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::InvalidStatusTransition`] for a status
    /// change outside the transition table,
    /// [`WorkflowDomainError::MissingCompletedDetails`] when the task would
    /// be `done` without details, and the empty-field variants for blank
    /// titles or descriptions.
    pub fn apply_changes(
        &mut self,
        changes: &TaskChanges,
        auto_approve: bool,
        clock: &impl Clock,
    ) -> Result<(), WorkflowDomainError> {
        if changes.title.as_deref().is_some_and(is_blank) {
            return Err(WorkflowDomainError::EmptyTaskTitle);
        }
        if changes.description.as_deref().is_some_and(is_blank) {
            return Err(WorkflowDomainError::EmptyTaskDescription);
        }

        let next_status = self.checked_status_change(changes.status)?;
        let supplied_details = changes
            .completed_details
            .as_deref()
            .is_some_and(|details| !is_blank(details));
        if next_status == Some(TaskStatus::Done) && !supplied_details {
            return Err(WorkflowDomainError::MissingCompletedDetails(self.id.clone()));
        }
        let resulting_status = next_status.unwrap_or(self.status);
        let resulting_details = changes
            .completed_details
            .as_deref()
            .unwrap_or(&self.completed_details);
        if resulting_status.is_done() && is_blank(resulting_details) {
            return Err(WorkflowDomainError::MissingCompletedDetails(self.id.clone()));
        }

        let details_changed = changes
            .completed_details
            .as_ref()
            .is_some_and(|details| *details != self.completed_details);

        if let Some(title) = &changes.title {
            title.clone_into(&mut self.title);
        }
        if let Some(description) = &changes.description {
            description.clone_into(&mut self.description);
        }
        if let Some(details) = &changes.completed_details {
            details.clone_into(&mut self.completed_details);
        }
        if let Some(tools) = &changes.tool_recommendations {
            self.tool_recommendations = Some(tools.clone());
        }
        if let Some(rules) = &changes.rule_recommendations {
            self.rule_recommendations = Some(rules.clone());
        }
        match next_status {
            Some(status) => {
                if self.status.is_done() {
                    self.approved = false;
                }
                self.status = status;
                if status.is_done() && auto_approve {
                    self.approved = true;
                }
            }
            None if details_changed && self.status.is_done() => self.approved = auto_approve,
            None => {}
        }
        self.touch(clock);
        Ok(())
    }

    /// Marks the current completion as approved.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::NotApprovable`] unless the task is
    /// `done`.
    pub fn approve(&mut self, clock: &impl Clock) -> Result<ApprovalOutcome, WorkflowDomainError> {
        if !self.status.is_done() {
            return Err(WorkflowDomainError::NotApprovable {
                task_id: self.id.clone(),
                status: self.status,
            });
        }
        if self.approved {
            return Ok(ApprovalOutcome::AlreadyApproved);
        }
        self.approved = true;
        self.touch(clock);
        Ok(ApprovalOutcome::Approved)
    }

    /// Resolves a requested status into the status to store, if it differs.
    fn checked_status_change(
        &self,
        requested: Option<TaskStatus>,
    ) -> Result<Option<TaskStatus>, WorkflowDomainError> {
        match requested {
            Some(target) if target == self.status => Ok(None),
            Some(target) if self.status.can_transition_to(target) => Ok(Some(target)),
            Some(target) => Err(WorkflowDomainError::InvalidStatusTransition {
                task_id: self.id.clone(),
                from: self.status,
                to: target,
            }),
            None => Ok(None),
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
