//! Field rules applied after structural decoding.
//!
//! Each rule inspects one decoded argument set and either yields the typed
//! action or every violation it found. The cross-field rule for `done`
//! updates lives in [`require_details_for_done`] so it can be exercised on
//! its own.

use super::ValidationError;
use super::schema::{
    RawAddTasksArgs, RawCreateProjectArgs, RawListArgs, RawProjectRef, RawTaskInput, RawTaskRef,
    RawUpdateTaskArgs,
};
use super::{ProjectAction, TaskAction, TaskRef};
use crate::workflow::domain::{
    ProjectDraft, ProjectFilter, ProjectId, TaskChanges, TaskDraft, TaskId, TaskStatus,
};

/// Collects violations while a single argument set is refined.
#[derive(Debug, Default)]
struct Violations(Vec<ValidationError>);

impl Violations {
    fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Returns the value when present and non-blank, recording a violation
    /// otherwise.
    fn required_text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            None => {
                self.push(ValidationError::MissingField(field.to_owned()));
                None
            }
            Some(text) if text.trim().is_empty() => {
                self.push(ValidationError::EmptyField(field.to_owned()));
                None
            }
            Some(text) => Some(text),
        }
    }

    /// Accepts an absent value, but records a violation for a blank one.
    fn optional_text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value {
            Some(text) if text.trim().is_empty() => {
                self.push(ValidationError::EmptyField(field.to_owned()));
                None
            }
            other => other,
        }
    }

    fn finish<T>(self, refined: Option<T>) -> Result<T, ValidationError> {
        match refined {
            Some(value) if self.0.is_empty() => Ok(value),
            _ if self.0.is_empty() => Err(ValidationError::InvalidValue(
                "arguments could not be validated".to_owned(),
            )),
            _ => Err(ValidationError::multiple(self.0)),
        }
    }
}

/// Requires non-empty `completedDetails` whenever `status` is `done`.
///
/// # Errors
///
/// Returns [`ValidationError::MissingCompletedDetails`] when the status is
/// `done` and the details are absent or blank.
pub fn require_details_for_done(
    status: Option<TaskStatus>,
    completed_details: Option<&str>,
) -> Result<(), ValidationError> {
    let has_details = completed_details.is_some_and(|details| !details.trim().is_empty());
    if status == Some(TaskStatus::Done) && !has_details {
        return Err(ValidationError::MissingCompletedDetails);
    }
    Ok(())
}

/// Parses a status string into a [`TaskStatus`].
///
/// # Errors
///
/// Returns [`ValidationError::InvalidStatus`] for an unknown value.
pub fn parse_status(value: &str) -> Result<TaskStatus, ValidationError> {
    TaskStatus::try_from(value).map_err(|_| ValidationError::InvalidStatus(value.to_owned()))
}

/// Parses a list filter string into a [`ProjectFilter`].
///
/// # Errors
///
/// Returns [`ValidationError::InvalidFilter`] for an unknown value.
pub fn parse_filter(value: &str) -> Result<ProjectFilter, ValidationError> {
    match value.trim() {
        "open" => Ok(ProjectFilter::Open),
        "pending_approval" => Ok(ProjectFilter::PendingApproval),
        "completed" => Ok(ProjectFilter::Completed),
        "all" => Ok(ProjectFilter::All),
        _ => Err(ValidationError::InvalidFilter(value.to_owned())),
    }
}

pub(super) fn refine_list(raw: RawListArgs) -> Result<ProjectAction, ValidationError> {
    let filter = raw
        .state
        .as_deref()
        .map(parse_filter)
        .transpose()?
        .unwrap_or_default();
    Ok(ProjectAction::List { filter })
}

pub(super) fn refine_create(raw: RawCreateProjectArgs) -> Result<ProjectAction, ValidationError> {
    let mut violations = Violations::default();
    let initial_prompt = violations.required_text("initialPrompt", raw.initial_prompt);
    let project_plan = raw.project_plan;
    let tasks = refine_task_inputs(&mut violations, raw.tasks);

    let refined = match (initial_prompt, tasks) {
        (Some(prompt), Some(drafts)) if violations.0.is_empty() => {
            let base = ProjectDraft::new(prompt, drafts)
                .map_err(|err| ValidationError::InvalidValue(err.to_string()))?
                .with_auto_approve(raw.auto_approve.unwrap_or(false));
            Some(match project_plan {
                Some(plan) => base.with_project_plan(plan),
                None => base,
            })
        }
        _ => None,
    };
    violations.finish(refined).map(ProjectAction::Create)
}

pub(super) fn refine_add_tasks(raw: RawAddTasksArgs) -> Result<ProjectAction, ValidationError> {
    let mut violations = Violations::default();
    let project = violations.required_text("projectId", raw.project_id);
    let drafts = refine_task_inputs(&mut violations, raw.tasks);
    let action = project
        .zip(drafts)
        .map(|(id, tasks)| ProjectAction::AddTasks {
            project_id: ProjectId::new(id),
            tasks,
        });
    violations.finish(action)
}

pub(super) fn refine_project_ref(raw: RawProjectRef) -> Result<ProjectId, ValidationError> {
    let mut violations = Violations::default();
    let project_id = violations
        .required_text("projectId", raw.project_id)
        .map(ProjectId::new);
    violations.finish(project_id)
}

pub(super) fn refine_task_ref(raw: RawTaskRef) -> Result<TaskRef, ValidationError> {
    let mut violations = Violations::default();
    let project = violations.required_text("projectId", raw.project_id);
    let task = violations.required_text("taskId", raw.task_id);
    violations.finish(task_ref(project, task))
}

pub(super) fn refine_update(raw: RawUpdateTaskArgs) -> Result<TaskAction, ValidationError> {
    let mut violations = Violations::default();
    let project = violations.required_text("projectId", raw.project_id);
    let task = violations.required_text("taskId", raw.task_id);
    let title = violations.optional_text("title", raw.title);
    let description = violations.optional_text("description", raw.description);
    let status = match raw.status.as_deref().map(parse_status).transpose() {
        Ok(parsed) => parsed,
        Err(err) => {
            violations.push(err);
            None
        }
    };
    if let Err(err) = require_details_for_done(status, raw.completed_details.as_deref()) {
        violations.push(err);
    }

    let changes = TaskChanges {
        title,
        description,
        status,
        completed_details: raw.completed_details,
        tool_recommendations: raw.tool_recommendations,
        rule_recommendations: raw.rule_recommendations,
    };
    if changes.is_empty() && violations.0.is_empty() {
        violations.push(ValidationError::NoChanges);
    }

    let action = task_ref(project, task).map(|target| TaskAction::Update { target, changes });
    violations.finish(action)
}

fn task_ref(project: Option<String>, task: Option<String>) -> Option<TaskRef> {
    project.zip(task).map(|(project_id, task_id)| TaskRef {
        project_id: ProjectId::new(project_id),
        task_id: TaskId::new(task_id),
    })
}

/// Refines a task list, recording violations under `tasks[i].field` paths.
fn refine_task_inputs(
    violations: &mut Violations,
    raw: Option<Vec<RawTaskInput>>,
) -> Option<Vec<TaskDraft>> {
    let Some(inputs) = raw else {
        violations.push(ValidationError::MissingField("tasks".to_owned()));
        return None;
    };
    if inputs.is_empty() {
        violations.push(ValidationError::EmptyTaskList("tasks".to_owned()));
        return None;
    }

    let mut drafts = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.into_iter().enumerate() {
        let title = violations.required_text(&format!("tasks[{index}].title"), input.title);
        let description =
            violations.required_text(&format!("tasks[{index}].description"), input.description);
        let Some((title_text, description_text)) = title.zip(description) else {
            continue;
        };
        match TaskDraft::new(title_text, description_text) {
            Ok(draft) => {
                let with_tools = match input.tool_recommendations {
                    Some(tools) => draft.with_tool_recommendations(tools),
                    None => draft,
                };
                drafts.push(match input.rule_recommendations {
                    Some(rules) => with_tools.with_rule_recommendations(rules),
                    None => with_tools,
                });
            }
            Err(err) => violations.push(ValidationError::InvalidValue(err.to_string())),
        }
    }
    Some(drafts)
}
