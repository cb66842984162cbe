//! Tool-call dispatch: raw JSON in, response envelope out.

use mockable::Clock;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use super::{
    actions::{Action, ProjectAction, TaskAction, ValidationError, parse_tool_call},
    domain::{BlockingTask, WorkflowDomainError},
    ports::ProjectStore,
    services::{WorkflowError, WorkflowErrorKind, WorkflowResult, WorkflowService},
};

/// Response envelope returned for every tool call.
///
/// Successful calls carry `data`; failed calls carry `error`, `kind` and,
/// where useful, structured `details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponse {
    /// Whether the call succeeded.
    pub success: bool,
    /// Operation result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human-readable failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable failure category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkflowErrorKind>,
    /// Structured failure data: field violations or blocking tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolResponse {
    /// Builds a success envelope.
    #[must_use]
    pub const fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            kind: None,
            details: None,
        }
    }

    /// Builds a failure envelope from a workflow error.
    #[must_use]
    pub fn failure(err: &WorkflowError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            kind: Some(err.kind()),
            details: failure_details(err),
        }
    }
}

fn failure_details(err: &WorkflowError) -> Option<Value> {
    match err {
        WorkflowError::Validation(validation) => {
            Some(json!({ "violations": validation.violations() }))
        }
        WorkflowError::Domain(WorkflowDomainError::IncompleteProject { blocking, .. }) => {
            let tasks: Vec<Value> = blocking.iter().map(blocking_entry).collect();
            Some(json!({ "blockingTasks": tasks }))
        }
        _ => None,
    }
}

fn blocking_entry(task: &BlockingTask) -> Value {
    json!({
        "id": task.id.as_str(),
        "status": task.status.as_str(),
        "approved": task.approved,
    })
}

/// Routes validated tool calls to a [`WorkflowService`].
pub struct ToolDispatcher<S, C>
where
    S: ProjectStore,
    C: Clock + Send + Sync,
{
    service: WorkflowService<S, C>,
}

impl<S, C> ToolDispatcher<S, C>
where
    S: ProjectStore,
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher over `service`.
    #[must_use]
    pub const fn new(service: WorkflowService<S, C>) -> Self {
        Self { service }
    }

    /// Handles one line of input holding a JSON tool call.
    #[must_use]
    pub fn handle_line(&self, line: &str) -> ToolResponse {
        match serde_json::from_str::<Value>(line) {
            Ok(payload) => self.handle(&payload),
            Err(err) => ToolResponse::failure(&WorkflowError::Validation(
                ValidationError::Malformed(format!("invalid JSON: {err}")),
            )),
        }
    }

    /// Validates and executes one tool call.
    #[must_use]
    pub fn handle(&self, payload: &Value) -> ToolResponse {
        let outcome = parse_tool_call(payload)
            .map_err(WorkflowError::from)
            .and_then(|action| {
                debug!(action = action.name(), "dispatching tool call");
                self.execute(action)
            });
        match outcome {
            Ok(data) => ToolResponse::ok(data),
            Err(err) => ToolResponse::failure(&err),
        }
    }

    /// Executes an already validated action.
    ///
    /// # Errors
    ///
    /// Returns whatever [`WorkflowError`] the underlying operation reports.
    pub fn execute(&self, action: Action) -> WorkflowResult<Value> {
        match action {
            Action::Project(project) => self.execute_project(project),
            Action::Task(task) => self.execute_task(task),
        }
    }

    fn execute_project(&self, action: ProjectAction) -> WorkflowResult<Value> {
        let service = &self.service;
        match action {
            ProjectAction::List { filter } => encode(&service.list_projects(filter)?),
            ProjectAction::Create(draft) => encode(&service.create_project(draft)?),
            ProjectAction::Delete { project_id } => encode(&service.delete_project(&project_id)?),
            ProjectAction::AddTasks { project_id, tasks } => {
                encode(&service.add_tasks(&project_id, tasks)?)
            }
            ProjectAction::Finalize { project_id } => {
                encode(&service.finalize_project(&project_id)?)
            }
            ProjectAction::Read { project_id } => encode(&service.read_project(&project_id)?),
            ProjectAction::NextTask { project_id } => encode(&service.next_task(&project_id)?),
        }
    }

    fn execute_task(&self, action: TaskAction) -> WorkflowResult<Value> {
        let service = &self.service;
        match action {
            TaskAction::Read(target) => encode(&service.read_task(&target)?),
            TaskAction::Update { target, changes } => {
                encode(&service.update_task(&target, &changes)?)
            }
            TaskAction::Delete(target) => encode(&service.delete_task(&target)?),
            TaskAction::Approve(target) => encode(&service.approve_task(&target)?),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> WorkflowResult<Value> {
    Ok(serde_json::to_value(value)?)
}
