//! Shared world state for task workflow BDD scenarios.

use std::{collections::HashMap, sync::Arc};

use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use taskqueue::workflow::{
    adapters::InMemoryProjectStore,
    dispatch::{ToolDispatcher, ToolResponse},
    services::WorkflowService,
};

/// Dispatcher type used by the BDD world.
pub type TestDispatcher = ToolDispatcher<InMemoryProjectStore, DefaultClock>;

/// Scenario world for task workflow behaviour tests.
pub struct TaskWorkflowWorld {
    pub dispatcher: TestDispatcher,
    pub project_id: Option<String>,
    pub task_ids: HashMap<String, String>,
    pub last_response: Option<ToolResponse>,
}

impl TaskWorkflowWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let service = WorkflowService::new(
            Arc::new(InMemoryProjectStore::new()),
            Arc::new(DefaultClock),
        );
        Self {
            dispatcher: ToolDispatcher::new(service),
            project_id: None,
            task_ids: HashMap::new(),
            last_response: None,
        }
    }

    /// Sends a tool call and records the response.
    pub fn call(&mut self, tool: &str, action: &str, arguments: &Value) -> ToolResponse {
        let payload =
            json!({ "tool": tool, "params": { "action": action, "arguments": arguments } });
        let response = self.dispatcher.handle(&payload);
        self.last_response = Some(response.clone());
        response
    }

    /// Returns the identifier of the scenario project.
    pub fn project_id(&self) -> eyre::Result<String> {
        self.project_id
            .clone()
            .ok_or_else(|| eyre!("no project created in scenario world"))
    }

    /// Returns `{projectId, taskId}` arguments for the task with `title`.
    pub fn task_target(&self, title: &str) -> eyre::Result<Value> {
        let task_id = self
            .task_ids
            .get(title)
            .ok_or_else(|| eyre!("no task titled {title} in scenario world"))?;
        Ok(json!({ "projectId": self.project_id()?, "taskId": task_id }))
    }

    /// Reads the task with `title` through the dispatcher.
    pub fn read_task(&self, title: &str) -> eyre::Result<Value> {
        let payload = json!({
            "tool": "task",
            "params": { "action": "read", "arguments": self.task_target(title)? }
        });
        success_data(self.dispatcher.handle(&payload))
    }

    /// Returns the most recent response.
    pub fn last_response(&self) -> eyre::Result<&ToolResponse> {
        self.last_response
            .as_ref()
            .ok_or_else(|| eyre!("no tool call made in scenario world"))
    }
}

impl Default for TaskWorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Unwraps the data of a successful response.
pub fn success_data(response: ToolResponse) -> eyre::Result<Value> {
    if !response.success {
        return Err(eyre!("tool call failed: {}", response.error.unwrap_or_default()));
    }
    response
        .data
        .ok_or_else(|| eyre!("successful response without data"))
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskWorkflowWorld {
    TaskWorkflowWorld::default()
}
