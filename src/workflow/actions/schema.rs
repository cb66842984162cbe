//! Raw wire shapes for tool calls.
//!
//! These types only check structure: every argument struct rejects unknown
//! fields and every field is optional so that missing values can be
//! reported together by [`super::rules`].

use super::ValidationError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Outer envelope delivered by the transport.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawToolCall {
    pub tool: String,
    pub params: RawParams,
}

/// Action selector and its untyped arguments.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawParams {
    pub action: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct RawListArgs {
    pub state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct RawTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tool_recommendations: Option<String>,
    pub rule_recommendations: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct RawCreateProjectArgs {
    pub initial_prompt: Option<String>,
    pub project_plan: Option<String>,
    pub auto_approve: Option<bool>,
    pub tasks: Option<Vec<RawTaskInput>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct RawProjectRef {
    pub project_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct RawAddTasksArgs {
    pub project_id: Option<String>,
    pub tasks: Option<Vec<RawTaskInput>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct RawTaskRef {
    pub project_id: Option<String>,
    pub task_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(super) struct RawUpdateTaskArgs {
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub completed_details: Option<String>,
    pub tool_recommendations: Option<String>,
    pub rule_recommendations: Option<String>,
}

/// Decodes the envelope of a tool call.
pub(super) fn decode_envelope(payload: &Value) -> Result<RawToolCall, ValidationError> {
    RawToolCall::deserialize(payload).map_err(|err| ValidationError::Malformed(err.to_string()))
}

/// Decodes action arguments, treating absent or `null` arguments as `{}`.
pub(super) fn decode_arguments<T>(arguments: Option<Value>) -> Result<T, ValidationError>
where
    T: DeserializeOwned,
{
    let value = match arguments {
        None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
        Some(value) => value,
    };
    serde_json::from_value(value)
        .map_err(|err| ValidationError::Malformed(format!("arguments: {err}")))
}
