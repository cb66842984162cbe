//! Validation errors for incoming tool calls.

use thiserror::Error;

/// A rejected tool call, naming every field-level violation found.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The payload does not have the expected structure (wrong types,
    /// unknown fields, invalid JSON).
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The tool name is not part of the action set.
    #[error("unknown tool '{0}'; expected 'project' or 'task'")]
    UnknownTool(String),

    /// The action is not defined for the tool.
    #[error("unknown action '{action}' for tool '{tool}'")]
    UnknownAction {
        /// Tool name from the payload.
        tool: String,
        /// Action name from the payload.
        action: String,
    },

    /// A required field is absent.
    #[error("{0} is required")]
    MissingField(String),

    /// A text field is present but blank.
    #[error("{0} must not be empty")]
    EmptyField(String),

    /// A task list is empty.
    #[error("{0} must contain at least one task")]
    EmptyTaskList(String),

    /// The status string is not a known status.
    #[error("invalid status '{0}'; expected 'not started', 'in progress' or 'done'")]
    InvalidStatus(String),

    /// The list filter is not a known project state.
    #[error("invalid state '{0}'; expected 'open', 'pending_approval', 'completed' or 'all'")]
    InvalidFilter(String),

    /// A `done` status was submitted without completion details.
    #[error("completedDetails is required when status is 'done'")]
    MissingCompletedDetails,

    /// An update names no field to change.
    #[error(
        "at least one of title, description, status, completedDetails, toolRecommendations or ruleRecommendations is required"
    )]
    NoChanges,

    /// A domain constructor rejected an otherwise well-formed value.
    #[error("{0}")]
    InvalidValue(String),

    /// Multiple validation errors occurred.
    #[error("{}", format_errors(.0))]
    Multiple(Vec<Self>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Combines collected errors into one.
    ///
    /// A single error is returned unwrapped. An empty list indicates a
    /// caller bug and yields an [`Self::InvalidValue`] placeholder.
    #[must_use]
    pub fn multiple(errors: Vec<Self>) -> Self {
        if errors.len() > 1 {
            return Self::Multiple(errors);
        }
        errors.into_iter().next().unwrap_or_else(|| {
            debug_assert!(false, "multiple() called with empty errors vector");
            Self::InvalidValue("internal error: no validation errors".to_owned())
        })
    }

    /// Returns the human-readable violations in the order they were found.
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(Self::violations).collect(),
            other => vec![other.to_string()],
        }
    }
}
