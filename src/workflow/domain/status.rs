//! Task status and its transition table.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a task.
///
/// The legal moves form a small cycle with no terminal state:
///
/// | From          | Allowed to                 |
/// |---------------|----------------------------|
/// | `not started` | `in progress`              |
/// | `in progress` | `done`, `not started`      |
/// | `done`        | `in progress`              |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Work has not begun.
    #[serde(rename = "not started")]
    NotStarted,
    /// Work is under way.
    #[serde(rename = "in progress")]
    InProgress,
    /// Work is complete and awaiting (or has received) approval.
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Done];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Done => "done",
        }
    }

    /// Returns whether moving from `self` to `target` is an edge of the
    /// transition table.
    ///
    /// Same-state pairs are not edges; callers treat them as no-ops.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskqueue::workflow::domain::TaskStatus;
    ///
    /// assert!(TaskStatus::InProgress.can_transition_to(TaskStatus::Done));
    /// assert!(!TaskStatus::NotStarted.can_transition_to(TaskStatus::Done));
    /// ```
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::NotStarted, Self::InProgress)
                | (Self::InProgress, Self::Done | Self::NotStarted)
                | (Self::Done, Self::InProgress)
        )
    }

    /// Returns whether this status counts as finished work.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not started" => Ok(Self::NotStarted),
            "in progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
