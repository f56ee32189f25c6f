// Task Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Task ID (UUID v4 in production)
pub type TaskId = String;

/// Task lifecycle: Created -> Running -> Finished
///
/// There is no cancelled state; a launched task always runs to completion
/// or to a caught panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Created,
    Running,
    Finished,
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Created => write!(f, "CREATED"),
            TaskState::Running => write!(f, "RUNNING"),
            TaskState::Finished => write!(f, "FINISHED"),
        }
    }
}

impl TaskState {
    /// Validate and perform a transition
    pub fn transition(self, to: TaskState) -> Result<TaskState> {
        match (self, to) {
            (TaskState::Created, TaskState::Running)
            | (TaskState::Running, TaskState::Finished) => Ok(to),
            _ => Err(DomainError::InvalidStateTransition {
                from: self.to_string(),
                to: to.to_string(),
            }),
        }
    }

    pub fn is_terminal(self) -> bool {
        self == TaskState::Finished
    }
}

/// How a runnable ended. Diagnostic only, never surfaced to the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskOutcome {
    Completed,
    Panicked(String),
}

/// Point-in-time view of a task, for logs and reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: TaskId,
    pub label: String,
    pub state: TaskState,
    pub launched_at: i64, // epoch ms
    pub finished_at: Option<i64>,
    pub outcome: Option<TaskOutcome>,
}
