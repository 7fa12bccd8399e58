//! Status reported for a Task.

use serde::{Deserialize, Serialize};

/// Status carried by a `TaskResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not finished; the orchestrator may hand the task out again later.
    InProgress,
    /// Task completed successfully.
    Completed,
    /// Task failed, either as a handled outcome or a handler fault.
    Failed,
}

impl TaskStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let status: TaskStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(status, TaskStatus::Completed);
        assert_eq!(TaskStatus::Failed.to_string(), "FAILED");
    }
}
