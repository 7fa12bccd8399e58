//! Task and TaskResult types.
//!
//! Both are serialized in the orchestrator's camelCase wire shape.

use crate::{CoreError, TaskId, TaskStatus, WorkerId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Untyped input handed to a handler.
pub type InputData = HashMap<String, Value>;

/// Untyped output produced by a handler.
pub type OutputData = HashMap<String, Value>;

/// A work item issued by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task type; selects the handler.
    pub task_type: String,

    /// Identifier of this delivery.
    pub task_id: TaskId,

    /// Caller intent, keyed by input name.
    #[serde(default)]
    pub input_data: InputData,

    /// Workflow the task belongs to, echoed back on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_instance_id: Option<String>,

    /// How many times the orchestrator has handed this task out.
    #[serde(default)]
    pub poll_count: u32,
}

impl Task {
    /// Create a new Task with empty input.
    pub fn new(task_type: impl Into<String>, task_id: impl Into<TaskId>) -> Self {
        Self {
            task_type: task_type.into(),
            task_id: task_id.into(),
            input_data: InputData::new(),
            workflow_instance_id: None,
            poll_count: 0,
        }
    }

    /// Builder method to add an input value.
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.input_data.insert(key.into(), value.into());
        self
    }

    /// Builder method to set the workflow instance.
    pub fn with_workflow_instance_id(mut self, id: impl Into<String>) -> Self {
        self.workflow_instance_id = Some(id.into());
        self
    }

    /// Get a required string input.
    pub fn input_str(&self, key: &str) -> Result<&str, CoreError> {
        match self.input_data.get(key) {
            None | Some(Value::Null) => Err(CoreError::MissingInput(key.to_string())),
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(CoreError::InvalidInputType {
                key: key.to_string(),
                expected: "a string",
            }),
        }
    }

    /// Get a required integer input, accepting a JSON integer or a numeric string.
    pub fn input_i64(&self, key: &str) -> Result<i64, CoreError> {
        match self.input_data.get(key) {
            None | Some(Value::Null) => Err(CoreError::MissingInput(key.to_string())),
            Some(Value::String(s)) => s.parse().map_err(|e| CoreError::InvalidInput {
                key: key.to_string(),
                reason: format!("'{}' is not an integer: {}", s, e),
            }),
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| CoreError::InvalidInput {
                key: key.to_string(),
                reason: format!("{} is not an integer", n),
            }),
            Some(_) => Err(CoreError::InvalidInputType {
                key: key.to_string(),
                expected: "an integer or numeric string",
            }),
        }
    }
}

/// A handler's verdict on one Task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    /// Copied from the originating Task.
    pub task_id: TaskId,

    /// Outcome of the execution.
    pub status: TaskStatus,

    /// Handler output, keyed by output name.
    #[serde(default)]
    pub output_data: OutputData,

    /// Copied from the originating Task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_instance_id: Option<String>,

    /// Worker that executed the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<WorkerId>,

    /// Failure description when a fault was mapped to FAILED.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_incompletion: Option<String>,

    /// Re-delivery delay hint for IN_PROGRESS results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_after_seconds: Option<u64>,
}

impl TaskResult {
    /// Create an empty result for a Task.
    pub fn new(task: &Task, status: TaskStatus) -> Self {
        Self {
            task_id: task.task_id.clone(),
            status,
            output_data: OutputData::new(),
            workflow_instance_id: task.workflow_instance_id.clone(),
            worker_id: None,
            reason_for_incompletion: None,
            callback_after_seconds: None,
        }
    }

    /// Create a COMPLETED result.
    pub fn completed(task: &Task) -> Self {
        Self::new(task, TaskStatus::Completed)
    }

    /// Create a FAILED result with no output.
    pub fn failed(task: &Task) -> Self {
        Self::new(task, TaskStatus::Failed)
    }

    /// Create an IN_PROGRESS result asking to be handed out again later.
    pub fn in_progress(task: &Task, callback_after_seconds: u64) -> Self {
        let mut result = Self::new(task, TaskStatus::InProgress);
        result.callback_after_seconds = Some(callback_after_seconds);
        result
    }

    /// Create a FAILED result describing a handler fault.
    pub fn fault(task: &Task, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let mut result = Self::failed(task).with_output("error", reason.clone());
        result.reason_for_incompletion = Some(reason);
        result
    }

    /// Builder method to add an output value.
    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_output(key, value);
        self
    }

    /// Add an output value.
    pub fn add_output(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.output_data.insert(key.into(), value.into());
    }
}
