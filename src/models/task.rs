//! Task row model, the external shape shared by the router and the client adapter.

use serde::{Deserialize, Serialize};

use crate::dates::{format_day, format_timestamp};
use crate::validation::ValidatedFields;

/// A persisted task as stored and served: snake_case fields, ISO-8601 string dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendTaskData {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Free-form notes; may hold a serialized checklist
    #[serde(default)]
    pub subtask: Option<String>,
    #[serde(default)]
    pub alert: bool,
    #[serde(default)]
    pub alert_time: Option<String>,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub text: String,
    pub due_date: Option<String>,
    pub alert: bool,
    pub alert_time: Option<String>,
    pub subtask: Option<String>,
}

impl NewTask {
    pub fn from_fields(fields: &ValidatedFields) -> Self {
        Self {
            text: fields.text("text").unwrap_or_default().to_string(),
            due_date: fields.date("due_date").map(|d| format_day(&d)),
            alert: fields.bool("alert").unwrap_or(false),
            alert_time: fields.date("alert_time").map(|d| format_timestamp(&d)),
            subtask: fields.text("subtask").map(str::to_string),
        }
    }
}

/// Validated partial update. The outer `Option` is "field present", the inner one
/// distinguishes a value from an explicit clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<String>>,
    pub alert: Option<bool>,
    pub alert_time: Option<Option<String>>,
    pub subtask: Option<Option<String>>,
    /// Expected version for optimistic concurrency control
    pub expected_version: Option<i64>,
}

impl TaskChanges {
    pub fn from_fields(fields: &ValidatedFields) -> Self {
        Self {
            text: fields.text("text").map(str::to_string),
            completed: fields.bool("completed"),
            due_date: fields
                .nullable_date("due_date")
                .map(|d| d.map(|d| format_day(&d))),
            alert: fields.bool("alert"),
            alert_time: fields
                .nullable_date("alert_time")
                .map(|d| d.map(|d| format_timestamp(&d))),
            subtask: fields.nullable_text("subtask"),
            expected_version: fields.integer("expected_version"),
        }
    }
}

/// Body returned by `DELETE /task/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTaskResponse {
    pub message: String,
    pub deleted_task: Option<BackendTaskData>,
}
