//! Conversion between the stored row shape and the internal task shape.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ClientError, Task, TaskDraft};
use crate::dates::{format_day, format_timestamp, parse_datetime};
use crate::models::BackendTaskData;

/// Partial row sent to the backend. Absent fields are omitted from the JSON;
/// `Some(None)` is sent as `null` and clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtask: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_time: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<i64>,
}

/// Row shape to internal task. A date string that is present but unparsable
/// is an error, never a silently missing date.
pub fn to_internal(external: &BackendTaskData) -> Result<Task, ClientError> {
    Ok(Task {
        id: external.id.clone(),
        text: external.text.clone(),
        completed: external.completed,
        due_date: optional_date("due_date", external.due_date.as_deref())?,
        created_at: required_date("created_at", &external.created_at)?,
        updated_at: required_date("updated_at", &external.updated_at)?,
        notes: external.subtask.clone(),
        alert: external.alert,
        alert_time: optional_date("alert_time", external.alert_time.as_deref())?,
        version: external.version,
    })
}

/// Internal task to the update payload. Every field is sent so cleared
/// dates and notes are cleared on the backend too.
pub fn to_external(task: &Task) -> TaskPayload {
    TaskPayload {
        id: Some(task.id.clone()),
        text: Some(task.text.clone()),
        completed: Some(task.completed),
        due_date: Some(task.due_date.as_ref().map(format_day)),
        subtask: Some(task.notes.clone()),
        alert: Some(task.alert),
        alert_time: Some(task.alert_time.as_ref().map(format_timestamp)),
        expected_version: (task.version > 0).then_some(task.version),
    }
}

/// Draft to the create payload; only fields the user filled in are sent.
pub fn draft_to_external(draft: &TaskDraft) -> TaskPayload {
    TaskPayload {
        text: Some(draft.text.clone()),
        due_date: draft.due_date.as_ref().map(|d| Some(format_day(d))),
        subtask: draft
            .notes
            .as_ref()
            .filter(|n| !n.is_empty())
            .map(|n| Some(n.clone())),
        alert: draft.alert,
        alert_time: draft.alert_time.as_ref().map(|d| Some(format_timestamp(d))),
        ..Default::default()
    }
}

fn required_date(field: &str, raw: &str) -> Result<DateTime<Utc>, ClientError> {
    parse_datetime(raw).ok_or_else(|| ClientError::Decode(format!("{field}: {raw:?} is not a date")))
}

fn optional_date(field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ClientError> {
    raw.map(|r| required_date(field, r)).transpose()
}
