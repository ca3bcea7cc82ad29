//! Per-entity schemas.

use super::{EntitySchema, FieldKind, FieldRule, IdFormat};

const INVALID_DATE: &str = "Invalid date format";

pub const TASK_SCHEMA: EntitySchema = EntitySchema {
    entity: "Task",
    fields: &[
        FieldRule::required("text", FieldKind::Text, "Task text must be a string"),
        FieldRule::optional("subtask", FieldKind::Text, "subtask must be a string"),
        FieldRule::optional("completed", FieldKind::Bool, "completed must be a boolean"),
        FieldRule::optional("due_date", FieldKind::Date, INVALID_DATE),
        FieldRule::optional("alert", FieldKind::Bool, "alert must be a boolean"),
        FieldRule::optional("alert_time", FieldKind::Date, INVALID_DATE),
        FieldRule::optional(
            "expected_version",
            FieldKind::Integer,
            "expected_version must be an integer",
        ),
    ],
    missing_message: "Task text is required.",
    id_format: IdFormat::Uuid,
    invalid_id_message: "Invalid task ID",
    not_found_message: "Task not found",
};

pub const EMPLOYEE_SCHEMA: EntitySchema = EntitySchema {
    entity: "Employee",
    fields: &[
        FieldRule::required("first_name", FieldKind::Text, "first_name must be a string"),
        FieldRule::required("last_name", FieldKind::Text, "last_name must be a string"),
        FieldRule::required("group_name", FieldKind::Text, "group_name must be a string"),
        FieldRule::required("role", FieldKind::Text, "role must be a string"),
        FieldRule::required(
            "expected_salary",
            FieldKind::Number,
            "Expected salary must be a number",
        ),
        FieldRule::required("expected_date_of_defense", FieldKind::Date, INVALID_DATE),
        FieldRule::optional(
            "expected_version",
            FieldKind::Integer,
            "expected_version must be an integer",
        ),
    ],
    missing_message: "Missing required fields",
    id_format: IdFormat::Uuid,
    invalid_id_message: "Invalid employee ID",
    not_found_message: "Employee not found",
};
