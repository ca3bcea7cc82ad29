//! Employee row model for the roster demo.

use serde::{Deserialize, Serialize};

use crate::dates::format_timestamp;
use crate::validation::ValidatedFields;

/// A persisted employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub group_name: String,
    pub role: String,
    pub expected_salary: f64,
    pub expected_date_of_defense: String,
    pub created_at: String,
    pub updated_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

/// Validated body for creating or replacing an employee.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub group_name: String,
    pub role: String,
    pub expected_salary: f64,
    /// Normalized to an ISO-8601 timestamp
    pub expected_date_of_defense: String,
    pub expected_version: Option<i64>,
}

impl EmployeeInput {
    pub fn from_fields(fields: &ValidatedFields) -> Self {
        let text = |name: &str| fields.text(name).unwrap_or_default().to_string();
        Self {
            first_name: text("first_name"),
            last_name: text("last_name"),
            group_name: text("group_name"),
            role: text("role"),
            expected_salary: fields.number("expected_salary").unwrap_or_default(),
            expected_date_of_defense: fields
                .date("expected_date_of_defense")
                .map(|d| format_timestamp(&d))
                .unwrap_or_default(),
            expected_version: fields.integer("expected_version"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate, Mode, EMPLOYEE_SCHEMA};
    use serde_json::json;

    #[test]
    fn test_input_from_fields() {
        let fields = validate(
            &EMPLOYEE_SCHEMA,
            &json!({
                "first_name": "Siao",
                "last_name": "Zhang",
                "group_name": "Group A",
                "role": "Developer",
                "expected_salary": "750",
                "expected_date_of_defense": "2025-12-31"
            }),
            Mode::Create,
        )
        .unwrap();

        let input = EmployeeInput::from_fields(&fields);
        assert_eq!(input.last_name, "Zhang");
        assert_eq!(input.expected_salary, 750.0);
        assert_eq!(input.expected_date_of_defense, "2025-12-31T00:00:00.000Z");
        assert_eq!(input.expected_version, None);
    }
}
