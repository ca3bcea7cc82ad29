//! Employee API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{body_value, JsonBody};
use crate::errors::AppError;
use crate::models::{Employee, EmployeeInput};
use crate::validation::{validate, validate_id, Mode, EMPLOYEE_SCHEMA};
use crate::AppState;

fn not_found() -> AppError {
    AppError::NotFound(EMPLOYEE_SCHEMA.not_found_message.to_string())
}

/// GET /api/employee - List all employees.
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<Employee>>, AppError> {
    Ok(Json(state.repo.list_employees().await?))
}

/// GET /api/employee/:id - Get a single employee.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, AppError> {
    validate_id(&EMPLOYEE_SCHEMA, &id)?;
    state
        .repo
        .get_employee(&id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// POST /api/employee - Create an employee; responds with the inserted rows.
pub async fn create_employee(
    State(state): State<AppState>,
    payload: JsonBody,
) -> Result<(StatusCode, Json<Vec<Employee>>), AppError> {
    let body = body_value(payload)?;
    let fields = validate(&EMPLOYEE_SCHEMA, &body, Mode::Create)?;

    let employee = state
        .repo
        .create_employee(&EmployeeInput::from_fields(&fields))
        .await?;
    tracing::info!("Created employee {}", employee.id);
    Ok((StatusCode::CREATED, Json(vec![employee])))
}

/// PUT /api/employee/:id - Replace all business fields of an employee.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: JsonBody,
) -> Result<&'static str, AppError> {
    validate_id(&EMPLOYEE_SCHEMA, &id)?;
    let body = body_value(payload)?;
    let fields = validate(&EMPLOYEE_SCHEMA, &body, Mode::Replace)?;

    state
        .repo
        .replace_employee(&id, &EmployeeInput::from_fields(&fields))
        .await?
        .ok_or_else(not_found)?;

    tracing::info!("Updated employee {}", id);
    Ok("Employee updated successfully")
}

/// DELETE /api/employee/:id - Delete an employee.
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str, AppError> {
    validate_id(&EMPLOYEE_SCHEMA, &id)?;

    state
        .repo
        .delete_employee(&id)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!("Deleted employee {}", id);
    Ok("Employee deleted successfully")
}
