//! Task API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{body_value, JsonBody};
use crate::errors::AppError;
use crate::models::{BackendTaskData, DeletedTaskResponse, NewTask, TaskChanges};
use crate::validation::{validate, validate_id, Mode, TASK_SCHEMA};
use crate::AppState;

/// GET /task - List all tasks, newest first.
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<BackendTaskData>>, AppError> {
    let tasks = state.repo.list_tasks().await?;
    tracing::debug!("Fetched {} tasks", tasks.len());
    Ok(Json(tasks))
}

/// GET /task/:id - Get a single task, `null` when absent.
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<BackendTaskData>>, AppError> {
    validate_id(&TASK_SCHEMA, &id)?;
    Ok(Json(state.repo.get_task(&id).await?))
}

/// POST /task - Create a new task.
pub async fn create_task(
    State(state): State<AppState>,
    payload: JsonBody,
) -> Result<(StatusCode, Json<BackendTaskData>), AppError> {
    let body = body_value(payload)?;
    let fields = validate(&TASK_SCHEMA, &body, Mode::Create)?;

    let task = state.repo.create_task(&NewTask::from_fields(&fields)).await?;
    tracing::info!("Created task {}", task.id);
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /task/:id - Apply the fields present in the body.
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: JsonBody,
) -> Result<Json<BackendTaskData>, AppError> {
    validate_id(&TASK_SCHEMA, &id)?;
    let body = body_value(payload)?;
    let fields = validate(&TASK_SCHEMA, &body, Mode::Patch)?;

    match state
        .repo
        .update_task(&id, &TaskChanges::from_fields(&fields))
        .await?
    {
        Some(task) => {
            tracing::info!("Updated task {} (version {})", task.id, task.version);
            Ok(Json(task))
        }
        None => Err(AppError::NotFound(TASK_SCHEMA.not_found_message.to_string())),
    }
}

/// DELETE /task/:id - Delete a task and echo it back.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedTaskResponse>, AppError> {
    validate_id(&TASK_SCHEMA, &id)?;

    match state.repo.delete_task(&id).await? {
        Some(task) => {
            tracing::info!("Deleted task {}", task.id);
            Ok(Json(DeletedTaskResponse {
                message: "Task deleted".to_string(),
                deleted_task: Some(task),
            }))
        }
        None => Err(AppError::NotFound(TASK_SCHEMA.not_found_message.to_string())),
    }
}
