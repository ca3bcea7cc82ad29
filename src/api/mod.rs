//! REST API module.
//!
//! Every handler follows the same path: validate the path identifier and body
//! against the entity schema, dispatch to the repository, map the outcome to a
//! status code.

mod employees;
mod tasks;

pub use employees::*;
pub use tasks::*;

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::errors::AppError;

/// Request body as loose JSON; typed parsing happens in the validation pipeline.
pub type JsonBody = Result<Json<Value>, JsonRejection>;

fn body_value(payload: JsonBody) -> Result<Value, AppError> {
    let Json(value) = payload?;
    Ok(value)
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// Health check endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
