//! Taskroster backend
//!
//! REST backend for the task list and employee roster demos, with SQLite
//! persistence, plus the client-side task manager that talks to it.

pub mod api;
pub mod client;
pub mod config;
pub mod dates;
pub mod db;
pub mod errors;
pub mod models;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout;

    // Employee routes, served under both the singular and plural collection names
    let api_routes = Router::new()
        .route(
            "/employee",
            get(api::list_employees).post(api::create_employee),
        )
        .route(
            "/employee/{id}",
            get(api::get_employee)
                .put(api::update_employee)
                .delete(api::delete_employee),
        )
        .route(
            "/employees",
            get(api::list_employees).post(api::create_employee),
        )
        .route(
            "/employees/{id}",
            get(api::get_employee)
                .put(api::update_employee)
                .delete(api::delete_employee),
        );

    let task_routes = Router::new()
        .route("/task", get(api::list_tasks).post(api::create_task))
        .route(
            "/task/{id}",
            get(api::get_task)
                .put(api::update_task)
                .delete(api::delete_task),
        );

    let app = Router::new()
        .nest("/api", api_routes)
        .merge(task_routes)
        .route("/health", get(api::health_check))
        .fallback(api::not_found)
        .with_state(state);

    apply_middleware(app, timeout)
}

/// Shared middleware stack: panic catch-all, request timeout, CORS and tracing.
pub fn apply_middleware(router: Router, timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(CatchPanicLayer::custom(errors::handle_panic))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(middleware::map_response(errors::timeout_body))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
