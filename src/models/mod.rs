//! Data models for the task list and employee roster.
//!
//! Field names match the stored row shape (snake_case, ISO-8601 text dates).

mod employee;
mod task;

pub use employee::*;
pub use task::*;
