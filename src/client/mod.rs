//! Client side of the task list: internal task shape, row adapter, list
//! orderings and the caching [`TaskManager`].

pub mod adapter;
mod error;
mod manager;
pub mod sorting;
mod task;

pub use error::ClientError;
pub use manager::TaskManager;
pub use task::{ChecklistItem, Task, TaskDraft};
