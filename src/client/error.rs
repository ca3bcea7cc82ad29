//! Client-side error type.

use std::fmt;

/// Failure of a [`TaskManager`](super::TaskManager) call or an adapter conversion.
#[derive(Debug)]
pub enum ClientError {
    /// The backend answered with a non-success status
    Request { status: u16, body: String },
    /// The request never completed
    Network(String),
    /// No response within the configured timeout
    Timeout,
    /// The response could not be turned into a task
    Decode(String),
    /// No task with this id in the local collection
    UnknownTask(String),
}

impl ClientError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Request { status, body } => {
                write!(f, "request failed. Status: {}. Server response: {}", status, body)
            }
            ClientError::Network(msg) => write!(f, "network error: {}", msg),
            ClientError::Timeout => write!(f, "request timed out"),
            ClientError::Decode(msg) => write!(f, "invalid task data: {}", msg),
            ClientError::UnknownTask(id) => write!(f, "task {} is not loaded", id),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
