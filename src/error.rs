//! Error types for the task store, the config store and the command layer.
//!
//! Malformed task data (broken parent links, parent cycles, undated tasks where a
//! deadline is expected) is never an error here: the views handle it silently.

use thiserror::Error;

/// The task service failed or could not be reached.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("task store unreachable: {0}")]
    Unreachable(#[from] std::io::Error),
    #[error("malformed response from task store: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("task {0} not found")]
    NotFound(String),
    #[error("invalid filter query '{query}': {reason}")]
    InvalidFilter { query: String, reason: String },
}

impl RequestError {
    pub fn invalid_filter(query: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            query: query.to_string(),
            reason: reason.into(),
        }
    }
}

/// A persistence failure from the completion history or the config store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}{}", status_suffix(.status))]
pub struct RepositoryError {
    pub message: String,
    pub status: Option<u16>,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl RepositoryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(e: std::io::Error) -> Self {
        RepositoryError::new(e.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        RepositoryError::new(format!("invalid JSON: {e}"))
    }
}

/// Any failure a command can surface to the user.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
