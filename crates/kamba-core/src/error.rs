//! Error handling for the task API
//!
//! Typed errors for REST operations. The policy everywhere is
//! surface-and-preserve: a failed request is reported to the caller and the
//! last fetched state stays on screen.

use thiserror::Error;

use crate::models::TaskId;

/// Errors that can occur while talking to the task API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or protocol-level failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned status {status} for {path}")]
    Status { status: u16, path: String },

    /// A task id that is not present in the cached snapshot
    #[error("Unknown task id: {0}")]
    UnknownTask(TaskId),
}

impl ApiError {
    /// Whether this error came back as an HTTP 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Result type for task API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            status: 500,
            path: "/tasks".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("/tasks"));
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::Status {
            status: 404,
            path: "/tasks/9".to_string(),
        };
        assert!(err.is_not_found());

        let err = ApiError::Status {
            status: 500,
            path: "/tasks".to_string(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_unknown_task_display() {
        let err = ApiError::UnknownTask(42);
        assert!(err.to_string().contains("42"));
    }
}
