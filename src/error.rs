//! Error types for Undertow

use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum UndertowError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("No rebase in progress")]
    NoRebaseInProgress,

    #[error("No external editor available")]
    EditorNotFound,

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl UndertowError {
    /// Stable error code sent to the frontend alongside the message
    fn code(&self) -> &'static str {
        match self {
            UndertowError::Git(_) => "GIT_ERROR",
            UndertowError::Io(_) => "IO_ERROR",
            UndertowError::Serialization(_) => "SERIALIZATION_ERROR",
            UndertowError::RepositoryNotFound(_) => "REPO_NOT_FOUND",
            UndertowError::InvalidPath(_) => "INVALID_PATH",
            UndertowError::NoRebaseInProgress => "NO_REBASE_IN_PROGRESS",
            UndertowError::EditorNotFound => "EDITOR_NOT_FOUND",
            UndertowError::OperationFailed(_) => "OPERATION_FAILED",
        }
    }
}

/// Serializable error response for IPC
#[derive(Serialize, Debug, Clone)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<&UndertowError> for ErrorResponse {
    fn from(error: &UndertowError) -> Self {
        ErrorResponse {
            code: error.code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

// Implement conversion to make errors work with Tauri commands
impl serde::Serialize for UndertowError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ErrorResponse::from(self).serialize(serializer)
    }
}

/// Result type alias for Undertow operations
pub type Result<T> = std::result::Result<T, UndertowError>;
