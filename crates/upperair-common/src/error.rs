//! Error types for the upper-air admin tools.

use thiserror::Error;

/// Result type alias using AdminError.
pub type AdminResult<T> = Result<T, AdminError>;

/// Primary error type for admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    // === Domain Errors ===
    #[error("Invalid pressure level: {0}")]
    InvalidLevel(String),

    #[error("Invalid map type: {0}")]
    InvalidMapType(String),

    // === Storage Errors ===
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    // === Task Errors ===
    #[error("Task '{task}' failed: {message}")]
    TaskFailed { task: String, message: String },

    #[error("Task runner unreachable: {0}")]
    TaskUnavailable(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl AdminError {
    /// Whether the error came from one of the external stores rather than
    /// from the tool itself.
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            AdminError::DatabaseError(_)
                | AdminError::CacheError(_)
                | AdminError::TaskFailed { .. }
                | AdminError::TaskUnavailable(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for AdminError {
    fn from(err: std::io::Error) -> Self {
        AdminError::OutputError(err.to_string())
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        AdminError::TaskUnavailable(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_failed_message() {
        let err = AdminError::TaskFailed {
            task: "fetch_upper_air_data".to_string(),
            message: "upstream returned 503".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Task 'fetch_upper_air_data' failed: upstream returned 503"
        );
        assert!(err.is_external());
    }

    #[test]
    fn test_io_error_is_not_external() {
        let err: AdminError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert!(!err.is_external());
        assert!(err.to_string().contains("closed"));
    }
}
