//! Error types for the queue and sink

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON configuration error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Destination could not be opened at construction
    #[error("Failed to open destination '{}': {source}", .path.display())]
    DestinationOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Background worker thread could not be started
    #[error("Failed to spawn sink worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// Background worker thread panicked
    #[error("Sink worker thread panicked")]
    WorkerPanicked,

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a destination open error
    pub fn destination_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::DestinationOpen {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("BoundedQueue", "capacity must be positive");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let err = LoggerError::destination_open("/missing/dir/app.log", io_err);
        assert!(matches!(err, LoggerError::DestinationOpen { .. }));

        let err = LoggerError::writer("closed pipe");
        assert!(matches!(err, LoggerError::WriterError(_)));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("BoundedQueue", "capacity must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for BoundedQueue: capacity must be positive, got 0"
        );

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = LoggerError::destination_open("/var/log/app.log", io_err);
        assert_eq!(
            err.to_string(),
            "Failed to open destination '/var/log/app.log': denied"
        );

        assert_eq!(LoggerError::WorkerPanicked.to_string(), "Sink worker thread panicked");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing line", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing line"));
        assert!(err.to_string().contains("cannot write to file"));
    }
}
