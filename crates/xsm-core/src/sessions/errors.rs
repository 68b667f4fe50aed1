use crate::errors::XsmError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session file '{}' was not found", path.display())]
    NotFound { path: PathBuf },

    #[error("Session file '{}' is malformed: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("Invalid session name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Failed to serialize session '{name}': {message}")]
    SerializationFailed { name: String, message: String },

    #[error("Window operation failed: {source}")]
    WindowError {
        #[from]
        source: crate::windows::WindowError,
    },

    #[error("IO operation failed: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl XsmError for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound { .. } => "SESSION_NOT_FOUND",
            SessionError::Malformed { .. } => "SESSION_MALFORMED",
            SessionError::InvalidName { .. } => "INVALID_SESSION_NAME",
            SessionError::SerializationFailed { .. } => "SESSION_SERIALIZATION_FAILED",
            SessionError::WindowError { .. } => "WINDOW_ERROR",
            SessionError::IoError { .. } => "IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SessionError::NotFound { .. }
                | SessionError::Malformed { .. }
                | SessionError::InvalidName { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_not_found() {
        let error = SessionError::NotFound {
            path: PathBuf::from("/tmp/sessions/missing"),
        };
        assert_eq!(
            error.to_string(),
            "Session file '/tmp/sessions/missing' was not found"
        );
        assert_eq!(error.error_code(), "SESSION_NOT_FOUND");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_invalid_name_error() {
        let error = SessionError::InvalidName {
            name: "a/b".to_string(),
            reason: "must not contain '/'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid session name 'a/b': must not contain '/'"
        );
        assert!(error.is_user_error());
    }

    #[test]
    fn test_io_error_is_not_user_error() {
        let error = SessionError::from(std::io::Error::other("disk full"));
        assert_eq!(error.error_code(), "IO_ERROR");
        assert!(!error.is_user_error());
    }
}
