use crate::errors::XsmError;

/// Failures that abort a whole restore or move. Per-window failures are
/// reported in the [`RestoreReport`](super::RestoreReport) instead.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error(transparent)]
    Session {
        #[from]
        source: crate::sessions::SessionError,
    },

    #[error("Restore worker failed: {message}")]
    WorkerFailed { message: String },
}

impl XsmError for RestoreError {
    fn error_code(&self) -> &'static str {
        match self {
            RestoreError::Session { source } => source.error_code(),
            RestoreError::WorkerFailed { .. } => "RESTORE_WORKER_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            RestoreError::Session { source } => source.is_user_error(),
            RestoreError::WorkerFailed { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_session_errors_pass_through() {
        let error = RestoreError::from(crate::sessions::SessionError::NotFound {
            path: PathBuf::from("/s/work"),
        });
        assert_eq!(error.to_string(), "Session file '/s/work' was not found");
        assert_eq!(error.error_code(), "SESSION_NOT_FOUND");
        assert!(error.is_user_error());
    }
}
