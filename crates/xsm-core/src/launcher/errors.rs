use crate::errors::XsmError;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Executable '{program}' not found")]
    NotFound { program: String },

    #[error("Multiple applications ({}) match '{app_name}'", candidates.join(", "))]
    MoreThanOneResultFound {
        app_name: String,
        candidates: Vec<String>,
    },

    #[error("No installed application matches '{app_name}'")]
    NoMatch { app_name: String },

    #[error("Nothing to launch: command and application name are both empty")]
    EmptyCommand,

    #[error("Failed to launch '{program}': {message}")]
    SpawnFailed { program: String, message: String },

    #[error("IO error during launch: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl XsmError for LaunchError {
    fn error_code(&self) -> &'static str {
        match self {
            LaunchError::NotFound { .. } => "LAUNCH_NOT_FOUND",
            LaunchError::MoreThanOneResultFound { .. } => "LAUNCH_AMBIGUOUS_MATCH",
            LaunchError::NoMatch { .. } => "LAUNCH_NO_MATCH",
            LaunchError::EmptyCommand => "LAUNCH_EMPTY_COMMAND",
            LaunchError::SpawnFailed { .. } => "LAUNCH_SPAWN_FAILED",
            LaunchError::IoError { .. } => "LAUNCH_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            LaunchError::NotFound { .. }
                | LaunchError::MoreThanOneResultFound { .. }
                | LaunchError::NoMatch { .. }
        )
    }
}
