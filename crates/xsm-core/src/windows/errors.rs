use crate::errors::XsmError;

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Failed to enumerate windows: {message}")]
    EnumerationFailed { message: String },

    #[error("Required tool '{tool}' not found in PATH")]
    ToolNotFound { tool: String },

    #[error("Command '{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Window '{window_id}' not found")]
    WindowNotFound { window_id: String },

    #[error("Unexpected output from '{command}': {output}")]
    UnexpectedOutput { command: String, output: String },

    #[error("IO error during window operation: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl XsmError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::EnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            WindowError::ToolNotFound { .. } => "WINDOW_TOOL_NOT_FOUND",
            WindowError::CommandFailed { .. } => "WINDOW_COMMAND_FAILED",
            WindowError::WindowNotFound { .. } => "WINDOW_NOT_FOUND",
            WindowError::UnexpectedOutput { .. } => "WINDOW_UNEXPECTED_OUTPUT",
            WindowError::IoError { .. } => "WINDOW_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WindowError::ToolNotFound { .. })
    }
}
