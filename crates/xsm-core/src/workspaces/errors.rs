use crate::errors::XsmError;

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Required tool '{tool}' not found in PATH")]
    ToolNotFound { tool: String },

    #[error("Command '{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Unexpected value for '{key}': {value}")]
    UnexpectedValue { key: String, value: String },

    #[error("Failed to count workspaces: {source}")]
    WindowError {
        #[from]
        source: crate::windows::WindowError,
    },

    #[error("IO error during workspace operation: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl XsmError for WorkspaceError {
    fn error_code(&self) -> &'static str {
        match self {
            WorkspaceError::ToolNotFound { .. } => "WORKSPACE_TOOL_NOT_FOUND",
            WorkspaceError::CommandFailed { .. } => "WORKSPACE_COMMAND_FAILED",
            WorkspaceError::UnexpectedValue { .. } => "WORKSPACE_UNEXPECTED_VALUE",
            WorkspaceError::WindowError { .. } => "WORKSPACE_WINDOW_ERROR",
            WorkspaceError::IoError { .. } => "WORKSPACE_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WorkspaceError::ToolNotFound { .. })
    }
}
