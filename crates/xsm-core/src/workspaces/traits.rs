use crate::workspaces::errors::WorkspaceError;

/// Desktop-environment settings that decide how many workspaces exist.
pub trait WorkspaceSettings: Send + Sync {
    /// Whether the environment adds and removes workspaces on its own.
    fn is_dynamic(&self) -> Result<bool, WorkspaceError>;

    fn set_dynamic(&self, dynamic: bool) -> Result<(), WorkspaceError>;

    /// Configured fixed workspace count.
    fn workspace_number(&self) -> Result<usize, WorkspaceError>;

    /// Only takes effect while dynamic mode is off.
    fn set_workspace_number(&self, count: usize) -> Result<(), WorkspaceError>;
}
