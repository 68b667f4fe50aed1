//! The live desktop as the core sees it: windows, processes, launching and
//! workspace settings behind their traits.

use std::sync::Arc;

use crate::launcher::{AppLauncher, SystemLauncher};
use crate::process::{ProcessTable, SysinfoProcessTable};
use crate::windows::{WindowSystem, WmctrlWindowSystem};
use crate::workspaces::{GSettingsWorkspaces, WorkspaceSettings};

/// Shared handles to the desktop collaborators. Cheap to clone and safe to
/// move onto the restore worker.
#[derive(Clone)]
pub struct Desktop {
    pub windows: Arc<dyn WindowSystem>,
    pub processes: Arc<dyn ProcessTable>,
    pub launcher: Arc<dyn AppLauncher>,
    pub workspaces: Arc<dyn WorkspaceSettings>,
}

impl Desktop {
    /// Bindings to the running X11 session.
    pub fn system() -> Self {
        Self {
            windows: Arc::new(WmctrlWindowSystem::new()),
            processes: Arc::new(SysinfoProcessTable::new()),
            launcher: Arc::new(SystemLauncher::new()),
            workspaces: Arc::new(GSettingsWorkspaces::new()),
        }
    }
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop")
            .field("geometry_provider", &self.windows.geometry_provider())
            .finish_non_exhaustive()
    }
}
