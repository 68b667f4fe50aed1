//! Make sure enough workspaces exist before windows are sent to them.
//!
//! Only GNOME Shell is provisioned; its dynamic workspace mode has to be
//! switched off for a fixed count to take effect, and is switched back on
//! when the [`WorkspaceGuard`] drops.

use tracing::{debug, error, info, warn};

use crate::windows::WindowSystem;
use crate::workspaces::errors::WorkspaceError;
use crate::workspaces::traits::WorkspaceSettings;

const GNOME_SHELL: &str = "GNOME Shell";

/// Scope of a provisioning. Re-enables dynamic workspaces on drop if they
/// were suspended.
#[must_use = "dropping the guard immediately restores dynamic workspaces"]
pub struct WorkspaceGuard<'a> {
    restore_dynamic: Option<&'a dyn WorkspaceSettings>,
}

impl WorkspaceGuard<'_> {
    fn noop() -> Self {
        Self {
            restore_dynamic: None,
        }
    }

    /// Whether dropping this guard touches the settings.
    pub fn suspended_dynamic(&self) -> bool {
        self.restore_dynamic.is_some()
    }
}

impl Drop for WorkspaceGuard<'_> {
    fn drop(&mut self) {
        if let Some(settings) = self.restore_dynamic.take() {
            match settings.set_dynamic(true) {
                Ok(()) => info!(event = "core.workspace.dynamic_restored"),
                Err(e) => error!(event = "core.workspace.dynamic_restore_failed", error = %e),
            }
        }
    }
}

/// Ensure at least `required` workspaces exist.
///
/// No-op outside GNOME Shell or when the live count already suffices. With
/// dynamic mode on, it is suspended for the life of the returned guard; with
/// dynamic mode off, the fixed count is raised and nothing is restored later.
pub fn provision_workspaces<'a>(
    windows: &dyn WindowSystem,
    settings: &'a dyn WorkspaceSettings,
    required: usize,
) -> Result<WorkspaceGuard<'a>, WorkspaceError> {
    match windows.window_manager_name() {
        Ok(name) if name == GNOME_SHELL => {}
        Ok(name) => {
            debug!(event = "core.workspace.provision_skipped", window_manager = name);
            return Ok(WorkspaceGuard::noop());
        }
        Err(e) => {
            debug!(event = "core.workspace.provision_skipped", error = %e);
            return Ok(WorkspaceGuard::noop());
        }
    }

    let current = windows.workspace_count()?;
    if current >= required {
        debug!(
            event = "core.workspace.enough_workspaces",
            current = current,
            required = required
        );
        return Ok(WorkspaceGuard::noop());
    }

    if settings.is_dynamic()? {
        settings.set_dynamic(false)?;
        if let Err(e) = settings.set_workspace_number(required) {
            if let Err(restore_err) = settings.set_dynamic(true) {
                error!(event = "core.workspace.dynamic_restore_failed", error = %restore_err);
            }
            return Err(e);
        }
        info!(
            event = "core.workspace.provisioned",
            mode = "dynamic_suspended",
            from = current,
            to = required
        );
        return Ok(WorkspaceGuard {
            restore_dynamic: Some(settings),
        });
    }

    if settings.workspace_number()? < required {
        settings.set_workspace_number(required)?;
        info!(
            event = "core.workspace.provisioned",
            mode = "fixed",
            from = current,
            to = required
        );
    }
    Ok(WorkspaceGuard::noop())
}

/// Run `f` with enough workspaces provisioned. A provisioning failure is
/// logged and `f` runs anyway.
pub fn with_enough_workspaces<R>(
    windows: &dyn WindowSystem,
    settings: &dyn WorkspaceSettings,
    required: usize,
    f: impl FnOnce() -> R,
) -> R {
    let _guard = match provision_workspaces(windows, settings, required) {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!(event = "core.workspace.provision_failed", required = required, error = %e);
            None
        }
    };
    f()
}

/// One more than the highest saved desktop number; sticky (`-1`) windows
/// need no workspace of their own.
pub fn required_workspaces<I: IntoIterator<Item = i32>>(desktops: I) -> usize {
    desktops
        .into_iter()
        .max()
        .map(|max| (max.max(0) as usize) + 1)
        .unwrap_or(0)
}
