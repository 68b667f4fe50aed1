//! Starting the application behind a saved descriptor.
//!
//! The saved command line is tried first. When its executable is gone, a
//! snap path is relaunched by snap name, and finally the installed
//! application catalog is searched by the saved app name.

use std::sync::OnceLock;

use tracing::{debug, info, warn};

use crate::launcher::{
    AppLauncher, DesktopEntry, LaunchError, LaunchMethod, LaunchOutcome, resolve_by_name,
    snap_app_name,
};
use crate::restore::matching::strip_noise_flags;
use crate::sessions::WindowDescriptor;

pub struct LaunchChain<'a> {
    launcher: &'a dyn AppLauncher,
    catalog: OnceLock<Vec<DesktopEntry>>,
}

impl<'a> LaunchChain<'a> {
    pub fn new(launcher: &'a dyn AppLauncher) -> Self {
        Self {
            launcher,
            catalog: OnceLock::new(),
        }
    }

    /// Installed applications, read once per restore.
    fn catalog(&self) -> &[DesktopEntry] {
        self.catalog.get_or_init(|| self.launcher.installed_apps())
    }

    pub fn launch(&self, descriptor: &WindowDescriptor) -> Result<LaunchOutcome, LaunchError> {
        let command = strip_noise_flags(&descriptor.command);
        if command.is_empty() {
            debug!(
                event = "core.restore.launch_by_name",
                app_name = descriptor.app_name,
                reason = "empty_command"
            );
            return self.launch_by_name(&descriptor.app_name);
        }

        let not_found = match self.launcher.spawn(&command) {
            Ok(pid) => {
                return Ok(LaunchOutcome {
                    pid,
                    method: LaunchMethod::Command,
                    ambiguous_candidates: Vec::new(),
                });
            }
            Err(e @ LaunchError::NotFound { .. }) => e,
            Err(e) => return Err(e),
        };

        if let Some(name) = snap_app_name(&command[0]) {
            match self.launcher.launch_snap(name) {
                Ok(Some(pid)) => {
                    return Ok(LaunchOutcome {
                        pid,
                        method: LaunchMethod::Snap {
                            name: name.to_string(),
                        },
                        ambiguous_candidates: Vec::new(),
                    });
                }
                Ok(None) => debug!(event = "core.restore.snap_unavailable", snap = name),
                Err(e) => warn!(event = "core.restore.snap_launch_failed", snap = name, error = %e),
            }
        }

        match self.launch_by_name(&descriptor.app_name) {
            Err(LaunchError::NoMatch { .. }) | Err(LaunchError::EmptyCommand) => Err(not_found),
            other => other,
        }
    }

    /// Launch an installed application whose id or name contains
    /// `app_name`. An ambiguous match launches the first candidate and
    /// reports the rest.
    fn launch_by_name(&self, app_name: &str) -> Result<LaunchOutcome, LaunchError> {
        if app_name.trim().is_empty() {
            return Err(LaunchError::EmptyCommand);
        }

        let catalog = self.catalog();
        let (first, ambiguous_candidates) = match resolve_by_name(catalog, app_name) {
            Ok(entry) => (entry, Vec::new()),
            Err(LaunchError::MoreThanOneResultFound {
                app_name: name,
                candidates,
            }) => {
                warn!(
                    event = "core.restore.ambiguous_app_name",
                    app_name = name,
                    candidates = candidates.join(", ")
                );
                let entry = candidates
                    .first()
                    .and_then(|id| catalog.iter().find(|entry| &entry.id == id))
                    .ok_or_else(|| LaunchError::MoreThanOneResultFound {
                        app_name: name.clone(),
                        candidates: candidates.clone(),
                    })?;
                (entry, candidates)
            }
            Err(e) => return Err(e),
        };

        let pid = self.launcher.launch_entry(first)?;
        info!(
            event = "core.restore.launched_by_name",
            app_name = app_name,
            desktop_id = first.id,
            pid = pid
        );
        Ok(LaunchOutcome {
            pid,
            method: LaunchMethod::DesktopEntry {
                id: first.id.clone(),
            },
            ambiguous_candidates,
        })
    }
}
