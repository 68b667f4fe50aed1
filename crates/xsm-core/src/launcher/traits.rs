use crate::launcher::errors::LaunchError;
use crate::launcher::types::DesktopEntry;

/// Process launching primitives. Fallback policy lives with the caller.
pub trait AppLauncher: Send + Sync {
    /// Start `command` detached and return its pid. A missing executable is
    /// [`LaunchError::NotFound`].
    fn spawn(&self, command: &[String]) -> Result<u32, LaunchError>;

    /// Start a snap by name. `Ok(None)` when the snap runtime is unavailable.
    fn launch_snap(&self, name: &str) -> Result<Option<u32>, LaunchError>;

    /// Visible installed applications.
    fn installed_apps(&self) -> Vec<DesktopEntry>;

    fn launch_entry(&self, entry: &DesktopEntry) -> Result<u32, LaunchError> {
        self.spawn(&entry.exec)
    }
}
