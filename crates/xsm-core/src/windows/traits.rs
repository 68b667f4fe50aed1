//! Windowing-system trait definition.

use crate::windows::errors::WindowError;
use crate::windows::types::{Geometry, RawWindow, WindowId};

/// Capability set the core consumes from the windowing environment.
///
/// Implementations are shared between the launch loop and the background
/// placement worker, hence `Send + Sync`.
pub trait WindowSystem: Send + Sync {
    /// Live windows, unordered.
    fn list_windows(&self) -> Result<Vec<RawWindow>, WindowError>;

    /// Ask a window to close. Returns without waiting for it to go away.
    fn close(&self, id: WindowId) -> Result<(), WindowError>;

    fn move_to_desktop(&self, id: WindowId, desktop: i32) -> Result<(), WindowError>;

    fn geometry(&self, id: WindowId) -> Result<Option<Geometry>, WindowError>;

    fn set_geometry(&self, id: WindowId, geometry: Geometry) -> Result<(), WindowError>;

    fn is_sticky(&self, id: WindowId) -> Result<bool, WindowError>;

    fn make_sticky(&self, id: WindowId) -> Result<(), WindowError>;

    fn is_above(&self, id: WindowId) -> Result<bool, WindowError>;

    fn make_above(&self, id: WindowId) -> Result<(), WindowError>;

    /// Resolved application name (the WM_CLASS class) of a window.
    fn app_name(&self, id: WindowId) -> Result<String, WindowError>;

    fn workspace_count(&self) -> Result<usize, WindowError>;

    fn window_manager_name(&self) -> Result<String, WindowError>;

    /// Tag stored with captured geometry; geometry is only re-applied by a
    /// provider with the same tag.
    fn geometry_provider(&self) -> &'static str {
        "wmctrl"
    }
}
