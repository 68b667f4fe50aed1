use std::time::Duration;

use crate::config::XsmConfig;
use crate::windows::WindowId;

#[derive(Debug, Clone, Copy)]
pub struct CloseOptions {
    /// Also close apps that own several windows.
    pub including_apps_with_multiple_windows: bool,
    /// Pause after each closed app.
    pub interval: Duration,
    pub enumeration_retry_delay: Duration,
}

impl Default for CloseOptions {
    fn default() -> Self {
        Self {
            including_apps_with_multiple_windows: false,
            interval: Duration::from_millis(250),
            enumeration_retry_delay: Duration::from_millis(250),
        }
    }
}

impl CloseOptions {
    pub fn from_config(settings: &XsmConfig, including_apps_with_multiple_windows: bool) -> Self {
        Self {
            including_apps_with_multiple_windows,
            interval: settings.close.interval(),
            enumeration_retry_delay: settings.restore.enumeration_retry_delay(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedWindow {
    pub window_id: WindowId,
    pub app_name: String,
    pub title: String,
}

/// An app left open because it owns several windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedApp {
    pub pid: Option<u32>,
    pub app_name: String,
    pub windows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFailure {
    pub window_id: WindowId,
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloseReport {
    pub closed: Vec<ClosedWindow>,
    pub skipped: Vec<SkippedApp>,
    pub failed: Vec<CloseFailure>,
}
