use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::windows::{Geometry, WindowId};

/// Default name used when a command is given no session name.
pub const DEFAULT_SESSION_NAME: &str = "xsession-default";

/// Position and size captured for a window, tagged with the provider that
/// measured it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub provider: String,
    pub x_offset: i32,
    pub y_offset: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowPosition {
    pub fn new(provider: &str, geometry: Geometry) -> Self {
        Self {
            provider: provider.to_string(),
            x_offset: geometry.x,
            y_offset: geometry.y,
            width: geometry.width,
            height: geometry.height,
        }
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            x: self.x_offset,
            y: self.y_offset,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowState {
    /// Shown on every workspace.
    #[serde(default)]
    pub is_sticky: bool,
    /// Kept above other windows.
    #[serde(default)]
    pub is_above: bool,
}

/// One saved or observed window/application pairing.
///
/// A process may own several windows, so `pid` is not unique across a
/// session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDescriptor {
    pub window_id: WindowId,

    #[serde(default)]
    pub desktop_number: i32,

    /// Stale once loaded from disk; cleared at the start of a restore.
    #[serde(default)]
    pub pid: Option<u32>,

    #[serde(default, rename = "window_position")]
    pub geometry: Option<WindowPosition>,

    #[serde(default, rename = "client_machine_name")]
    pub machine: String,

    #[serde(default, rename = "window_title")]
    pub title: String,

    #[serde(default)]
    pub app_name: String,

    /// Full argument vector. May carry noise flags and repeated tokens.
    #[serde(default, rename = "cmd")]
    pub command: Vec<String>,

    #[serde(default)]
    pub process_create_time: Option<String>,

    #[serde(default)]
    pub cpu_percent: f32,

    #[serde(default)]
    pub memory_percent: f32,

    #[serde(default)]
    pub window_state: Option<WindowState>,

    /// Live windows sharing this pid at capture time.
    #[serde(default = "default_windows_count")]
    pub windows_count: usize,
}

fn default_windows_count() -> usize {
    1
}

impl WindowDescriptor {
    /// A descriptor carrying only what the window list reports.
    pub fn from_raw(raw: &crate::windows::RawWindow) -> Self {
        Self {
            window_id: raw.id,
            desktop_number: raw.desktop,
            pid: Some(raw.pid),
            geometry: None,
            machine: raw.machine.clone(),
            title: raw.title.clone(),
            app_name: String::new(),
            command: Vec::new(),
            process_create_time: None,
            cpu_percent: 0.0,
            memory_percent: 0.0,
            window_state: None,
            windows_count: 1,
        }
    }

    /// Title if present, else the app name.
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.app_name
        } else {
            &self.title
        }
    }
}

/// A named, timestamped, ordered collection of window descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_name: String,

    #[serde(default, rename = "session_create_time")]
    pub created_at: String,

    /// Set only on copies kept in the backup store.
    #[serde(default, rename = "backup_time", skip_serializing_if = "Option::is_none")]
    pub backed_up_at: Option<String>,

    #[serde(default, rename = "x_session_config_objects")]
    pub windows: Vec<WindowDescriptor>,
}

impl SessionSnapshot {
    pub fn new(session_name: &str, windows: Vec<WindowDescriptor>) -> Self {
        Self {
            session_name: session_name.to_string(),
            created_at: String::new(),
            backed_up_at: None,
            windows,
        }
    }
}

/// Where a save landed, and the backup it displaced if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub windows_saved: usize,
}

/// One row of the session listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFileEntry {
    pub name: String,
    pub path: PathBuf,
    pub created_at: String,
    pub windows_count: usize,
}

/// Readable session files, oldest first, and how many files were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionList {
    pub entries: Vec<SessionFileEntry>,
    pub skipped: usize,
}
