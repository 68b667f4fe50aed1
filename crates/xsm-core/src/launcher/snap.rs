//! Snap package detection.
//!
//! A snap's binaries live under `/snap/<name>/<revision>/...`, so the saved
//! command path of a snap app rarely survives a refresh. The snap name is
//! stable and is what we compare and relaunch by.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Where snapd exports the desktop files of installed snaps.
pub const SNAP_DESKTOP_DIR: &str = "/var/lib/snapd/desktop/applications";

static SNAP_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[/\\]{1,2})snap[/\\]{1,2}([\w:\-]+)[/\\]{1,2}\d+")
        .expect("snap path pattern is valid")
});

/// Snap name encoded in a command path, e.g. `spotify` for
/// `/snap/spotify/58/usr/share/spotify/spotify`.
pub fn snap_app_name(arg: &str) -> Option<&str> {
    SNAP_PATH
        .captures(arg)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Desktop files snapd exported for `name` (`<name>_*.desktop`), sorted.
pub fn snap_desktop_files(dir: &Path, name: &str) -> Vec<PathBuf> {
    let prefix = format!("{}_", name);
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(".desktop"))
        })
        .collect();
    files.sort();
    files.dedup();
    files
}
