//! [`AppLauncher`] backed by real process spawning.

use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info, warn};

use crate::launcher::desktop::{application_dirs, load_catalog, parse_desktop_entry};
use crate::launcher::errors::LaunchError;
use crate::launcher::snap::{SNAP_DESKTOP_DIR, snap_desktop_files};
use crate::launcher::traits::AppLauncher;
use crate::launcher::types::DesktopEntry;

#[derive(Debug, Clone)]
pub struct SystemLauncher {
    application_dirs: Vec<PathBuf>,
    snap_desktop_dir: PathBuf,
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self {
            application_dirs: application_dirs(),
            snap_desktop_dir: PathBuf::from(SNAP_DESKTOP_DIR),
        }
    }
}

impl SystemLauncher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AppLauncher for SystemLauncher {
    fn spawn(&self, command: &[String]) -> Result<u32, LaunchError> {
        let Some((program, args)) = command.split_first() else {
            return Err(LaunchError::EmptyCommand);
        };

        // Own process group and no inherited stdio, so the app outlives us
        // and our terminal is left alone.
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LaunchError::NotFound {
                    program: program.clone(),
                },
                _ => LaunchError::SpawnFailed {
                    program: program.clone(),
                    message: e.to_string(),
                },
            })?;

        let pid = child.id();
        debug!(event = "core.launcher.spawned", program = program, pid = pid);

        // Reap the child whenever it exits.
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(pid)
    }

    fn launch_snap(&self, name: &str) -> Result<Option<u32>, LaunchError> {
        let files = snap_desktop_files(&self.snap_desktop_dir, name);
        if files.len() > 1 {
            warn!(
                event = "core.launcher.snap_multiple_desktop_files",
                snap = name,
                count = files.len(),
                using = %files[0].display()
            );
        }

        for path in &files {
            let Ok(content) = std::fs::read_to_string(path) else {
                continue;
            };
            let id = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            if let Some(entry) = parse_desktop_entry(&content, &id, path) {
                info!(event = "core.launcher.snap_desktop_launch", snap = name, desktop_file = %path.display());
                return self.launch_entry(&entry).map(Some);
            }
        }

        if which::which("snap").is_err() {
            debug!(event = "core.launcher.snap_unavailable", snap = name);
            return Ok(None);
        }

        info!(event = "core.launcher.snap_run", snap = name);
        self.spawn(&["snap".to_string(), "run".to_string(), name.to_string()])
            .map(Some)
    }

    fn installed_apps(&self) -> Vec<DesktopEntry> {
        load_catalog(&self.application_dirs)
    }
}
