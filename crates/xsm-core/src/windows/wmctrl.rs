//! `wmctrl` / `xprop` binding of [`WindowSystem`].
//!
//! Every call shells out; output parsing lives in free functions so it can
//! be tested without an X server.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::windows::errors::WindowError;
use crate::windows::traits::WindowSystem;
use crate::windows::types::{Geometry, RawWindow, WindowId};

const WMCTRL: &str = "wmctrl";
const XPROP: &str = "xprop";

const STATE_STICKY: &str = "_NET_WM_STATE_STICKY";
const STATE_ABOVE: &str = "_NET_WM_STATE_ABOVE";

#[derive(Debug, Default, Clone, Copy)]
pub struct WmctrlWindowSystem;

impl WmctrlWindowSystem {
    pub fn new() -> Self {
        Self
    }

    /// Whether both `wmctrl` and `xprop` are installed.
    pub fn is_available() -> bool {
        which::which(WMCTRL).is_ok() && which::which(XPROP).is_ok()
    }

    fn run(tool: &str, args: &[&str]) -> Result<String, WindowError> {
        let output = Command::new(tool)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => WindowError::ToolNotFound {
                    tool: tool.to_string(),
                },
                _ => WindowError::IoError { source: e },
            })?;

        if !output.status.success() {
            return Err(WindowError::CommandFailed {
                command: format!("{} {}", tool, args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Fire a command without waiting for it to finish.
    fn spawn(tool: &str, args: &[&str]) -> Result<(), WindowError> {
        Command::new(tool)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => WindowError::ToolNotFound {
                    tool: tool.to_string(),
                },
                _ => WindowError::IoError { source: e },
            })
    }

    fn net_wm_state(&self, id: WindowId) -> Result<Vec<String>, WindowError> {
        let output = Self::run(XPROP, &["-id", &id.as_hex(), "_NET_WM_STATE"])?;
        Ok(parse_net_wm_state(&output))
    }

    fn add_state(&self, id: WindowId, state: &str) -> Result<(), WindowError> {
        Self::run(
            WMCTRL,
            &["-ir", &id.as_hex(), "-b", &format!("add,{}", state)],
        )?;
        Ok(())
    }
}

impl WindowSystem for WmctrlWindowSystem {
    fn list_windows(&self) -> Result<Vec<RawWindow>, WindowError> {
        let output = Self::run(WMCTRL, &["-lpG"]).map_err(|e| match e {
            WindowError::CommandFailed { stderr, .. } => {
                WindowError::EnumerationFailed { message: stderr }
            }
            other => other,
        })?;
        Ok(parse_window_list(&output))
    }

    fn close(&self, id: WindowId) -> Result<(), WindowError> {
        Self::spawn(WMCTRL, &["-ic", &id.as_hex()])
    }

    fn move_to_desktop(&self, id: WindowId, desktop: i32) -> Result<(), WindowError> {
        Self::run(WMCTRL, &["-ir", &id.as_hex(), "-t", &desktop.to_string()])?;
        Ok(())
    }

    fn geometry(&self, id: WindowId) -> Result<Option<Geometry>, WindowError> {
        Ok(self
            .list_windows()?
            .into_iter()
            .find(|w| w.id == id)
            .map(|w| w.geometry))
    }

    fn set_geometry(&self, id: WindowId, geometry: Geometry) -> Result<(), WindowError> {
        let move_resize = format!(
            "0,{},{},{},{}",
            geometry.x, geometry.y, geometry.width, geometry.height
        );
        Self::run(WMCTRL, &["-ir", &id.as_hex(), "-e", &move_resize])?;
        Ok(())
    }

    fn is_sticky(&self, id: WindowId) -> Result<bool, WindowError> {
        Ok(self.net_wm_state(id)?.iter().any(|s| s == STATE_STICKY))
    }

    fn make_sticky(&self, id: WindowId) -> Result<(), WindowError> {
        self.add_state(id, "sticky")
    }

    fn is_above(&self, id: WindowId) -> Result<bool, WindowError> {
        Ok(self.net_wm_state(id)?.iter().any(|s| s == STATE_ABOVE))
    }

    fn make_above(&self, id: WindowId) -> Result<(), WindowError> {
        self.add_state(id, "above")
    }

    fn app_name(&self, id: WindowId) -> Result<String, WindowError> {
        let output = Self::run(XPROP, &["-id", &id.as_hex(), "WM_CLASS"])?;
        let class = parse_wm_class(&output).unwrap_or_default();
        debug!(event = "core.window.app_name_resolved", window_id = %id, app_name = class);
        Ok(class)
    }

    fn workspace_count(&self) -> Result<usize, WindowError> {
        let output = Self::run(WMCTRL, &["-d"])?;
        Ok(output.lines().filter(|l| !l.trim().is_empty()).count())
    }

    fn window_manager_name(&self) -> Result<String, WindowError> {
        let output = Self::run(WMCTRL, &["-m"])?;
        parse_window_manager_name(&output).ok_or_else(|| WindowError::UnexpectedOutput {
            command: "wmctrl -m".to_string(),
            output,
        })
    }
}

/// Split off `count` whitespace-separated fields; the rest of the line,
/// internal spacing preserved, is returned as the tail.
fn split_fields(line: &str, count: usize) -> (Vec<&str>, &str) {
    let mut fields = Vec::with_capacity(count);
    let mut rest = line.trim_start();
    while fields.len() < count && !rest.is_empty() {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        fields.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }
    (fields, rest)
}

/// Parse `wmctrl -lpG` output.
///
/// Columns: id, desktop, pid, x, y, width, height, machine, title. Lines
/// that do not parse are skipped.
pub fn parse_window_list(output: &str) -> Vec<RawWindow> {
    output
        .lines()
        .filter_map(|line| {
            let (fields, title) = split_fields(line, 8);
            if fields.len() < 8 {
                if !line.trim().is_empty() {
                    debug!(event = "core.window.list_line_skipped", line = line);
                }
                return None;
            }
            Some(RawWindow {
                id: WindowId::from_hex(fields[0])?,
                desktop: fields[1].parse().ok()?,
                pid: fields[2].parse().ok()?,
                geometry: Geometry {
                    x: fields[3].parse().ok()?,
                    y: fields[4].parse().ok()?,
                    width: fields[5].parse().ok()?,
                    height: fields[6].parse().ok()?,
                },
                machine: fields[7].to_string(),
                title: title.trim_end().to_string(),
            })
        })
        .collect()
}

/// Atoms listed in `xprop -id <id> _NET_WM_STATE` output.
pub fn parse_net_wm_state(output: &str) -> Vec<String> {
    let Some((_, atoms)) = output.split_once('=') else {
        return Vec::new();
    };
    atoms
        .split(',')
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Class part of `WM_CLASS(STRING) = "instance", "Class"`.
pub fn parse_wm_class(output: &str) -> Option<String> {
    let (_, values) = output.split_once('=')?;
    values
        .split(',')
        .map(|v| v.trim().trim_matches('"'))
        .filter(|v| !v.is_empty())
        .last()
        .map(str::to_string)
}

/// `Name:` line of `wmctrl -m`.
pub fn parse_window_manager_name(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        line.strip_prefix("Name:")
            .map(|name| name.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = "\
0x01e00003  0 2211   0    27   1920 1053 desktop Terminal - vim  notes.md
0x03a00007  2 3120   100  100  800  600  desktop
0x04200001 -1 4001   0    0    1920 27   desktop Top Bar
garbage line
";

    #[test]
    fn test_parse_window_list() {
        let windows = parse_window_list(LIST);
        assert_eq!(windows.len(), 3);

        assert_eq!(windows[0].id.as_u64(), 0x01e00003);
        assert_eq!(windows[0].desktop, 0);
        assert_eq!(windows[0].pid, 2211);
        assert_eq!(
            windows[0].geometry,
            Geometry {
                x: 0,
                y: 27,
                width: 1920,
                height: 1053
            }
        );
        assert_eq!(windows[0].machine, "desktop");
        assert_eq!(windows[0].title, "Terminal - vim  notes.md");

        // Untitled dialog
        assert_eq!(windows[1].title, "");
        assert_eq!(windows[1].desktop, 2);

        // Sticky window
        assert_eq!(windows[2].desktop, -1);
    }

    #[test]
    fn test_split_fields_keeps_title_spacing() {
        let (fields, rest) = split_fields("  a b   c  d  e", 3);
        assert_eq!(fields, vec!["a", "b", "c"]);
        assert_eq!(rest, "d  e");
    }

    #[test]
    fn test_parse_net_wm_state() {
        let output = "_NET_WM_STATE(ATOM) = _NET_WM_STATE_STICKY, _NET_WM_STATE_ABOVE\n";
        let atoms = parse_net_wm_state(output);
        assert_eq!(atoms, vec![STATE_STICKY, STATE_ABOVE]);

        assert!(parse_net_wm_state("_NET_WM_STATE:  not found.\n").is_empty());
        assert!(parse_net_wm_state("_NET_WM_STATE(ATOM) = \n").is_empty());
    }

    #[test]
    fn test_parse_wm_class() {
        let output = "WM_CLASS(STRING) = \"gnome-terminal-server\", \"Gnome-terminal\"\n";
        assert_eq!(parse_wm_class(output), Some("Gnome-terminal".to_string()));
        assert_eq!(
            parse_wm_class("WM_CLASS(STRING) = \"jetbrains-idea\"\n"),
            Some("jetbrains-idea".to_string())
        );
        assert_eq!(parse_wm_class("WM_CLASS:  not found.\n"), None);
    }

    #[test]
    fn test_parse_window_manager_name() {
        let output = "Name: GNOME Shell\nClass: N/A\nPID: N/A\n";
        assert_eq!(
            parse_window_manager_name(output),
            Some("GNOME Shell".to_string())
        );
        assert_eq!(parse_window_manager_name("nothing here"), None);
    }
}
