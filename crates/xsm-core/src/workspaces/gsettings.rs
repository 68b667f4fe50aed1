//! `gsettings` binding of [`WorkspaceSettings`] for GNOME.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::workspaces::errors::WorkspaceError;
use crate::workspaces::traits::WorkspaceSettings;

const GSETTINGS: &str = "gsettings";
const DYNAMIC_SCHEMA: &str = "org.gnome.mutter";
const DYNAMIC_KEY: &str = "dynamic-workspaces";
const NUMBER_SCHEMA: &str = "org.gnome.desktop.wm.preferences";
const NUMBER_KEY: &str = "num-workspaces";

#[derive(Debug, Default, Clone, Copy)]
pub struct GSettingsWorkspaces;

impl GSettingsWorkspaces {
    pub fn new() -> Self {
        Self
    }

    fn run(args: &[&str]) -> Result<String, WorkspaceError> {
        debug!(event = "core.workspace.gsettings_call", args = ?args);
        let output = Command::new(GSETTINGS)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => WorkspaceError::ToolNotFound {
                    tool: GSETTINGS.to_string(),
                },
                _ => WorkspaceError::IoError { source: e },
            })?;

        if !output.status.success() {
            return Err(WorkspaceError::CommandFailed {
                command: format!("{} {}", GSETTINGS, args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl WorkspaceSettings for GSettingsWorkspaces {
    fn is_dynamic(&self) -> Result<bool, WorkspaceError> {
        let value = Self::run(&["get", DYNAMIC_SCHEMA, DYNAMIC_KEY])?;
        parse_bool(DYNAMIC_KEY, &value)
    }

    fn set_dynamic(&self, dynamic: bool) -> Result<(), WorkspaceError> {
        let value = if dynamic { "true" } else { "false" };
        Self::run(&["set", DYNAMIC_SCHEMA, DYNAMIC_KEY, value])?;
        Ok(())
    }

    fn workspace_number(&self) -> Result<usize, WorkspaceError> {
        let value = Self::run(&["get", NUMBER_SCHEMA, NUMBER_KEY])?;
        parse_number(NUMBER_KEY, &value)
    }

    fn set_workspace_number(&self, count: usize) -> Result<(), WorkspaceError> {
        Self::run(&["set", NUMBER_SCHEMA, NUMBER_KEY, &count.to_string()])?;
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, WorkspaceError> {
    match value.lines().next().map(str::trim) {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        _ => Err(WorkspaceError::UnexpectedValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Accepts both `4` and the typed form `int32 4`.
fn parse_number(key: &str, value: &str) -> Result<usize, WorkspaceError> {
    value
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().last())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| WorkspaceError::UnexpectedValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(DYNAMIC_KEY, "true\n").unwrap());
        assert!(!parse_bool(DYNAMIC_KEY, "false").unwrap());
        assert!(parse_bool(DYNAMIC_KEY, "maybe").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(NUMBER_KEY, "4").unwrap(), 4);
        assert_eq!(parse_number(NUMBER_KEY, "int32 6\n").unwrap(), 6);
        assert!(parse_number(NUMBER_KEY, "").is_err());
    }
}
