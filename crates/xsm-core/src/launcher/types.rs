use std::path::PathBuf;

/// An installed application as described by its `.desktop` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    /// Desktop file id without the `.desktop` suffix, e.g. `org.gnome.Terminal`.
    pub id: String,
    pub name: String,
    /// `Exec` split into arguments with field codes removed.
    pub exec: Vec<String>,
    pub path: PathBuf,
}

/// How a descriptor's application ended up being started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMethod {
    /// The saved command line, minus noise flags.
    Command,
    /// Through the snap runtime, by snap name.
    Snap { name: String },
    /// An installed application found by name.
    DesktopEntry { id: String },
}

impl std::fmt::Display for LaunchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaunchMethod::Command => write!(f, "command"),
            LaunchMethod::Snap { name } => write!(f, "snap:{}", name),
            LaunchMethod::DesktopEntry { id } => write!(f, "desktop:{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutcome {
    pub pid: u32,
    pub method: LaunchMethod,
    /// Other candidates when a name lookup was ambiguous and the first one
    /// was used.
    pub ambiguous_candidates: Vec<String>,
}
