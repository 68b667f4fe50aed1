use std::fmt;

use crate::launcher::LaunchMethod;
use crate::windows::WindowId;

/// Progress of one saved descriptor through a restore.
///
/// `Pending → Launching → {RunningAlready | Launched | Failed} → {Placed | Unplaced}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorState {
    Pending,
    Launching,
    /// A matching process was already running; its pid was adopted.
    RunningAlready,
    Launched,
    Failed,
    Placed,
    /// Gave up after the retry bound.
    Unplaced,
}

impl DescriptorState {
    /// Launched or adopted, and not yet confirmed on its desktop.
    pub fn awaits_placement(&self) -> bool {
        matches!(self, DescriptorState::RunningAlready | DescriptorState::Launched)
    }

    /// Still counted by the pending counter.
    pub fn is_open(&self) -> bool {
        !matches!(
            self,
            DescriptorState::Placed | DescriptorState::Failed | DescriptorState::Unplaced
        )
    }
}

/// What a placement pass did with one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// Found on its saved desktop, or moved there.
    Placed { moved: usize },
    /// No candidate process or window yet.
    NeedsRetry,
}

/// Progress messages streamed from the restore worker.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreEvent {
    Started {
        session_name: String,
        descriptors: usize,
    },
    NothingToRestore,
    WorkspaceProvisionFailed {
        required: usize,
        error: String,
    },
    AlreadyRunning {
        app_name: String,
        pid: u32,
    },
    Launching {
        app_name: String,
    },
    Launched {
        app_name: String,
        pid: u32,
        method: LaunchMethod,
    },
    AmbiguousMatch {
        app_name: String,
        candidates: Vec<String>,
    },
    LaunchFailed {
        app_name: String,
        error: String,
    },
    WindowMoved {
        title: String,
        window_id: WindowId,
        desktop: i32,
    },
    WindowAlreadyPlaced {
        title: String,
        window_id: WindowId,
        desktop: i32,
    },
    PassCompleted {
        pass: usize,
        pending: usize,
    },
}

impl fmt::Display for RestoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreEvent::Started {
                session_name,
                descriptors,
            } => write!(f, "Restoring session '{}' ({} windows)", session_name, descriptors),
            RestoreEvent::NothingToRestore => write!(f, "No application to restore."),
            RestoreEvent::WorkspaceProvisionFailed { required, error } => write!(
                f,
                "Could not provision {} workspaces, continuing: {}",
                required, error
            ),
            RestoreEvent::AlreadyRunning { app_name, pid } => {
                write!(f, "Already running:          [{}] (pid {})", app_name, pid)
            }
            RestoreEvent::Launching { app_name } => {
                write!(f, "Restoring application:    [{}]", app_name)
            }
            RestoreEvent::Launched {
                app_name,
                pid,
                method,
            } => write!(f, "Launched:                 [{}] (pid {}, {})", app_name, pid, method),
            RestoreEvent::AmbiguousMatch {
                app_name,
                candidates,
            } => write!(
                f,
                "Several applications match '{}' ({}), using the first",
                app_name,
                candidates.join(", ")
            ),
            RestoreEvent::LaunchFailed { app_name, error } => {
                write!(f, "Failed to restore [{}]: {}", app_name, error)
            }
            RestoreEvent::WindowMoved { title, desktop, .. } => {
                write!(f, "Moving window to desktop: [{} : {}]", title, desktop)
            }
            RestoreEvent::WindowAlreadyPlaced { title, desktop, .. } => {
                write!(f, "\"{}\" is already in workspace {}", title, desktop)
            }
            RestoreEvent::PassCompleted { pass, pending } => {
                write!(f, "Placement pass {} done, {} pending", pass, pending)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDescriptor {
    pub app_name: String,
    pub reason: String,
}

/// Summary of a finished restore or move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub session_name: String,
    /// Descriptors left after filtering.
    pub total: usize,
    pub already_running: Vec<String>,
    pub launched: Vec<String>,
    pub placed: usize,
    pub windows_moved: usize,
    pub failed: Vec<FailedDescriptor>,
    pub unplaced: Vec<String>,
    pub workspace_error: Option<String>,
}

impl RestoreReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.unplaced.is_empty()
    }
}
