use serde::{Deserialize, Serialize};

/// Platform-safe process ID wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(u32);

impl Pid {
    pub fn new(pid: u32) -> Result<Self, crate::process::errors::ProcessError> {
        if pid == 0 {
            return Err(crate::process::errors::ProcessError::InvalidPid { pid });
        }
        Ok(Self(pid))
    }

    pub fn from_raw(pid: u32) -> Self {
        Self(pid)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Pid {
    fn from(pid: u32) -> Self {
        Self(pid)
    }
}

/// Snapshot of a live process as seen by the process table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    pub pid: Pid,
    pub name: String,
    /// Full argument vector, `argv[0]` first. Empty when unreadable.
    pub command: Vec<String>,
    /// Seconds since the Unix epoch.
    pub start_time: u64,
    pub cpu_percent: f32,
    /// Resident memory relative to total system memory.
    pub memory_percent: f32,
}

impl ProcessInfo {
    pub fn new(pid: u32, command: Vec<String>) -> Self {
        let name = command
            .first()
            .map(|c| c.rsplit('/').next().unwrap_or(c).to_string())
            .unwrap_or_default();
        Self {
            pid: Pid::from_raw(pid),
            name,
            command,
            start_time: 0,
            cpu_percent: 0.0,
            memory_percent: 0.0,
        }
    }
}
