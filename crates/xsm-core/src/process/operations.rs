use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local};
use sysinfo::{Pid as SysinfoPid, Process, ProcessesToUpdate, System};
use tracing::debug;

use crate::process::errors::ProcessError;
use crate::process::traits::ProcessTable;
use crate::process::types::{Pid, ProcessInfo};

/// Format a process start time (seconds since epoch) in local time.
///
/// Returns `None` for a zero or out-of-range timestamp.
pub fn format_create_time(start_time: u64) -> Option<String> {
    if start_time == 0 {
        return None;
    }
    let utc = DateTime::from_timestamp(i64::try_from(start_time).ok()?, 0)?;
    Some(
        utc.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    )
}

/// [`ProcessTable`] backed by `sysinfo`.
///
/// Holds one `System` for its whole lifetime; refreshing a shared
/// instance keeps memory flat across the many passes of a restore.
pub struct SysinfoProcessTable {
    system: Mutex<System>,
}

impl Default for SysinfoProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, System> {
        self.system.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn to_info(pid: SysinfoPid, process: &Process, total_memory: u64) -> ProcessInfo {
        let command: Vec<String> = process
            .cmd()
            .iter()
            .map(|s| s.to_string_lossy().to_string())
            .collect();

        let memory_percent = if total_memory > 0 {
            (process.memory() as f64 / total_memory as f64 * 100.0) as f32
        } else {
            0.0
        };

        ProcessInfo {
            pid: Pid::from_raw(pid.as_u32()),
            name: process.name().to_string_lossy().to_string(),
            command,
            start_time: process.start_time(),
            cpu_percent: process.cpu_usage(),
            memory_percent,
        }
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn inspect(&self, pid: u32) -> Result<ProcessInfo, ProcessError> {
        let pid_obj = SysinfoPid::from_u32(pid);
        let mut system = self.lock();
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid_obj]), true);

        let total_memory = system.total_memory();
        match system.process(pid_obj) {
            Some(process) => Ok(Self::to_info(pid_obj, process, total_memory)),
            None => {
                debug!(event = "core.process.inspect_not_found", pid = pid);
                Err(ProcessError::NotFound { pid })
            }
        }
    }

    fn enumerate(&self) -> Vec<ProcessInfo> {
        let mut system = self.lock();
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let total_memory = system.total_memory();
        system
            .processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .map(|(pid, process)| Self::to_info(*pid, process, total_memory))
            .collect()
    }

    fn children(&self, pid: u32) -> Vec<u32> {
        let parent = SysinfoPid::from_u32(pid);
        let mut system = self.lock();
        system.refresh_processes(ProcessesToUpdate::All, true);

        system
            .processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .filter(|(_, process)| process.parent() == Some(parent))
            .map(|(child, _)| child.as_u32())
            .collect()
    }
}
