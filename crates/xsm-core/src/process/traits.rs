//! Process table trait definition.

use crate::process::errors::ProcessError;
use crate::process::types::ProcessInfo;

/// Read-only view of the live process table.
///
/// A process can exit between window enumeration and inspection;
/// `inspect` reports that as [`ProcessError::NotFound`] and callers fill
/// neutral defaults instead of aborting the batch.
pub trait ProcessTable: Send + Sync {
    /// Inspect a single process.
    fn inspect(&self, pid: u32) -> Result<ProcessInfo, ProcessError>;

    /// All live processes (threads excluded).
    fn enumerate(&self) -> Vec<ProcessInfo>;

    /// Direct children of `pid`.
    fn children(&self, pid: u32) -> Vec<u32>;
}
