//! Capture of the live session: enumerate windows, then fill in what the
//! process table and window queries know about each one.

use std::collections::HashMap;
use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, warn};

use crate::process::{ProcessError, ProcessTable, format_create_time};
use crate::sessions::filter::{SessionFilter, apply_filters};
use crate::sessions::types::{WindowDescriptor, WindowPosition, WindowState};
use crate::windows::{WindowError, WindowSystem, list_windows_with_retry};

#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Keep only the first window of each process.
    pub remove_duplicates_by_pid: bool,
    pub enumeration_retry_delay: Duration,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            remove_duplicates_by_pid: false,
            enumeration_retry_delay: Duration::from_millis(250),
        }
    }
}

/// Live windows as fully populated descriptors, sorted by desktop and
/// narrowed by `filters`.
///
/// A process that exits between enumeration and inspection does not fail
/// the capture; its descriptor keeps neutral defaults.
pub fn get_session_details(
    windows: &dyn WindowSystem,
    processes: &dyn ProcessTable,
    options: CaptureOptions,
    filters: &[Option<SessionFilter>],
) -> Result<Vec<WindowDescriptor>, WindowError> {
    let raw_windows = list_windows_with_retry(windows, options.enumeration_retry_delay)?;

    let mut windows_per_pid: HashMap<u32, usize> = HashMap::new();
    for raw in &raw_windows {
        *windows_per_pid.entry(raw.pid).or_default() += 1;
    }

    let mut seen_pids = HashSet::new();
    let mut descriptors = Vec::with_capacity(raw_windows.len());
    for raw in &raw_windows {
        if options.remove_duplicates_by_pid && !seen_pids.insert(raw.pid) {
            continue;
        }

        let mut descriptor = WindowDescriptor::from_raw(raw);
        descriptor.windows_count = windows_per_pid.get(&raw.pid).copied().unwrap_or(1);
        fill_details(windows, processes, &mut descriptor, raw.geometry);
        descriptors.push(descriptor);
    }

    let descriptors = apply_filters(filters, descriptors);
    debug!(
        event = "core.session.capture_completed",
        windows = raw_windows.len(),
        captured = descriptors.len()
    );
    Ok(descriptors)
}

fn fill_details(
    windows: &dyn WindowSystem,
    processes: &dyn ProcessTable,
    descriptor: &mut WindowDescriptor,
    geometry: crate::windows::Geometry,
) {
    let pid = descriptor.pid.unwrap_or_default();
    match processes.inspect(pid) {
        Ok(info) => {
            descriptor.command = info.command;
            descriptor.process_create_time = format_create_time(info.start_time);
            descriptor.cpu_percent = info.cpu_percent;
            descriptor.memory_percent = info.memory_percent;
        }
        Err(ProcessError::NotFound { .. }) => {
            debug!(
                event = "core.session.capture_process_gone",
                pid = pid,
                window_id = %descriptor.window_id
            );
            return;
        }
        Err(e) => {
            warn!(
                event = "core.session.capture_process_failed",
                pid = pid,
                error = %e
            );
            return;
        }
    }

    let id = descriptor.window_id;
    descriptor.app_name = windows.app_name(id).unwrap_or_else(|e| {
        debug!(event = "core.session.capture_app_name_failed", window_id = %id, error = %e);
        String::new()
    });

    descriptor.window_state = match (windows.is_sticky(id), windows.is_above(id)) {
        (Ok(is_sticky), Ok(is_above)) => Some(WindowState { is_sticky, is_above }),
        (Err(e), _) | (_, Err(e)) => {
            debug!(event = "core.session.capture_state_failed", window_id = %id, error = %e);
            None
        }
    };

    descriptor.geometry = Some(WindowPosition::new(windows.geometry_provider(), geometry));
}
