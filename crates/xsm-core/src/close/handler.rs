use std::thread;

use tracing::{info, warn};

use crate::close::types::{CloseFailure, CloseOptions, CloseReport, ClosedWindow, SkippedApp};
use crate::desktop::Desktop;
use crate::sessions::{CaptureOptions, SessionFilter, WindowDescriptor, get_session_details};
use crate::windows::WindowError;

/// Close the live windows selected by `filters`, one app at a time.
///
/// Apps owning more than one window are left alone unless
/// `including_apps_with_multiple_windows` is set; their windows are then
/// closed newest first. Close requests are not awaited.
pub fn close_windows(
    desktop: &Desktop,
    options: CloseOptions,
    filters: &[Option<SessionFilter>],
) -> Result<CloseReport, WindowError> {
    info!(event = "core.close.started");

    let capture = CaptureOptions {
        remove_duplicates_by_pid: false,
        enumeration_retry_delay: options.enumeration_retry_delay,
    };
    let live = get_session_details(
        desktop.windows.as_ref(),
        desktop.processes.as_ref(),
        capture,
        filters,
    )?;

    let mut report = CloseReport::default();
    for mut group in group_by_pid(live) {
        let Some(first) = group.first() else {
            continue;
        };
        // Counted after filtering: a window picked out by id is closed even
        // if its app has others.
        let windows = group.len();
        if windows > 1 && !options.including_apps_with_multiple_windows {
            info!(
                event = "core.close.multi_window_app_skipped",
                app_name = first.app_name,
                windows = windows
            );
            report.skipped.push(SkippedApp {
                pid: first.pid,
                app_name: first.app_name.clone(),
                windows,
            });
            continue;
        }

        group.sort_by(|a, b| b.window_id.cmp(&a.window_id));
        for window in group {
            match desktop.windows.close(window.window_id) {
                Ok(()) => {
                    info!(
                        event = "core.close.window_closed",
                        window_id = %window.window_id,
                        title = window.title
                    );
                    report.closed.push(ClosedWindow {
                        window_id: window.window_id,
                        app_name: window.app_name,
                        title: window.title,
                    });
                }
                Err(e) => {
                    warn!(
                        event = "core.close.window_close_failed",
                        window_id = %window.window_id,
                        error = %e
                    );
                    report.failed.push(CloseFailure {
                        window_id: window.window_id,
                        title: window.title,
                        reason: e.to_string(),
                    });
                }
            }
        }
        thread::sleep(options.interval);
    }

    info!(
        event = "core.close.completed",
        closed = report.closed.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len()
    );
    Ok(report)
}

/// Windows grouped by owning process, in order of first appearance. Windows
/// without a pid each form their own group.
fn group_by_pid(windows: Vec<WindowDescriptor>) -> Vec<Vec<WindowDescriptor>> {
    let mut groups: Vec<Vec<WindowDescriptor>> = Vec::new();
    for window in windows {
        let existing = window.pid.and_then(|pid| {
            groups
                .iter()
                .position(|g| g.first().and_then(|w| w.pid) == Some(pid))
        });
        match existing {
            Some(index) => groups[index].push(window),
            None => groups.push(vec![window]),
        }
    }
    groups
}
