use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::windows::errors::WindowError;
use crate::windows::traits::WindowSystem;
use crate::windows::types::RawWindow;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Live windows sorted by desktop number, retrying once on a transient
/// enumeration failure.
pub fn list_windows(windows: &dyn WindowSystem) -> Result<Vec<RawWindow>, WindowError> {
    list_windows_with_retry(windows, DEFAULT_RETRY_DELAY)
}

/// Windows can vanish between the list call and the per-window queries the
/// display server runs for it, so an [`WindowError::EnumerationFailed`] is
/// retried once after `delay`. Any other error is returned as is.
pub fn list_windows_with_retry(
    windows: &dyn WindowSystem,
    delay: Duration,
) -> Result<Vec<RawWindow>, WindowError> {
    let mut list = match windows.list_windows() {
        Ok(list) => list,
        Err(WindowError::EnumerationFailed { message }) => {
            warn!(
                event = "core.window.enumeration_retry",
                error = message,
                delay_ms = delay.as_millis() as u64
            );
            thread::sleep(delay);
            windows.list_windows()?
        }
        Err(e) => return Err(e),
    };

    list.sort_by_key(|w| w.desktop);
    debug!(event = "core.window.enumeration_completed", count = list.len());
    Ok(list)
}
