//! Restores run on their own thread and stream [`RestoreEvent`]s back to
//! the caller; the final [`RestoreReport`] is collected with
//! [`RestoreHandle::wait`].

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use tracing::{error, info};

use crate::config::{Config, XsmConfig};
use crate::desktop::Desktop;
use crate::restore::context::EventSink;
use crate::restore::engine::{RestoreOptions, move_session, restore_session};
use crate::restore::errors::RestoreError;
use crate::restore::types::{RestoreEvent, RestoreReport};
use crate::sessions::SessionFilter;

#[derive(Debug, Clone, Copy)]
pub enum RestoreMode {
    /// Launch what is missing, then place.
    Full(RestoreOptions),
    /// Place windows of running apps only.
    MoveOnly,
}

#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub session_name: String,
    pub filters: Vec<Option<SessionFilter>>,
    pub mode: RestoreMode,
}

pub struct RestoreHandle {
    events: Receiver<RestoreEvent>,
    handle: JoinHandle<Result<RestoreReport, RestoreError>>,
}

impl RestoreHandle {
    /// Progress events. The channel closes when the worker finishes.
    pub fn events(&self) -> &Receiver<RestoreEvent> {
        &self.events
    }

    pub fn wait(self) -> Result<RestoreReport, RestoreError> {
        self.handle.join().unwrap_or_else(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "restore worker panicked".to_string());
            error!(event = "core.restore.worker_panicked", message = message);
            Err(RestoreError::WorkerFailed { message })
        })
    }
}

/// Start a restore or move on a dedicated thread.
pub fn spawn_restore(
    desktop: Desktop,
    config: Config,
    settings: XsmConfig,
    request: RestoreRequest,
) -> Result<RestoreHandle, RestoreError> {
    let (tx, rx) = mpsc::channel();

    let handle = thread::Builder::new()
        .name("xsm-restore".to_string())
        .spawn(move || {
            info!(
                event = "core.restore.worker_started",
                session_name = request.session_name
            );
            let events = EventSink::new(tx);
            match request.mode {
                RestoreMode::Full(options) => restore_session(
                    &desktop,
                    &config,
                    &settings,
                    options,
                    &request.session_name,
                    &request.filters,
                    events,
                ),
                RestoreMode::MoveOnly => move_session(
                    &desktop,
                    &config,
                    &settings,
                    &request.session_name,
                    &request.filters,
                    events,
                ),
            }
        })
        .map_err(|e| RestoreError::WorkerFailed {
            message: e.to_string(),
        })?;

    Ok(RestoreHandle { events: rx, handle })
}
