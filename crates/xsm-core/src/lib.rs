//! xsm-core: Core library for saving and restoring X11 desktop sessions
//!
//! A session is the set of open application windows, with their desktops,
//! geometry and command lines. It is captured to a file and later
//! reconciled against the live desktop: missing apps are launched and every
//! window is put back on its saved desktop.
//!
//! # Main Entry Points
//!
//! - [`sessions`] - Capture, save, list and load sessions
//! - [`restore`] - Relaunch and place windows of a saved session
//! - [`close`] - Close live windows
//! - [`config`] - Configuration management

pub mod close;
pub mod config;
pub mod desktop;
pub mod errors;
pub mod events;
pub mod launcher;
pub mod logging;
pub mod process;
pub mod restore;
pub mod sessions;
pub mod windows;
pub mod workspaces;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at crate root for convenience
pub use close::{CloseOptions, CloseReport};
pub use config::{Config, XsmConfig};
pub use desktop::Desktop;
pub use errors::XsmError;
pub use restore::{
    RestoreEvent, RestoreHandle, RestoreMode, RestoreOptions, RestoreReport, RestoreRequest,
    spawn_restore,
};
pub use sessions::{
    DEFAULT_SESSION_NAME, SessionFileEntry, SessionFilter, SessionSnapshot, WindowDescriptor,
};

// Re-export handler modules as the primary API
pub use close::handler as close_ops;
pub use sessions::handler as session_ops;

// Re-export logging initialization
pub use logging::init_logging;
