pub mod capture;
pub mod errors;
pub mod filter;
pub mod handler;
pub mod persistence;
pub mod types;

pub use capture::{CaptureOptions, get_session_details};
pub use errors::SessionError;
pub use filter::{SessionFilter, apply_filters};
pub use handler::{get_session, list_sessions, save_session};
pub use types::{
    DEFAULT_SESSION_NAME, SaveOutcome, SessionFileEntry, SessionList, SessionSnapshot,
    WindowDescriptor, WindowPosition, WindowState,
};
