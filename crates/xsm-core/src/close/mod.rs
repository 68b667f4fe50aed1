//! Closing live windows selected by the filter chain.

pub mod handler;
pub mod types;

pub use handler::close_windows;
pub use types::{CloseFailure, CloseOptions, CloseReport, ClosedWindow, SkippedApp};
