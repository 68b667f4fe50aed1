//! Reconciliation of saved sessions against the live desktop.

pub mod context;
pub mod engine;
pub mod errors;
pub mod launch;
pub mod matching;
pub mod placement;
pub mod types;
pub mod worker;

pub use context::{EventSink, RestoreJob};
pub use engine::{RestoreEngine, RestoreOptions, move_session, restore_session};
pub use errors::RestoreError;
pub use matching::{TitleMatcher, is_same_command};
pub use types::{DescriptorState, FailedDescriptor, RestoreEvent, RestoreReport};
pub use worker::{RestoreHandle, RestoreMode, RestoreRequest, spawn_restore};
