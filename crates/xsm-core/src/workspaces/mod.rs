//! Workspace count provisioning for restores.

pub mod errors;
pub mod gsettings;
pub mod provisioner;
pub mod traits;

pub use errors::WorkspaceError;
pub use gsettings::GSettingsWorkspaces;
pub use provisioner::{
    WorkspaceGuard, provision_workspaces, required_workspaces, with_enough_workspaces,
};
pub use traits::WorkspaceSettings;
