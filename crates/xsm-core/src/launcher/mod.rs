//! Application launching: detached spawning, snap packages and the
//! installed application catalog.

pub mod desktop;
pub mod errors;
pub mod snap;
pub mod system;
pub mod traits;
pub mod types;

pub use desktop::{resolve_by_name, search_apps_fuzzily};
pub use errors::LaunchError;
pub use snap::snap_app_name;
pub use system::SystemLauncher;
pub use traits::AppLauncher;
pub use types::{DesktopEntry, LaunchMethod, LaunchOutcome};
