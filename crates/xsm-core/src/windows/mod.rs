//! Live window enumeration and the windowing-system capability set.

pub mod enumerator;
pub mod errors;
pub mod traits;
pub mod types;
pub mod wmctrl;

pub use enumerator::{list_windows, list_windows_with_retry};
pub use errors::WindowError;
pub use traits::WindowSystem;
pub use types::{Geometry, RawWindow, WindowId};
pub use wmctrl::WmctrlWindowSystem;
