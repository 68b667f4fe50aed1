pub mod errors;
pub mod operations;
pub mod traits;
pub mod types;

pub use errors::ProcessError;
pub use operations::{SysinfoProcessTable, format_create_time};
pub use traits::ProcessTable;
pub use types::{Pid, ProcessInfo};
