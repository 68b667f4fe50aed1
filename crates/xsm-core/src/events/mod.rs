use tracing::{error, info};

/// Log startup with the X display and session type the tool will act on.
pub fn log_app_startup() {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        display = std::env::var("DISPLAY").unwrap_or_default(),
        session_type = std::env::var("XDG_SESSION_TYPE").unwrap_or_default()
    );
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}
