use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::WindowDescriptor;
use xsm_core::events;
use xsm_core::session_ops;

use super::helpers::{load_config_with_warning, session_name};

pub(crate) fn handle_detail_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = session_name(matches)?;
    let (config, _settings) = load_config_with_warning();
    info!(event = "cli.detail_started", session_name = name);

    match session_ops::get_session(&config, &name) {
        Ok(snapshot) => {
            println!("Session Name: {}", snapshot.session_name);
            println!("Created At: {}", snapshot.created_at);
            if let Some(backup_time) = &snapshot.backed_up_at {
                println!("Backed Up At: {}", backup_time);
            }
            println!("Location: {}", config.session_path(&name).display());
            println!();

            for (i, window) in snapshot.windows.iter().enumerate() {
                println!("{}.", i + 1);
                for line in describe(window) {
                    println!("{}", line);
                }
                println!();
            }

            info!(
                event = "cli.detail_completed",
                session_name = name,
                windows = snapshot.windows.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to read session '{}': {}", name, e);
            error!(event = "cli.detail_failed", session_name = name, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

/// Descriptor fields in declaration order.
fn describe(window: &WindowDescriptor) -> Vec<String> {
    let mut lines = vec![
        format!("window id: {}", window.window_id),
        format!("desktop number: {}", window.desktop_number),
        format!(
            "pid: {}",
            window.pid.map(|p| p.to_string()).unwrap_or_default()
        ),
    ];
    if let Some(position) = &window.geometry {
        lines.push(format!(
            "window position: \n    provider: {}\n    x offset: {}\n    y offset: {}\n    width: {}\n    height: {}",
            position.provider, position.x_offset, position.y_offset, position.width, position.height
        ));
    }
    lines.push(format!("client machine name: {}", window.machine));
    lines.push(format!("window title: {}", window.title));
    lines.push(format!("app name: {}", window.app_name));
    // Snap commands can carry many empty arguments.
    let command: Vec<&str> = window
        .command
        .iter()
        .map(String::as_str)
        .filter(|arg| !arg.is_empty())
        .collect();
    lines.push(format!("cmd: {}", command.join(" ")));
    if let Some(created) = &window.process_create_time {
        lines.push(format!("process create time: {}", created));
    }
    lines.push(format!("cpu percent: {}", window.cpu_percent));
    lines.push(format!("memory percent: {}", window.memory_percent));
    if let Some(state) = &window.window_state {
        lines.push(format!(
            "window state: \n    is sticky: {}\n    is above: {}",
            state.is_sticky, state.is_above
        ));
    }
    lines.push(format!("windows count: {}", window.windows_count));
    lines
}
