use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::Desktop;
use xsm_core::events;
use xsm_core::session_ops;

use super::helpers::{confirm_or_exit, load_config_with_warning, session_filters, session_name};

pub(crate) fn handle_save_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let name = session_name(matches)?;
    let filters = session_filters(matches);

    confirm_or_exit(matches, "Do you want to save the current session?");
    info!(event = "cli.save_started", session_name = name);

    let (config, settings) = load_config_with_warning();
    match session_ops::save_session(&Desktop::system(), &config, &settings, &name, &filters) {
        Ok(outcome) => {
            if let Some(backup) = &outcome.backup_path {
                println!("Backed up the previous session to {}", backup.display());
            }
            println!(
                "✅ Saved {} windows to {}",
                outcome.windows_saved,
                outcome.path.display()
            );
            info!(
                event = "cli.save_completed",
                session_name = name,
                windows = outcome.windows_saved
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to save session '{}': {}", name, e);
            error!(event = "cli.save_failed", session_name = name, error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
