use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::events;
use xsm_core::session_ops;

use super::helpers::load_config_with_warning;

pub(crate) fn handle_list_command(_matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    info!(event = "cli.list_started");
    let (config, _settings) = load_config_with_warning();

    match session_ops::list_sessions(&config) {
        Ok(listing) => {
            if listing.entries.is_empty() {
                println!("No saved sessions found in {}", config.sessions_dir.display());
            } else {
                let formatter = crate::table::TableFormatter::new(&listing.entries);
                formatter.print_table(&listing.entries);
            }
            if listing.skipped > 0 {
                eprintln!(
                    "⚠️  {} session file(s) in {} could not be read",
                    listing.skipped,
                    config.sessions_dir.display()
                );
            }

            info!(event = "cli.list_completed", count = listing.entries.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to list sessions: {}", e);
            error!(event = "cli.list_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
