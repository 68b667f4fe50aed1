use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::close_ops;
use xsm_core::events;
use xsm_core::sessions::SessionFilter;
use xsm_core::{CloseOptions, Desktop};

use super::helpers::{confirm_or_exit, load_config_with_warning, session_filters, tokens};

pub(crate) fn handle_close_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    // Positional targets narrow the selection before -i and -x.
    let mut filters = vec![tokens(matches, "targets").map(|t| SessionFilter::include(&t))];
    filters.extend(session_filters(matches));
    let including_multi = matches.get_flag("including-apps-with-multiple-windows");

    confirm_or_exit(matches, "Do you want to close windows?");

    let (_config, settings) = load_config_with_warning();
    let options = CloseOptions::from_config(&settings, including_multi);
    info!(
        event = "cli.close_started",
        including_apps_with_multiple_windows = including_multi
    );

    match close_ops::close_windows(&Desktop::system(), options, &filters) {
        Ok(report) => {
            for closed in &report.closed {
                println!("Closed: [{} : {}]", closed.app_name, closed.title);
            }
            for skipped in &report.skipped {
                println!(
                    "Skipped: [{}] has {} windows (use --including-apps-with-multiple-windows)",
                    skipped.app_name, skipped.windows
                );
            }
            for failed in &report.failed {
                eprintln!("⚠️  Could not close '{}': {}", failed.title, failed.reason);
            }
            println!("Done!");
            info!(
                event = "cli.close_completed",
                closed = report.closed.len(),
                skipped = report.skipped.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to close windows: {}", e);
            error!(event = "cli.close_failed", error = %e);
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}
