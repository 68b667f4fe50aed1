use std::time::Duration;

use clap::ArgMatches;
use tracing::{error, info};

use xsm_core::events;
use xsm_core::{
    Desktop, RestoreMode, RestoreOptions, RestoreReport, RestoreRequest, spawn_restore,
};

use super::helpers::{confirm_or_exit, load_config_with_warning, session_filters, session_name};

pub(crate) fn handle_restore_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = session_name(matches)?;
    let filters = session_filters(matches);

    confirm_or_exit(
        matches,
        &format!("Do you want to restore the session named {}?", name),
    );

    let (config, settings) = load_config_with_warning();
    let mut options = RestoreOptions::from_config(&settings.restore);
    if let Some(seconds) = matches.get_one::<u64>("restoring-interval") {
        options = options.with_restoring_interval(Duration::from_secs(*seconds));
    }
    info!(event = "cli.restore_started", session_name = name);

    let request = RestoreRequest {
        session_name: name.clone(),
        filters,
        mode: RestoreMode::Full(options),
    };
    run_restore(&name, config, settings, request, "restore")
}

/// Run a restore worker, print its progress and the final summary.
pub(crate) fn run_restore(
    name: &str,
    config: xsm_core::Config,
    settings: xsm_core::XsmConfig,
    request: RestoreRequest,
    operation: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = spawn_restore(Desktop::system(), config, settings, request)?;
    for event in handle.events() {
        println!("{}", event);
    }

    match handle.wait() {
        Ok(report) => {
            print_summary(&report);
            info!(
                event = "cli.restore_completed",
                operation = operation,
                session_name = name,
                placed = report.placed,
                failed = report.failed.len(),
                unplaced = report.unplaced.len()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to {} session '{}': {}", operation, name, e);
            error!(
                event = "cli.restore_failed",
                operation = operation,
                session_name = name,
                error = %e
            );
            events::log_app_error(&e);
            Err(e.into())
        }
    }
}

fn print_summary(report: &RestoreReport) {
    println!();
    if let Some(error) = &report.workspace_error {
        println!("⚠️  Workspaces were not provisioned: {}", error);
    }
    println!(
        "Done! {}/{} windows in place, {} moved, {} launched, {} already running.",
        report.placed,
        report.total,
        report.windows_moved,
        report.launched.len(),
        report.already_running.len()
    );
    if !report.failed.is_empty() {
        println!("Failed to restore:");
        for failed in &report.failed {
            println!("  {}: {}", failed.app_name, failed.reason);
        }
    }
    if !report.unplaced.is_empty() {
        println!("Could not place:");
        for unplaced in &report.unplaced {
            println!("  {}", unplaced);
        }
    }
}
