use clap::ArgMatches;
use tracing::info;

use xsm_core::{RestoreMode, RestoreRequest};

use super::helpers::{load_config_with_warning, session_filters, session_name};
use super::restore::run_restore;

pub(crate) fn handle_move_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let name = session_name(matches)?;
    let (config, settings) = load_config_with_warning();
    info!(event = "cli.move_started", session_name = name);

    let request = RestoreRequest {
        session_name: name.clone(),
        filters: session_filters(matches),
        mode: RestoreMode::MoveOnly,
    };
    run_restore(&name, config, settings, request, "move")
}
