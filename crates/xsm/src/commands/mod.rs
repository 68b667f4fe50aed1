use clap::ArgMatches;
use tracing::error;

use xsm_core::events;

pub mod helpers;

mod close;
mod completions;
mod detail;
mod list;
mod move_windows;
mod restore;
mod save;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup();

    if matches!(
        matches.subcommand_name(),
        Some("save" | "restore" | "close" | "move")
    ) {
        helpers::refuse_root();
    }

    match matches.subcommand() {
        Some(("save", sub_matches)) => save::handle_save_command(sub_matches),
        Some(("restore", sub_matches)) => restore::handle_restore_command(sub_matches),
        Some(("close", sub_matches)) => close::handle_close_command(sub_matches),
        Some(("list", sub_matches)) => list::handle_list_command(sub_matches),
        Some(("detail", sub_matches)) => detail::handle_detail_command(sub_matches),
        Some(("move", sub_matches)) => move_windows::handle_move_command(sub_matches),
        Some(("completions", sub_matches)) => {
            completions::handle_completions_command(sub_matches)
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
