use clap::{Arg, ArgAction, Command, value_parser};
use clap_complete::Shell;

fn session_name_arg(help: &'static str) -> Arg {
    Arg::new("name")
        .help(help)
        .index(1)
        .default_value(xsm_core::DEFAULT_SESSION_NAME)
}

fn yes_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .help("Do not ask for confirmation")
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("xsm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Save and restore X11 desktop sessions")
        .long_about("xsm saves the open application windows of an X11 session (desktop, geometry, command line) and restores them later: applications that are missing are relaunched and every window is moved back to its saved workspace.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable log output on stderr (-vv for debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .help("Only act on windows matching <window_id>, <pid>, <app_name> or <title>")
                .num_args(1..)
                .action(ArgAction::Append)
                .global(true),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .help("Leave out windows matching <window_id>, <pid>, <app_name> or <title>")
                .num_args(1..)
                .action(ArgAction::Append)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("save")
                .about("Save the current session")
                .arg(session_name_arg("Session name"))
                .arg(yes_arg()),
        )
        .subcommand(
            Command::new("restore")
                .about("Restore a saved session")
                .arg(session_name_arg("Session name"))
                .arg(yes_arg())
                .arg(
                    Arg::new("restoring-interval")
                        .long("restoring-interval")
                        .short('r')
                        .help("Seconds to wait between two application launches (overrides config)")
                        .value_parser(value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("close")
                .about("Close windows gracefully")
                .arg(
                    Arg::new("targets")
                        .help("Only close windows matching <window_id>, <pid>, <app_name> or <title>")
                        .num_args(0..)
                        .index(1),
                )
                .arg(
                    Arg::new("including-apps-with-multiple-windows")
                        .long("including-apps-with-multiple-windows")
                        .short('m')
                        .help("Also close applications that own several windows")
                        .action(ArgAction::SetTrue),
                )
                .arg(yes_arg()),
        )
        .subcommand(Command::new("list").about("List saved sessions"))
        .subcommand(
            Command::new("detail")
                .about("Show the windows recorded in a session")
                .arg(session_name_arg("Session name")),
        )
        .subcommand(
            Command::new("move")
                .about("Move running windows to the workspaces recorded in a session")
                .arg(session_name_arg("Session name")),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Target shell")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(Shell)),
                ),
        )
}
