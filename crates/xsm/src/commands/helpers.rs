use std::io::{self, BufRead, Write};

use clap::ArgMatches;
use tracing::{info, warn};

use xsm_core::config::{Config, XsmConfig};
use xsm_core::sessions::SessionFilter;

/// Resolve paths and settings, warning on a broken config file.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
pub fn load_config_with_warning() -> (Config, XsmConfig) {
    let config = Config::new();
    let settings = match XsmConfig::load_hierarchy(&config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check {} for syntax errors.",
                e,
                config.config_file().display()
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            XsmConfig::default()
        }
    };
    (config.with_paths(&settings.paths), settings)
}

/// `-i/--include` then `-x/--exclude`, in that order.
pub fn session_filters(matches: &ArgMatches) -> Vec<Option<SessionFilter>> {
    vec![
        tokens(matches, "include").map(|t| SessionFilter::include(&t)),
        tokens(matches, "exclude").map(|t| SessionFilter::exclude(&t)),
    ]
}

pub fn tokens(matches: &ArgMatches, id: &str) -> Option<Vec<String>> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
}

pub fn session_name(matches: &ArgMatches) -> Result<String, Box<dyn std::error::Error>> {
    let name = matches
        .get_one::<String>("name")
        .ok_or("Session name is required")?;
    Ok(name.trim().to_string())
}

/// Ask `prompt` and read a y/N answer. An empty answer is no.
fn ask(prompt: &str, input: &mut impl BufRead) -> bool {
    println!("{}", prompt);
    print!("Please type your answer (y/N): ");
    let _ = io::stdout().flush();

    loop {
        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match answer.trim().to_lowercase().as_str() {
            "y" => return true,
            "n" | "" => return false,
            _ => {
                print!("Please type your answer again (y/N): ");
                let _ = io::stdout().flush();
            }
        }
    }
}

/// Confirm `prompt` unless `--yes` was given. Declining exits with 1.
pub fn confirm_or_exit(matches: &ArgMatches, prompt: &str) {
    if matches.get_flag("yes") {
        return;
    }
    let stdin = io::stdin();
    if !ask(prompt, &mut stdin.lock()) {
        info!(event = "cli.confirmation_declined");
        std::process::exit(1);
    }
}

/// Sessions belong to the logged-in user's desktop; refuse to run as root.
pub fn refuse_root() {
    if nix::unistd::geteuid().is_root() {
        eprintln!("❌ xsm must be run as a normal user");
        std::process::exit(1);
    }
}
