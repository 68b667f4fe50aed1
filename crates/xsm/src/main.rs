use xsm_core::init_logging;
use xsm_core::logging::Verbosity;

mod app;
mod commands;
mod table;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = app::build_cli();
    let matches = match app.try_get_matches() {
        Ok(matches) => matches,
        // Usage errors exit with 1; help and version print normally.
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    init_logging(Verbosity::from_occurrences(matches.get_count("verbose")));

    commands::run_command(&matches)?;

    Ok(())
}
