use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How chatty the JSON log stream on stderr should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only (default).
    Quiet,
    /// `-v`: info and above.
    Verbose,
    /// `-vv`: debug and above, including raw window listings.
    Debug,
}

impl Verbosity {
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Verbosity::Quiet,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }

    fn level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Verbose => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Initialize logging.
///
/// Logs are emitted as JSON on stderr so stdout stays clean for
/// user-facing output.
pub fn init_logging(verbosity: Verbosity) {
    let level = verbosity.level();

    let mut filter = EnvFilter::from_default_env();
    for target in ["xsm", "xsm_core"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();
}
