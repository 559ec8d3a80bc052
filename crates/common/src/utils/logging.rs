use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is absent. sqlx statement logging is noisy at
/// info, so it is held at warn unless explicitly requested.
const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info,sqlx=warn,sea_orm=warn";

/// Output flavour of the tracing subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// `LOG_FORMAT=json` selects JSON; anything else is compact.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to stdout. Calling it twice is a no-op,
/// which keeps tests that spin up several apps in one process quiet.
pub fn init_logging(format: LogFormat) {
    match format {
        LogFormat::Compact => {
            let _ = fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .compact()
                .with_writer(io::stdout)
                .try_init();
        }
        LogFormat::Json => {
            let _ = fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .json()
                .with_writer(io::stdout)
                .try_init();
        }
    }
}

/// Compact human-readable output, honoring `RUST_LOG`.
pub fn init_logging_default() {
    init_logging(LogFormat::Compact);
}

/// JSON structured output for container log collection, honoring `RUST_LOG`.
pub fn init_logging_json() {
    init_logging(LogFormat::Json);
}
