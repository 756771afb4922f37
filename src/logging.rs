//! Tracing subscriber setup

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Filter from `RUST_LOG` when set, otherwise from the configured level
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber. Output goes to stderr so stdout stays clean
/// for rendered views.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let builder = fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.pretty().try_init(),
    };

    result.map_err(|e| anyhow!("failed to initialise tracing: {e}"))
}
