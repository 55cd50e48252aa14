use crate::error::{Result, WrkError};
use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log filter directive, e.g. `WRK_LOG=debug` or `WRK_LOG=wrk::store=trace`.
pub const ENV_LOG: &str = "WRK_LOG";

const VERBOSE_DIRECTIVE: &str = "wrk=debug";

/// Picks the filter: `WRK_LOG` wins, `--verbose` means debug, otherwise logging stays off.
pub fn resolve_filter(verbose: bool) -> Option<String> {
    env::var(ENV_LOG)
        .ok()
        .filter(|f| !f.trim().is_empty())
        .or_else(|| verbose.then(|| VERBOSE_DIRECTIVE.to_string()))
}

/// Initializes the tracing subscriber, writing to stderr so stdout stays clean for output
pub fn init(filter: Option<String>) -> Result<()> {
    let Some(filter) = filter else {
        return Ok(());
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .parse(&filter)
        .map_err(|e| WrkError::Config(format!("invalid {} filter '{}': {}", ENV_LOG, filter, e)))?;
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);
    tracing_subscriber::registry()
        .with(stderr_layer)
        .try_init()
        .map_err(|e| WrkError::Config(format!("could not initialize logging: {}", e)))?;

    tracing::debug!(%filter, "logging initialized");
    Ok(())
}
