//! Tracing subscriber installation.

use tracing_subscriber::EnvFilter;

use crate::proxy::config::LoggingConfig;
use crate::proxy::setup::SetupError;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter` when set.
///
/// # Errors
///
/// Returns `SetupError::Logging` if the filter directives are invalid or a
/// global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), SetupError> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| SetupError::Logging(err.to_string()))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, SetupError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|err| SetupError::Logging(err.to_string()))
}
