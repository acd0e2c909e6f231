//! Tracing subscriber setup for binaries embedding the pipeline.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` when set, otherwise the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber and route `log` records into it.
///
/// Returns `false` when a subscriber was already installed, in which case the
/// existing one is left in place.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true);

    let installed = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    if installed.is_err() {
        return false;
    }

    // Fails only if another `log` logger was set first
    let _ = tracing_log::LogTracer::init();

    tracing::debug!(level = %config.level, json = config.json, "Tracing initialized");
    true
}
