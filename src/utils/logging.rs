//! Logging initialization

use tracing_subscriber::{fmt, EnvFilter};

use crate::adapters::LoggingConfig;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so stdout stays reserved for command output. Calling this twice is a
/// no-op.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

/// Log the build banner once at startup
pub fn log_system_info(config: &LoggingConfig) {
    tracing::info!("ReelMix {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Logging level: {}, json: {}", config.level, config.json);
}
