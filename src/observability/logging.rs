//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, debug flag and environment
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Default filter directives when `RUST_LOG` is unset.
pub fn default_directives(config: &ObservabilityConfig, debug: bool) -> String {
    let level = if debug { "debug" } else { config.log_level.as_str() };
    format!("redirect_router={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig, debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(config, debug).into());

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("logging already initialised: {e}");
    }
}
