//! Logging configuration and initialization
//!
//! Sets up the tracing subscriber used for structured logging across the
//! service. `RUST_LOG` takes precedence over the configured level.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Map a configured level onto a tracing filter directive
///
/// Only the first word is considered so trailing comments in the config
/// file are ignored. `warning` and `critical` are accepted as aliases;
/// anything unrecognized falls back to `info`.
pub fn normalize_level(log_level: &str) -> &'static str {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or("info")
        .to_lowercase();

    match level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Initialize the logging system with the specified level
pub fn init_logging(log_level: &str) {
    let level = normalize_level(log_level);

    // Quiet the HTTP stack unless explicitly asked for
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{level},hyper=warn,reqwest=warn,h2=warn"))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
