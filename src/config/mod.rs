//! # Operator Configuration
//!
//! Configuration loaded once at startup from environment variables.
//!
//! Optional settings fall back to the defaults in [`crate::constants`].
//! `SENTRY_TOKEN` and `SENTRY_ORGANIZATION` are required.

mod controller;
mod server;

pub use controller::ControllerConfig;
pub use server::ServerConfig;

use anyhow::Result;

/// Load configuration from environment variables with defaults
///
/// # Errors
///
/// Returns an error if a required variable is missing.
pub fn load_config() -> Result<(ControllerConfig, ServerConfig)> {
    Ok((ControllerConfig::from_env()?, ServerConfig::from_env()))
}

/// Read a variable through `lookup` or return the default value
///
/// Unparseable values fall back to the default as well.
pub(crate) fn var_or_default<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Environment lookup used outside of tests
pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
