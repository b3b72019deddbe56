//! # Controller Configuration
//!
//! Sentry connection and reconcile timing settings.

use super::var_or_default;
use crate::constants::{
    DEFAULT_BACKOFF_MAX_SECS, DEFAULT_BACKOFF_MIN_SECS, DEFAULT_RESYNC_INTERVAL_SECS,
    DEFAULT_SENTRY_REQUEST_TIMEOUT_SECS, DEFAULT_SENTRY_URL,
};
use anyhow::{anyhow, Result};
use std::time::Duration;

/// Controller configuration
#[derive(Clone)]
pub struct ControllerConfig {
    /// Sentry base URL (`SENTRY_URL`)
    pub sentry_url: String,
    /// Sentry API token (`SENTRY_TOKEN`)
    pub sentry_token: String,
    /// Organization slug all resources live in (`SENTRY_ORGANIZATION`)
    pub organization: String,
    /// Periodic drift check interval in seconds (`RESYNC_INTERVAL_SECS`)
    pub resync_interval_secs: u64,
    /// Minimum error backoff in seconds (`BACKOFF_MIN_SECS`)
    pub backoff_min_secs: u64,
    /// Maximum error backoff in seconds (`BACKOFF_MAX_SECS`)
    pub backoff_max_secs: u64,
    /// Timeout of one Sentry request in seconds (`SENTRY_REQUEST_TIMEOUT_SECS`)
    pub request_timeout_secs: u64,
}

// The token must never end up in logs.
impl std::fmt::Debug for ControllerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerConfig")
            .field("sentry_url", &self.sentry_url)
            .field("sentry_token", &"<redacted>")
            .field("organization", &self.organization)
            .field("resync_interval_secs", &self.resync_interval_secs)
            .field("backoff_min_secs", &self.backoff_min_secs)
            .field("backoff_max_secs", &self.backoff_max_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `SENTRY_TOKEN` or `SENTRY_ORGANIZATION` is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(super::env_lookup)
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns an error if `SENTRY_TOKEN` or `SENTRY_ORGANIZATION` is missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("Required environment variable {key} is not set"))
        };

        Ok(Self {
            sentry_url: lookup("SENTRY_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SENTRY_URL.to_string()),
            sentry_token: required("SENTRY_TOKEN")?,
            organization: required("SENTRY_ORGANIZATION")?,
            resync_interval_secs: var_or_default(
                &lookup,
                "RESYNC_INTERVAL_SECS",
                DEFAULT_RESYNC_INTERVAL_SECS,
            ),
            backoff_min_secs: var_or_default(&lookup, "BACKOFF_MIN_SECS", DEFAULT_BACKOFF_MIN_SECS),
            backoff_max_secs: var_or_default(&lookup, "BACKOFF_MAX_SECS", DEFAULT_BACKOFF_MAX_SECS),
            request_timeout_secs: var_or_default(
                &lookup,
                "SENTRY_REQUEST_TIMEOUT_SECS",
                DEFAULT_SENTRY_REQUEST_TIMEOUT_SECS,
            ),
        })
    }

    pub fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_interval_secs)
    }

    pub fn backoff_min(&self) -> Duration {
        Duration::from_secs(self.backoff_min_secs)
    }

    pub fn backoff_max(&self) -> Duration {
        Duration::from_secs(self.backoff_max_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
