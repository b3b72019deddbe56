//! # Constants
//!
//! Default values and well-known names used across the operator.

/// Default Sentry base URL
pub const DEFAULT_SENTRY_URL: &str = "https://sentry.io/";

/// Default interval between periodic drift checks (seconds)
pub const DEFAULT_RESYNC_INTERVAL_SECS: u64 = 600;

/// Minimum error backoff (seconds)
pub const DEFAULT_BACKOFF_MIN_SECS: u64 = 5;

/// Maximum error backoff (seconds)
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 300;

/// Timeout for a single Sentry API request (seconds)
pub const DEFAULT_SENTRY_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default port for the metrics and probe server
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default server startup timeout (seconds)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Default server readiness poll interval (milliseconds)
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;

/// Field manager used for status patches and server-side apply
pub const FIELD_MANAGER: &str = "sentry-operator";

/// Finalizer added to Team objects
pub const TEAM_FINALIZER: &str = "finalizers.sentry.microscaler.io/team";

/// Finalizer added to Project objects
pub const PROJECT_FINALIZER: &str = "finalizers.sentry.microscaler.io/project";

/// Finalizer added to ProjectKey objects
pub const PROJECT_KEY_FINALIZER: &str = "finalizers.sentry.microscaler.io/projectkey";

/// Prefix of the Secret generated for a ProjectKey
pub const DSN_SECRET_PREFIX: &str = "sentry-projectkey-";

/// Data key holding the public DSN in the generated Secret
pub const DSN_SECRET_KEY: &str = "SENTRY_DSN";
