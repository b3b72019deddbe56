//! # Metrics Module
//!
//! Prometheus metrics for monitoring the operator, organized by responsibility.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and text encoding
//! - `controller_metrics` - Reconciliations, errors, durations and requeues per kind
//! - `sentry_metrics` - Sentry API requests by method and status

pub mod controller_metrics;
pub mod registry;
pub mod sentry_metrics;

pub use controller_metrics::*;
pub use registry::*;
pub use sentry_metrics::*;
