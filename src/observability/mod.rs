//! # Observability
//!
//! Prometheus metrics for the operator. Logging is plain `tracing`,
//! configured in [`crate::runtime::initialization`].

pub mod metrics;
