//! # Sentry Metrics
//!
//! Metrics for calls to the Sentry REST API.

use crate::observability::metrics::registry::REGISTRY;
use anyhow::Result;
use prometheus::IntCounterVec;
use std::sync::LazyLock;

static SENTRY_API_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "sentry_operator_sentry_api_requests_total",
            "Total number of Sentry API requests by HTTP method and response status",
        ),
        &["method", "status"],
    )
    .expect("Failed to create SENTRY_API_REQUESTS_TOTAL metric - this should never happen")
});

/// Register Sentry metrics with the registry
pub(crate) fn register_sentry_metrics() -> Result<()> {
    REGISTRY.register(Box::new(SENTRY_API_REQUESTS_TOTAL.clone()))?;
    Ok(())
}

/// Count a Sentry request; `status` is the HTTP status or `error` for transport failures
pub fn increment_sentry_requests(method: &str, status: &str) {
    SENTRY_API_REQUESTS_TOTAL
        .with_label_values(&[method, status])
        .inc();
}
