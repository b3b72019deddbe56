//! # Error Policy
//!
//! Backoff for reconciles that returned a retryable error.

use crate::controller::reconciler::{ReconcileError, ResourceKind};
use crate::observability;
use crate::runtime::context::{object_key, Context};
use kube::runtime::controller::Action;
use std::sync::Arc;
use tracing::{error, info};

/// Handle reconciliation errors with exponential backoff
///
/// Backoff state is tracked per object so one failing object does not delay
/// the others. It is reset by the next reconcile that does not fail.
pub fn handle_reconciliation_error<K: ResourceKind>(
    obj: Arc<K::Object>,
    error: &ReconcileError,
    ctx: Arc<Context<K>>,
) -> Action {
    let key = object_key(obj.as_ref());

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "sentry.reconcile.error",
        resource.kind = K::KIND,
        resource.key = %key,
        error = %error
    );
    let _error_guard = error_span.enter();

    error!("Reconciliation error for {} {}: {}", K::KIND, key, error);
    observability::metrics::increment_reconciliation_errors(K::KIND);

    let (delay, error_count) = ctx.backoff.next(&key);
    let next_trigger_time = chrono::Utc::now()
        + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());

    info!(
        "Retrying {} {} in {}s (error count: {}, next attempt at {})",
        K::KIND,
        key,
        delay.as_secs(),
        error_count,
        next_trigger_time.to_rfc3339()
    );

    observability::metrics::increment_requeues_total("error-backoff");
    Action::requeue(delay)
}
