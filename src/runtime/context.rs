//! # Reconcile Context
//!
//! Glue between the kube-rs `Controller` and the generic [`Reconciler`].
//!
//! The controller hands us an object snapshot; the reconciler re-reads it by
//! key and does the work. The result is turned into an [`Action`]:
//!
//! - synced: requeue after the resync interval (periodic drift detection)
//! - terminal failure, deleted or missing: wait for the next change
//! - retryable error: handled by [`crate::runtime::error_policy`]

use crate::controller::backoff::BackoffTracker;
use crate::controller::reconciler::{Reconciled, ReconcileError, Reconciler, ResourceKind};
use crate::crd::{SyncCondition, SyncedResource};
use crate::observability::metrics;
use chrono::{DateTime, Utc};
use kube::runtime::controller::Action;
use kube::{Resource, ResourceExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, Instrument};

/// Shared state of one kind's controller
pub struct Context<K: ResourceKind> {
    pub reconciler: Reconciler<K>,
    /// Interval between drift checks of a healthy object
    pub resync: Duration,
    pub backoff: BackoffTracker,
}

impl<K: ResourceKind> std::fmt::Debug for Context<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("reconciler", &self.reconciler)
            .field("resync", &self.resync)
            .finish_non_exhaustive()
    }
}

/// Key of an object in logs and backoff state
pub fn object_key<R: ResourceExt>(obj: &R) -> String {
    format!(
        "{}/{}",
        obj.namespace().unwrap_or_else(|| "default".to_string()),
        obj.name_any()
    )
}

/// Time left before a healthy object is due for its next drift check
///
/// Returns `Some` when the object was synced from its current generation less
/// than `resync` ago and is not being deleted. Watch events caused by the
/// operator's own status writes fall in that window and are deferred.
pub fn remaining_freshness<R: SyncedResource>(
    obj: &R,
    resync: Duration,
    now: DateTime<Utc>,
) -> Option<Duration> {
    if obj.meta().deletion_timestamp.is_some() {
        return None;
    }
    let status = obj.sync_status()?;
    if status.condition != Some(SyncCondition::Created) {
        return None;
    }
    if status.observed_generation.is_none() || status.observed_generation != obj.meta().generation {
        return None;
    }

    let age = now.signed_duration_since(status.last_synced_at()?).to_std().ok()?;
    resync.checked_sub(age).filter(|remaining| !remaining.is_zero())
}

/// Action after a reconcile that did not return an error
pub fn action_for(reconciled: Reconciled, resync: Duration) -> Action {
    match reconciled {
        Reconciled::Created | Reconciled::Recreated | Reconciled::Updated => {
            metrics::increment_requeues_total("resync");
            Action::requeue(resync)
        }
        Reconciled::Failed | Reconciled::Deleted | Reconciled::NotFound => Action::await_change(),
    }
}

/// Reconcile entry point handed to the kube-rs `Controller`
///
/// # Errors
///
/// Returns retryable reconcile errors so the error policy can back off.
pub async fn reconcile<K: ResourceKind>(
    obj: Arc<K::Object>,
    ctx: Arc<Context<K>>,
) -> Result<Action, ReconcileError> {
    let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());
    let name = obj.name_any();

    if let Some(remaining) = remaining_freshness(obj.as_ref(), ctx.resync, Utc::now()) {
        debug!(
            kind = K::KIND,
            namespace = %namespace,
            name = %name,
            "Synced {}s ago, next check in {}s",
            (ctx.resync - remaining).as_secs(),
            remaining.as_secs()
        );
        metrics::increment_requeues_total("fresh");
        return Ok(Action::requeue(remaining));
    }

    let span = tracing::info_span!(
        "sentry.reconcile",
        resource.kind = K::KIND,
        resource.namespace = %namespace,
        resource.name = %name,
    );

    async move {
        let start = Instant::now();
        metrics::increment_reconciliations(K::KIND);

        let result = ctx.reconciler.reconcile(&namespace, &name).await;
        metrics::observe_reconciliation_duration(K::KIND, start.elapsed().as_secs_f64());

        let reconciled = result?;
        ctx.backoff.reset(&object_key(obj.as_ref()));
        Ok::<_, ReconcileError>(action_for(reconciled, ctx.resync))
    }
    .instrument(span)
    .await
}
