//! # Reconciler
//!
//! The reconciliation engine shared by all managed kinds.
//!
//! A [`Reconciler`] drives one object towards its spec on every trigger:
//!
//! 1. Load the object; nothing to do if it is gone.
//! 2. Never synced: create the Sentry resource, record it in the status and
//!    add the finalizer.
//! 3. Otherwise look the resource up in Sentry ([`ResourceKind::existing_state`]):
//!    - deletion requested: delete it (if it still exists) and drop the finalizer;
//!    - gone: create it again (self-heal, new remote ID);
//!    - found: check immutable references and update it.
//!
//! Failures are written to the status. Retryable failures are returned to the
//! caller so the trigger is retried; terminal failures are not.
//!
//! What differs per kind (which Sentry calls to make, how to find the remote
//! resource) lives behind the [`ResourceKind`] strategy trait.

mod drift;
mod error;
pub mod finalizer;
mod outcome;
mod secret;
mod store;
pub mod validation;

pub use drift::{find_remote, Drift};
pub use error::{Failure, ReconcileError, StoreError};
pub use outcome::{ApiCall, Outcome};
pub use secret::{dsn_secret, dsn_secret_name};
pub use store::{KubeStore, ResourceStore, SecretStore};

use crate::crd::SyncedResource;
use async_trait::async_trait;
use kube::{Resource, ResourceExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Per-kind behaviour plugged into the generic [`Reconciler`]
#[async_trait]
pub trait ResourceKind: Send + Sync + 'static {
    /// The custom resource
    type Object: SyncedResource;
    /// Sentry payload returned by create and update
    type Remote: Send + Sync;
    /// What the drift lookup resolves for an existing resource
    type Existing: Send + Sync;

    const KIND: &'static str;
    const FINALIZER: &'static str;

    /// Local spec checks run before create and update
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidSpec`] when the spec cannot be realized.
    fn validate(&self, _obj: &Self::Object) -> Result<(), ReconcileError> {
        Ok(())
    }

    async fn create(&self, obj: &Self::Object) -> Result<Self::Remote, Failure>;

    /// Find the Sentry resource recorded in the object's status
    async fn existing_state(&self, obj: &Self::Object) -> Result<Drift<Self::Existing>, Failure>;

    /// Reject specs that would move the resource to another parent
    ///
    /// # Errors
    ///
    /// Returns a terminal out-of-sync failure on mismatch.
    fn check_immutable(
        &self,
        _obj: &Self::Object,
        _existing: &Self::Existing,
    ) -> Result<(), Failure> {
        Ok(())
    }

    async fn update(
        &self,
        obj: &Self::Object,
        existing: &Self::Existing,
    ) -> Result<Self::Remote, Failure>;

    async fn delete(&self, existing: &Self::Existing) -> Result<(), Failure>;

    /// Stable Sentry ID of a created or updated resource
    fn remote_id(&self, remote: &Self::Remote) -> String;

    /// Copy extra remote data into the status before it is persisted
    fn record_remote(&self, _obj: &mut Self::Object, _remote: &Self::Remote) {}

    /// Work that follows a successful create or update
    async fn after_sync(&self, _obj: &Self::Object, _remote: &Self::Remote) -> Result<(), Failure> {
        Ok(())
    }
}

/// What a reconcile did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The object no longer exists
    NotFound,
    Created,
    /// The Sentry resource had vanished and was created again
    Recreated,
    Updated,
    /// The Sentry resource was cleaned up and the finalizer released
    Deleted,
    /// A terminal failure was recorded in the status
    Failed,
}

/// Reconciles objects of one kind
pub struct Reconciler<K: ResourceKind> {
    kind: K,
    store: Arc<dyn ResourceStore<K::Object>>,
}

impl<K: ResourceKind> std::fmt::Debug for Reconciler<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("kind", &K::KIND)
            .finish_non_exhaustive()
    }
}

impl<K: ResourceKind> Reconciler<K> {
    pub fn new(kind: K, store: Arc<dyn ResourceStore<K::Object>>) -> Self {
        Self { kind, store }
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Reconcile the object `namespace/name`
    ///
    /// # Errors
    ///
    /// Returns the underlying error when the failure is retryable, or when the
    /// failure could not be recorded in the status.
    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<Reconciled, ReconcileError> {
        let Some(mut obj) = self.store.get(namespace, name).await? else {
            debug!(kind = K::KIND, namespace, name, "Object not found, nothing to do");
            return Ok(Reconciled::NotFound);
        };

        match self.sync(&mut obj).await {
            Ok(reconciled) => {
                info!(kind = K::KIND, namespace, name, result = ?reconciled, "Reconciled");
                Ok(reconciled)
            }
            Err(failure) => self.handle_error(&mut obj, failure).await,
        }
    }

    async fn sync(&self, obj: &mut K::Object) -> Result<Reconciled, Failure> {
        if !obj.has_synced() {
            if finalizer::is_deleting(obj) {
                // Nothing was ever created, so there is nothing to clean up
                self.release(obj).await?;
                return Ok(Reconciled::Deleted);
            }
            self.create(obj).await?;
            return Ok(Reconciled::Created);
        }

        let drift = self.kind.existing_state(obj).await?;

        if finalizer::is_deleting(obj) {
            if finalizer::contains(obj, K::FINALIZER) {
                if let Drift::Found(existing) = &drift {
                    self.kind.delete(existing).await?;
                } else {
                    info!(kind = K::KIND, name = %obj.name_any(), "Sentry resource already gone");
                }
                self.release(obj).await?;
            }
            return Ok(Reconciled::Deleted);
        }

        match drift {
            Drift::OutOfSync => {
                warn!(
                    kind = K::KIND,
                    name = %obj.name_any(),
                    id = obj.remote_id(),
                    "Sentry resource not found, recreating"
                );
                self.create(obj).await?;
                Ok(Reconciled::Recreated)
            }
            Drift::Found(existing) => {
                self.kind.validate(obj).map_err(Failure::Terminal)?;
                self.kind.check_immutable(obj, &existing)?;
                let remote = self.kind.update(obj, &existing).await?;
                self.record_sync(obj, &remote).await?;
                self.ensure_finalizer(obj).await?;
                self.kind.after_sync(obj, &remote).await?;
                Ok(Reconciled::Updated)
            }
        }
    }

    async fn create(&self, obj: &mut K::Object) -> Result<(), Failure> {
        self.kind.validate(obj).map_err(Failure::Terminal)?;
        let remote = self.kind.create(obj).await?;
        self.record_sync(obj, &remote).await?;
        self.ensure_finalizer(obj).await?;
        self.kind.after_sync(obj, &remote).await
    }

    /// Add the finalizer if it is missing
    ///
    /// Called after every successful create or update: a synced object always
    /// carries the finalizer, even when an earlier finalizer write failed.
    async fn ensure_finalizer(&self, obj: &mut K::Object) -> Result<(), Failure> {
        if finalizer::add(obj, K::FINALIZER) {
            self.store.update_finalizers(obj).await?;
        }
        Ok(())
    }

    /// Stamp a successful sync and persist it
    async fn record_sync(&self, obj: &mut K::Object, remote: &K::Remote) -> Result<(), Failure> {
        let id = self.kind.remote_id(remote);
        self.kind.record_remote(obj, remote);
        let generation = obj.meta().generation;
        obj.sync_status_mut().mark_created(&id, generation);
        self.store.update_status(obj).await?;
        Ok(())
    }

    async fn release(&self, obj: &mut K::Object) -> Result<(), Failure> {
        if finalizer::remove(obj, K::FINALIZER) {
            self.store.update_finalizers(obj).await?;
        }
        Ok(())
    }

    async fn handle_error(
        &self,
        obj: &mut K::Object,
        failure: Failure,
    ) -> Result<Reconciled, ReconcileError> {
        let retryable = failure.is_retryable();
        let err = failure.into_error();
        let name = obj.name_any();

        if retryable {
            warn!(kind = K::KIND, name = %name, error = %err, "Reconcile failed, will retry");
        } else {
            warn!(kind = K::KIND, name = %name, error = %err, "Reconcile failed, waiting for a spec change");
        }

        obj.sync_status_mut().mark_error(err.to_string());
        if let Err(status_err) = self.store.update_status(obj).await {
            error!(kind = K::KIND, name = %name, error = %status_err, "Failed to record error status");
            return Err(status_err.into());
        }

        if retryable {
            Err(err)
        } else {
            Ok(Reconciled::Failed)
        }
    }
}
