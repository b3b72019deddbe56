//! # Reconcile Errors
//!
//! Error types of the reconciliation engine.
//!
//! [`Failure`] is what a reconcile step returns: it wraps a [`ReconcileError`]
//! and says whether retrying the same trigger can succeed.

use crate::sentry::SentryError;
use thiserror::Error;

/// Error writing to the object store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Any Kubernetes API failure other than a conflict
    #[error("kubernetes API error: {0}")]
    Kube(kube::Error),
    /// Optimistic concurrency check failed (HTTP 409)
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl From<kube::Error> for StoreError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) if response.code == 409 => {
                StoreError::Conflict(response.message.clone())
            }
            other => StoreError::Kube(other),
        }
    }
}

/// Anything that can go wrong while reconciling one object
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Remote(#[from] SentryError),
    /// The remote resource no longer matches what the object recorded
    #[error("out of sync: {0}")]
    OutOfSync(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The object's spec cannot be realized as written
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    /// The object itself is malformed (e.g. missing uid)
    #[error("invalid object: {0}")]
    InvalidObject(String),
}

/// A classified reconcile failure
#[derive(Debug, Error)]
pub enum Failure {
    /// Retrying the same trigger later may succeed
    #[error(transparent)]
    Retryable(ReconcileError),
    /// Retrying cannot succeed until the object changes
    #[error(transparent)]
    Terminal(ReconcileError),
}

impl Failure {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Failure::Retryable(_))
    }

    pub fn error(&self) -> &ReconcileError {
        match self {
            Failure::Retryable(e) | Failure::Terminal(e) => e,
        }
    }

    pub fn into_error(self) -> ReconcileError {
        match self {
            Failure::Retryable(e) | Failure::Terminal(e) => e,
        }
    }
}

// Local writes are always worth retrying: conflicts resolve on the next read.
impl From<StoreError> for Failure {
    fn from(err: StoreError) -> Self {
        Failure::Retryable(ReconcileError::Store(err))
    }
}
