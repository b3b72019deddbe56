//! # Outcome Classification
//!
//! Maps the result of a Sentry call to what the reconciler should do next.
//! The same status means different things depending on the call site:
//!
//! | Status | Create | Update | Delete | List |
//! |---|---|---|---|---|
//! | 2xx | Success | Success | Success | Success |
//! | none, 429, 5xx | Retryable | Retryable | Retryable | Retryable |
//! | 404 | Retryable | Absent | Absent | Absent |
//! | other 4xx | Terminal | Terminal | Terminal | Terminal |
//!
//! A request path that cannot be turned into a URL is Terminal at every call site.
//!
//! A 404 on create usually means the parent (team or project) has not been
//! synced yet, so it is retried.

use super::error::{Failure, ReconcileError};
use crate::sentry::{SentryError, SentryResult};

/// Kind of Sentry call being classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall {
    Create,
    Update,
    Delete,
    List,
}

/// Classified result of a Sentry call
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Retryable(SentryError),
    Terminal(SentryError),
    /// The addressed resource does not exist
    Absent(SentryError),
}

impl<T> Outcome<T> {
    pub fn classify(result: SentryResult<T>, call: ApiCall) -> Self {
        let err = match result {
            Ok(value) => return Outcome::Success(value),
            Err(err) => err,
        };

        // A request that could not be built fails the same way on every retry
        if matches!(err, SentryError::InvalidPath { .. }) {
            return Outcome::Terminal(err);
        }

        match err.status() {
            None | Some(429 | 500..) => Outcome::Retryable(err),
            Some(404) if call == ApiCall::Create => Outcome::Retryable(err),
            Some(404) => Outcome::Absent(err),
            Some(_) => Outcome::Terminal(err),
        }
    }

    /// `Absent` becomes `Ok(None)`; failures become [`Failure`]s
    ///
    /// # Errors
    ///
    /// Returns the classified failure for retryable and terminal outcomes.
    pub fn into_result(self) -> Result<Option<T>, Failure> {
        match self {
            Outcome::Success(value) => Ok(Some(value)),
            Outcome::Absent(_) => Ok(None),
            Outcome::Retryable(err) => Err(Failure::Retryable(err.into())),
            Outcome::Terminal(err) => Err(Failure::Terminal(err.into())),
        }
    }

    /// Like [`Outcome::into_result`], but the resource must exist
    ///
    /// An `Absent` outcome means the resource vanished between the drift lookup
    /// and this call. It is retried as out of sync so that the next drift
    /// lookup recreates it.
    ///
    /// # Errors
    ///
    /// Returns the classified failure, or a retryable out-of-sync error.
    pub fn into_present(self, what: &str) -> Result<T, Failure> {
        self.into_result()?.ok_or_else(|| {
            Failure::Retryable(ReconcileError::OutOfSync(format!("{what} no longer exists")))
        })
    }
}
