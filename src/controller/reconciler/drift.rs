//! # Drift Detection
//!
//! Finds the live Sentry resource an object points at by walking a paginated
//! collection. Not finding it is a normal answer ([`Drift::OutOfSync`]), not
//! an error: it is what triggers recreation.

use super::error::Failure;
use super::outcome::{ApiCall, Outcome};
use crate::sentry::{pages, Page, SentryResult};
use futures::StreamExt;
use std::future::Future;

/// Result of a drift lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift<T> {
    /// The remote resource still exists
    Found(T),
    /// The remote resource (or the collection holding it) is gone
    OutOfSync,
}

impl<T> Drift<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Drift::Found(value) => Some(value),
            Drift::OutOfSync => None,
        }
    }

    pub fn is_out_of_sync(&self) -> bool {
        matches!(self, Drift::OutOfSync)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Drift<U> {
        match self {
            Drift::Found(value) => Drift::Found(f(value)),
            Drift::OutOfSync => Drift::OutOfSync,
        }
    }
}

/// Walk a paginated listing until `matches` accepts an item
///
/// Pagination stops at the first match. A 404 on any page means the
/// collection itself is gone and is reported as out of sync; every other
/// failure is classified and returned.
///
/// # Errors
///
/// Returns the classified failure of the first list call that fails.
pub async fn find_remote<T, F, Fut, P>(fetch: F, mut matches: P) -> Result<Drift<T>, Failure>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = SentryResult<Page<T>>>,
    P: FnMut(&T) -> bool,
{
    let listing = pages(fetch);
    let mut listing = std::pin::pin!(listing);

    while let Some(page) = listing.next().await {
        let items = match page {
            Ok(items) => items,
            Err(err) => {
                // A listing never succeeds with an error, so this is Absent or a failure
                Outcome::<()>::classify(Err(err), ApiCall::List).into_result()?;
                return Ok(Drift::OutOfSync);
            }
        };
        if let Some(found) = items.into_iter().find(|item| matches(item)) {
            return Ok(Drift::Found(found));
        }
    }

    Ok(Drift::OutOfSync)
}
