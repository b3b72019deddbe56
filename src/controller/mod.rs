//! # Controller
//!
//! Reconciliation logic for the Sentry resources.
//!
//! - `reconciler` - generic reconcile state machine, error classification, stores
//! - `kinds` - Team, Project and ProjectKey strategies
//! - `backoff` - per-object error backoff
//! - `server` - metrics and probe HTTP server

pub mod backoff;
pub mod kinds;
pub mod reconciler;
pub mod server;
