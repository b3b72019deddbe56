//! # Sentry Operator
//!
//! A Kubernetes operator that keeps Sentry teams, projects and project keys
//! in sync with `Team`, `Project` and `ProjectKey` custom resources.
//!
//! ## Overview
//!
//! For every object the operator:
//!
//! 1. **Creates** the Sentry resource and records its ID in the status
//! 2. **Detects drift** by looking the resource up in Sentry on every resync
//! 3. **Recreates** it when it was deleted outside the operator
//! 4. **Updates** it when the spec changes
//! 5. **Deletes** it before the object goes away, guarded by a finalizer
//!
//! Project keys also get a `sentry-projectkey-<name>` Secret holding the
//! public DSN under `SENTRY_DSN`.
//!
//! ## Modules
//!
//! - `crd` - custom resource types
//! - `sentry` - Sentry REST API client
//! - `controller` - reconciliation engine and per-kind strategies
//! - `runtime` - kube-rs controllers, initialization and error policy
//! - `config` / `constants` - configuration
//! - `observability` - Prometheus metrics

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod runtime;
pub mod sentry;

pub use crd::{Project, ProjectKey, Team};
