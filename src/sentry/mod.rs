//! # Sentry
//!
//! Client for the subset of the Sentry REST API the operator manages:
//! teams, projects and project client keys (DSNs).

mod api;
mod client;
mod error;
mod pagination;
mod types;

pub use api::{SentryApi, SentryResult};
pub use client::SentryClient;
pub use error::SentryError;
pub use pagination::{pages, Page, PageLink, PageLinks};
pub use types::{Dsn, KeyParams, Project, ProjectKey, ProjectParams, Team, TeamParams, TeamRef};
