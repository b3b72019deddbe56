//! # Sentry API
//!
//! The operations the reconcilers need from Sentry, behind a trait so the
//! HTTP client can be swapped for an in-memory fake.

use super::error::SentryError;
use super::pagination::Page;
use super::types::{KeyParams, Project, ProjectKey, ProjectParams, Team, TeamParams};
use async_trait::async_trait;

/// Result of a Sentry API call
pub type SentryResult<T> = Result<T, SentryError>;

/// Sentry REST operations used by the reconcilers
///
/// `org` is the organization slug. List operations take the cursor of the
/// page to fetch (`None` for the first page).
#[async_trait]
pub trait SentryApi: Send + Sync {
    async fn list_teams(&self, org: &str, cursor: Option<&str>) -> SentryResult<Page<Team>>;
    async fn create_team(&self, org: &str, params: &TeamParams) -> SentryResult<Team>;
    async fn update_team(&self, org: &str, slug: &str, params: &TeamParams) -> SentryResult<Team>;
    async fn delete_team(&self, org: &str, slug: &str) -> SentryResult<()>;

    async fn list_org_projects(&self, org: &str, cursor: Option<&str>)
        -> SentryResult<Page<Project>>;
    async fn create_project(
        &self,
        org: &str,
        team: &str,
        params: &ProjectParams,
    ) -> SentryResult<Project>;
    async fn update_project(
        &self,
        org: &str,
        slug: &str,
        params: &ProjectParams,
    ) -> SentryResult<Project>;
    async fn delete_project(&self, org: &str, slug: &str) -> SentryResult<()>;

    async fn list_keys(
        &self,
        org: &str,
        project: &str,
        cursor: Option<&str>,
    ) -> SentryResult<Page<ProjectKey>>;
    async fn create_key(
        &self,
        org: &str,
        project: &str,
        params: &KeyParams,
    ) -> SentryResult<ProjectKey>;
    async fn update_key(
        &self,
        org: &str,
        project: &str,
        id: &str,
        params: &KeyParams,
    ) -> SentryResult<ProjectKey>;
    async fn delete_key(&self, org: &str, project: &str, id: &str) -> SentryResult<()>;
}
