use crate::constants::TEAM_FINALIZER;
use crate::controller::reconciler::{
    find_remote, validation, ApiCall, Drift, Failure, Outcome, ReconcileError, ResourceKind,
};
use crate::crd::{SyncedResource, Team};
use crate::sentry::{self, SentryApi, TeamParams};
use async_trait::async_trait;
use std::sync::Arc;

/// Syncs `Team` objects to Sentry teams
pub struct TeamKind {
    api: Arc<dyn SentryApi>,
    organization: String,
}

impl std::fmt::Debug for TeamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamKind")
            .field("organization", &self.organization)
            .finish_non_exhaustive()
    }
}

impl TeamKind {
    pub fn new(api: Arc<dyn SentryApi>, organization: impl Into<String>) -> Self {
        Self {
            api,
            organization: organization.into(),
        }
    }

    fn params(obj: &Team) -> TeamParams {
        TeamParams {
            name: obj.spec.name.clone(),
            slug: obj.spec.slug.clone(),
        }
    }
}

#[async_trait]
impl ResourceKind for TeamKind {
    type Object = Team;
    type Remote = sentry::Team;
    type Existing = sentry::Team;

    const KIND: &'static str = "Team";
    const FINALIZER: &'static str = TEAM_FINALIZER;

    fn validate(&self, obj: &Team) -> Result<(), ReconcileError> {
        validation::validate_name("name", &obj.spec.name)?;
        if let Some(slug) = &obj.spec.slug {
            validation::validate_slug("slug", slug)?;
        }
        Ok(())
    }

    async fn create(&self, obj: &Team) -> Result<sentry::Team, Failure> {
        let result = self
            .api
            .create_team(&self.organization, &Self::params(obj))
            .await;
        Outcome::classify(result, ApiCall::Create).into_present("team")
    }

    async fn existing_state(&self, obj: &Team) -> Result<Drift<sentry::Team>, Failure> {
        let (api, org) = (self.api.as_ref(), self.organization.as_str());
        let id = obj.remote_id();
        find_remote(
            move |cursor: Option<String>| async move { api.list_teams(org, cursor.as_deref()).await },
            |team: &sentry::Team| team.id == id,
        )
        .await
    }

    async fn update(&self, obj: &Team, existing: &sentry::Team) -> Result<sentry::Team, Failure> {
        let result = self
            .api
            .update_team(&self.organization, &existing.slug, &Self::params(obj))
            .await;
        Outcome::classify(result, ApiCall::Update).into_present(&format!("team {}", existing.slug))
    }

    async fn delete(&self, existing: &sentry::Team) -> Result<(), Failure> {
        let result = self.api.delete_team(&self.organization, &existing.slug).await;
        Outcome::classify(result, ApiCall::Delete).into_result()?;
        Ok(())
    }

    fn remote_id(&self, remote: &sentry::Team) -> String {
        remote.id.clone()
    }
}
