use crate::constants::PROJECT_FINALIZER;
use crate::controller::reconciler::{
    find_remote, validation, ApiCall, Drift, Failure, Outcome, ReconcileError, ResourceKind,
};
use crate::crd::{Project, SyncedResource};
use crate::sentry::{self, ProjectParams, SentryApi};
use async_trait::async_trait;
use std::sync::Arc;

/// Syncs `Project` objects to Sentry projects
pub struct ProjectKind {
    api: Arc<dyn SentryApi>,
    organization: String,
}

impl std::fmt::Debug for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectKind")
            .field("organization", &self.organization)
            .finish_non_exhaustive()
    }
}

impl ProjectKind {
    pub fn new(api: Arc<dyn SentryApi>, organization: impl Into<String>) -> Self {
        Self {
            api,
            organization: organization.into(),
        }
    }

    fn params(obj: &Project) -> ProjectParams {
        ProjectParams {
            name: obj.spec.name.clone(),
            slug: obj.spec.slug.clone(),
        }
    }
}

#[async_trait]
impl ResourceKind for ProjectKind {
    type Object = Project;
    type Remote = sentry::Project;
    type Existing = sentry::Project;

    const KIND: &'static str = "Project";
    const FINALIZER: &'static str = PROJECT_FINALIZER;

    fn validate(&self, obj: &Project) -> Result<(), ReconcileError> {
        validation::validate_slug("team", &obj.spec.team)?;
        validation::validate_name("name", &obj.spec.name)?;
        validation::validate_slug("slug", &obj.spec.slug)
    }

    async fn create(&self, obj: &Project) -> Result<sentry::Project, Failure> {
        // 404 here means the team does not exist yet and is retried
        let result = self
            .api
            .create_project(&self.organization, &obj.spec.team, &Self::params(obj))
            .await;
        Outcome::classify(result, ApiCall::Create).into_present("project")
    }

    async fn existing_state(&self, obj: &Project) -> Result<Drift<sentry::Project>, Failure> {
        let (api, org) = (self.api.as_ref(), self.organization.as_str());
        let id = obj.remote_id();
        find_remote(
            move |cursor: Option<String>| async move {
                api.list_org_projects(org, cursor.as_deref()).await
            },
            |project: &sentry::Project| project.id == id,
        )
        .await
    }

    fn check_immutable(&self, obj: &Project, existing: &sentry::Project) -> Result<(), Failure> {
        let current_team = existing.team.as_ref().map(|team| team.slug.as_str());
        if current_team == Some(obj.spec.team.as_str()) {
            return Ok(());
        }
        Err(Failure::Terminal(ReconcileError::OutOfSync(
            "Project's team could not be updated".to_string(),
        )))
    }

    async fn update(
        &self,
        obj: &Project,
        existing: &sentry::Project,
    ) -> Result<sentry::Project, Failure> {
        let result = self
            .api
            .update_project(&self.organization, &existing.slug, &Self::params(obj))
            .await;
        Outcome::classify(result, ApiCall::Update)
            .into_present(&format!("project {}", existing.slug))
    }

    async fn delete(&self, existing: &sentry::Project) -> Result<(), Failure> {
        let result = self
            .api
            .delete_project(&self.organization, &existing.slug)
            .await;
        Outcome::classify(result, ApiCall::Delete).into_result()?;
        Ok(())
    }

    fn remote_id(&self, remote: &sentry::Project) -> String {
        remote.id.clone()
    }
}
