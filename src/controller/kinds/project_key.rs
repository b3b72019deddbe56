use crate::constants::PROJECT_KEY_FINALIZER;
use crate::controller::reconciler::{
    dsn_secret, find_remote, validation, ApiCall, Drift, Failure, Outcome, ReconcileError,
    ResourceKind, SecretStore,
};
use crate::crd::{ProjectKey, ProjectKeyStatus, SyncedResource};
use crate::sentry::{self, KeyParams, SentryApi};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A live Sentry key and the current slug of the project holding it
///
/// Key listings do not include the project, so the slug resolved during the
/// lookup is kept for the update and delete calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyState {
    pub key: sentry::ProjectKey,
    pub project_slug: String,
}

/// Syncs `ProjectKey` objects to Sentry client keys and their DSN Secret
pub struct ProjectKeyKind {
    api: Arc<dyn SentryApi>,
    secrets: Arc<dyn SecretStore>,
    organization: String,
}

impl std::fmt::Debug for ProjectKeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectKeyKind")
            .field("organization", &self.organization)
            .finish_non_exhaustive()
    }
}

impl ProjectKeyKind {
    pub fn new(
        api: Arc<dyn SentryApi>,
        secrets: Arc<dyn SecretStore>,
        organization: impl Into<String>,
    ) -> Self {
        Self {
            api,
            secrets,
            organization: organization.into(),
        }
    }

    fn params(obj: &ProjectKey) -> KeyParams {
        KeyParams {
            name: obj.spec.name.clone(),
        }
    }
}

#[async_trait]
impl ResourceKind for ProjectKeyKind {
    type Object = ProjectKey;
    type Remote = sentry::ProjectKey;
    type Existing = KeyState;

    const KIND: &'static str = "ProjectKey";
    const FINALIZER: &'static str = PROJECT_KEY_FINALIZER;

    fn validate(&self, obj: &ProjectKey) -> Result<(), ReconcileError> {
        validation::validate_slug("project", &obj.spec.project)?;
        if let Some(name) = &obj.spec.name {
            validation::validate_name("name", name)?;
        }
        Ok(())
    }

    async fn create(&self, obj: &ProjectKey) -> Result<sentry::ProjectKey, Failure> {
        // 404 here means the project does not exist yet and is retried
        let result = self
            .api
            .create_key(&self.organization, &obj.spec.project, &Self::params(obj))
            .await;
        Outcome::classify(result, ApiCall::Create).into_present("project key")
    }

    async fn existing_state(&self, obj: &ProjectKey) -> Result<Drift<KeyState>, Failure> {
        let (api, org) = (self.api.as_ref(), self.organization.as_str());

        let project_id = obj.status.as_ref().map_or("", |s| s.project_id.as_str());
        let project = find_remote(
            move |cursor: Option<String>| async move {
                api.list_org_projects(org, cursor.as_deref()).await
            },
            |project: &sentry::Project| project.id == project_id,
        )
        .await?;
        let Drift::Found(project) = project else {
            debug!(project_id, "Parent project not found");
            return Ok(Drift::OutOfSync);
        };

        let key_id = obj.remote_id();
        let slug = project.slug.as_str();
        let key = find_remote(
            move |cursor: Option<String>| async move {
                api.list_keys(org, slug, cursor.as_deref()).await
            },
            |key: &sentry::ProjectKey| key.id == key_id,
        )
        .await?;

        Ok(key.map(|key| KeyState {
            key,
            project_slug: project.slug.clone(),
        }))
    }

    fn check_immutable(&self, obj: &ProjectKey, existing: &KeyState) -> Result<(), Failure> {
        if existing.project_slug == obj.spec.project {
            return Ok(());
        }
        Err(Failure::Terminal(ReconcileError::OutOfSync(
            "ProjectKey's project could not be updated".to_string(),
        )))
    }

    async fn update(
        &self,
        obj: &ProjectKey,
        existing: &KeyState,
    ) -> Result<sentry::ProjectKey, Failure> {
        let result = self
            .api
            .update_key(
                &self.organization,
                &existing.project_slug,
                &existing.key.id,
                &Self::params(obj),
            )
            .await;
        Outcome::classify(result, ApiCall::Update)
            .into_present(&format!("project key {}", existing.key.id))
    }

    async fn delete(&self, existing: &KeyState) -> Result<(), Failure> {
        let result = self
            .api
            .delete_key(&self.organization, &existing.project_slug, &existing.key.id)
            .await;
        Outcome::classify(result, ApiCall::Delete).into_result()?;
        Ok(())
    }

    fn remote_id(&self, remote: &sentry::ProjectKey) -> String {
        remote.id.clone()
    }

    fn record_remote(&self, obj: &mut ProjectKey, remote: &sentry::ProjectKey) {
        obj.status
            .get_or_insert_with(ProjectKeyStatus::default)
            .project_id = remote.project_id.to_string();
    }

    async fn after_sync(
        &self,
        obj: &ProjectKey,
        remote: &sentry::ProjectKey,
    ) -> Result<(), Failure> {
        let secret = dsn_secret(obj, remote).map_err(Failure::Terminal)?;
        self.secrets.apply(&secret).await?;
        Ok(())
    }
}
