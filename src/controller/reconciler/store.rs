//! # Object Stores
//!
//! The reconciler's only write paths to Kubernetes: status, finalizers and
//! the generated DSN Secret. Traits keep the reconciler testable without an
//! API server.

use super::error::StoreError;
use crate::constants::FIELD_MANAGER;
use crate::crd::SyncedResource;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use tracing::debug;

/// Read and write access to one kind of managed object
#[async_trait]
pub trait ResourceStore<K>: Send + Sync {
    /// Fetch the current object, `None` if it does not exist
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, StoreError>;

    /// Persist `obj`'s status
    ///
    /// Fails with [`StoreError::Conflict`] if the object changed since it was
    /// read. On success `obj` is replaced with the stored version.
    async fn update_status(&self, obj: &mut K) -> Result<(), StoreError>;

    /// Persist `obj`'s finalizer list, with the same semantics as `update_status`
    async fn update_finalizers(&self, obj: &mut K) -> Result<(), StoreError>;
}

/// Create-or-replace access to Secrets
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Create the Secret or replace the fields the operator manages
    async fn apply(&self, secret: &Secret) -> Result<(), StoreError>;
}

/// Kubernetes-backed implementation of both stores
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api<K: SyncedResource>(&self, obj: &K) -> Api<K> {
        let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());
        Api::namespaced(self.client.clone(), &namespace)
    }
}

#[async_trait]
impl<K: SyncedResource> ResourceStore<K> for KubeStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>, StoreError> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn update_status(&self, obj: &mut K) -> Result<(), StoreError> {
        let status = obj.status_json().map_err(|source| StoreError::Serialize {
            what: "status",
            source,
        })?;
        // resourceVersion turns the merge patch into a conditional write
        let patch = json!({
            "metadata": { "resourceVersion": obj.resource_version() },
            "status": status,
        });

        let name = obj.name_any();
        debug!(name = %name, "Patching status");
        let updated = self
            .api(obj)
            .patch_status(&name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
            .await?;
        *obj = updated;
        Ok(())
    }

    async fn update_finalizers(&self, obj: &mut K) -> Result<(), StoreError> {
        let patch = json!({
            "metadata": {
                "resourceVersion": obj.resource_version(),
                "finalizers": obj.finalizers(),
            },
        });

        let name = obj.name_any();
        debug!(name = %name, finalizers = ?obj.finalizers(), "Patching finalizers");
        let updated = self
            .api(obj)
            .patch(&name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
            .await?;
        *obj = updated;
        Ok(())
    }
}

#[async_trait]
impl SecretStore for KubeStore {
    async fn apply(&self, secret: &Secret) -> Result<(), StoreError> {
        let namespace = secret.namespace().unwrap_or_else(|| "default".to_string());
        let name = secret.name_any();
        let api: Api<Secret> = Api::namespaced(self.client.clone(), &namespace);

        debug!(namespace = %namespace, name = %name, "Applying DSN secret");
        api.patch(
            &name,
            &PatchParams::apply(FIELD_MANAGER).force(),
            &Patch::Apply(secret),
        )
        .await?;
        Ok(())
    }
}
