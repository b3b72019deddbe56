//! # Custom Resource Definitions
//!
//! CRD types for the Sentry operator.
//!
//! Each kind (Team, Project, ProjectKey) describes one Sentry resource the
//! operator creates, keeps up to date and deletes. They share the [`SyncStatus`]
//! shape and are exposed to the generic reconciler through [`SyncedResource`].

mod project;
mod project_key;
mod status;
mod team;

pub use project::{Project, ProjectSpec};
pub use project_key::{ProjectKey, ProjectKeySpec, ProjectKeyStatus};
pub use status::{SyncCondition, SyncStatus};
pub use team::{Team, TeamSpec};

use kube::core::NamespaceResourceScope;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A namespaced custom resource whose status is owned by the operator
pub trait SyncedResource:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Shared sync status, if the resource has one yet
    fn sync_status(&self) -> Option<&SyncStatus>;

    /// Shared sync status, created empty on first access
    fn sync_status_mut(&mut self) -> &mut SyncStatus;

    /// The full status as JSON, used as the body of status patches
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be serialized.
    fn status_json(&self) -> serde_json::Result<serde_json::Value>;

    /// Whether the Sentry resource has ever been created for this object
    fn has_synced(&self) -> bool {
        self.sync_status().is_some_and(SyncStatus::has_synced)
    }

    /// Remote ID recorded in the status (empty when never created)
    fn remote_id(&self) -> &str {
        self.sync_status().map_or("", |s| s.id.as_str())
    }
}

impl SyncedResource for Team {
    fn sync_status(&self) -> Option<&SyncStatus> {
        self.status.as_ref()
    }

    fn sync_status_mut(&mut self) -> &mut SyncStatus {
        self.status.get_or_insert_with(SyncStatus::default)
    }

    fn status_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.status)
    }
}

impl SyncedResource for Project {
    fn sync_status(&self) -> Option<&SyncStatus> {
        self.status.as_ref()
    }

    fn sync_status_mut(&mut self) -> &mut SyncStatus {
        self.status.get_or_insert_with(SyncStatus::default)
    }

    fn status_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.status)
    }
}

impl SyncedResource for ProjectKey {
    fn sync_status(&self) -> Option<&SyncStatus> {
        self.status.as_ref().map(|s| &s.sync)
    }

    fn sync_status_mut(&mut self) -> &mut SyncStatus {
        &mut self.status.get_or_insert_with(ProjectKeyStatus::default).sync
    }

    fn status_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(&self.status)
    }
}
