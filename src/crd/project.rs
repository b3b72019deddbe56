//! # Project
//!
//! Declarative specification of a Sentry project owned by a team.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// Project Custom Resource Definition
///
/// The team cannot be changed once the project exists: Sentry does not allow
/// moving a project between teams through the API.
///
/// # Example
///
/// ```yaml
/// apiVersion: sentry.microscaler.io/v1alpha1
/// kind: Project
/// metadata:
///   name: checkout
///   namespace: default
/// spec:
///   team: platform
///   name: Checkout
///   slug: checkout
/// ```
#[derive(CustomResource, Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "Project",
    group = "sentry.microscaler.io",
    version = "v1alpha1",
    namespaced,
    status = "SyncStatus",
    shortname = "sentryproject",
    printcolumn = r#"{"name":"Status", "type":"string", "jsonPath":".status.condition"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    /// Slug of the Sentry team that this project should be created under
    #[schemars(length(min = 1, max = 50))]
    pub team: String,
    /// Name of the Sentry project
    #[schemars(length(min = 1, max = 50))]
    pub name: String,
    /// Slug of the Sentry project
    #[schemars(length(min = 1, max = 50))]
    pub slug: String,
}
