//! # ProjectKey
//!
//! Declarative specification of a Sentry client key (DSN) and its status.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// ProjectKey Custom Resource Definition
///
/// The public DSN of the key is written to the Secret `sentry-projectkey-<name>`
/// in the same namespace.
///
/// # Example
///
/// ```yaml
/// apiVersion: sentry.microscaler.io/v1alpha1
/// kind: ProjectKey
/// metadata:
///   name: checkout-web
///   namespace: default
/// spec:
///   project: checkout
///   name: web
/// ```
#[derive(CustomResource, Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "ProjectKey",
    group = "sentry.microscaler.io",
    version = "v1alpha1",
    namespaced,
    status = "ProjectKeyStatus",
    shortname = "sentrykey",
    printcolumn = r#"{"name":"Status", "type":"string", "jsonPath":".status.condition"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKeySpec {
    /// Slug of the Sentry project the key belongs to
    #[schemars(length(min = 1, max = 50))]
    pub project: String,
    /// Name of the key
    #[serde(default)]
    pub name: Option<String>,
}

/// Status of a ProjectKey
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKeyStatus {
    #[serde(flatten)]
    pub sync: SyncStatus,
    /// ID of the Sentry project the key was created in.
    /// Listing a project's keys does not return the project, so it is captured here.
    #[serde(default)]
    pub project_id: String,
}
