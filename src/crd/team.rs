//! # Team
//!
//! Declarative specification of a Sentry team.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::SyncStatus;

/// Team Custom Resource Definition
///
/// # Example
///
/// ```yaml
/// apiVersion: sentry.microscaler.io/v1alpha1
/// kind: Team
/// metadata:
///   name: platform
///   namespace: default
/// spec:
///   name: Platform
///   slug: platform
/// ```
#[derive(CustomResource, Debug, Clone, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[kube(
    kind = "Team",
    group = "sentry.microscaler.io",
    version = "v1alpha1",
    namespaced,
    status = "SyncStatus",
    shortname = "sentryteam",
    printcolumn = r#"{"name":"Status", "type":"string", "jsonPath":".status.condition"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct TeamSpec {
    /// Name of the Sentry team
    #[schemars(length(min = 1, max = 50))]
    pub name: String,
    /// Slug of the Sentry team. Sentry derives one from the name when omitted.
    #[serde(default)]
    pub slug: Option<String>,
}
