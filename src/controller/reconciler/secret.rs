//! # DSN Secret
//!
//! Renders the Secret generated for a ProjectKey. The Secret is rebuilt from
//! scratch on every sync and applied whole, so stale values never survive.

use super::error::ReconcileError;
use crate::constants::{DSN_SECRET_KEY, DSN_SECRET_PREFIX};
use crate::crd::ProjectKey;
use crate::sentry;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use std::collections::BTreeMap;

/// Name of the Secret generated for a ProjectKey
pub fn dsn_secret_name(key: &ProjectKey) -> String {
    format!("{DSN_SECRET_PREFIX}{}", key.name_any())
}

/// Build the DSN Secret for `key` from the Sentry key it was synced to
///
/// # Errors
///
/// Returns [`ReconcileError::InvalidObject`] when the ProjectKey has no uid,
/// since the owner reference cannot be built.
pub fn dsn_secret(key: &ProjectKey, remote: &sentry::ProjectKey) -> Result<Secret, ReconcileError> {
    let owner = key.controller_owner_ref(&()).ok_or_else(|| {
        ReconcileError::InvalidObject(format!(
            "ProjectKey {} has no uid, cannot own its Secret",
            key.name_any()
        ))
    })?;

    let labels = key.labels().clone();
    let annotations = key.annotations().clone();

    Ok(Secret {
        metadata: ObjectMeta {
            name: Some(dsn_secret_name(key)),
            namespace: key.namespace(),
            labels: (!labels.is_empty()).then_some(labels),
            annotations: (!annotations.is_empty()).then_some(annotations),
            owner_references: Some(vec![owner]),
            ..ObjectMeta::default()
        },
        data: Some(BTreeMap::from([(
            DSN_SECRET_KEY.to_string(),
            ByteString(remote.dsn.public.clone().into_bytes()),
        )])),
        ..Secret::default()
    })
}
