//! ProjectKey reconciliation and the generated DSN Secret.

use super::common::*;
use sentry_operator::controller::kinds::ProjectKeyKind;
use sentry_operator::controller::reconciler::{ReconcileError, Reconciled};
use sentry_operator::crd::{ProjectKey, ProjectKeySpec, SyncCondition, SyncedResource};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;

const SECRET: &str = "sentry-projectkey-web";

fn project_key(project: &str) -> ProjectKey {
    ProjectKey::new(
        "web",
        ProjectKeySpec {
            project: project.to_string(),
            name: Some("Web frontend".to_string()),
        },
    )
}

fn harness() -> Harness<ProjectKeyKind> {
    let h = project_key_harness();
    h.sentry.add_team("payments");
    h.sentry.add_project("payments", "checkout");
    h
}

async fn synced() -> Harness<ProjectKeyKind> {
    let h = harness();
    h.store.insert(project_key("checkout"));
    assert_eq!(h.reconcile("web").await.unwrap(), Reconciled::Created);
    h.sentry.clear_calls();
    h
}

fn key_id(h: &Harness<ProjectKeyKind>) -> String {
    h.object("web").remote_id().to_string()
}

#[tokio::test]
async fn test_create_writes_status_and_secret() {
    let h = harness();
    let project_id = h.sentry.projects()[0].id.clone();
    h.store.insert(project_key("checkout"));

    let result = h.reconcile("web").await.unwrap();

    assert_eq!(result, Reconciled::Created);
    assert_eq!(h.sentry.calls(), vec!["create_key:checkout"]);

    let obj = h.object("web");
    let status = obj.status.as_ref().unwrap();
    assert_eq!(status.sync.condition, Some(SyncCondition::Created));
    assert_eq!(status.project_id, project_id);
    let remote = &h.sentry.keys()[0];
    assert_eq!(status.sync.id, remote.id);
    assert_eq!(remote.name, "Web frontend");

    let secret = h.secrets.get(SECRET).unwrap();
    assert_eq!(h.secrets.dsn(SECRET).unwrap(), remote.dsn.public);
    assert_eq!(secret.metadata.namespace.as_deref(), Some(NS));
    let owner = &secret.metadata.owner_references.unwrap()[0];
    assert_eq!(owner.kind, "ProjectKey");
    assert_eq!(owner.name, "web");
    assert_eq!(owner.uid, "uid-web");
    assert_eq!(owner.controller, Some(true));
}

#[tokio::test]
async fn test_secret_is_replaced_whole() {
    let h = harness();
    h.secrets.put(Secret {
        metadata: ObjectMeta {
            name: Some(SECRET.to_string()),
            namespace: Some(NS.to_string()),
            ..ObjectMeta::default()
        },
        data: Some(BTreeMap::from([
            ("SENTRY_DSN".to_string(), ByteString(b"stale".to_vec())),
            ("EXTRA".to_string(), ByteString(b"leftover".to_vec())),
        ])),
        ..Secret::default()
    });
    h.store.insert(project_key("checkout"));

    h.reconcile("web").await.unwrap();

    let data = h.secrets.get(SECRET).unwrap().data.unwrap();
    assert_eq!(data.keys().collect::<Vec<_>>(), vec!["SENTRY_DSN"]);
    assert_ne!(h.secrets.dsn(SECRET).unwrap(), "stale");
}

#[tokio::test]
async fn test_update_looks_up_project_then_key() {
    let h = synced().await;
    let id = key_id(&h);

    h.store.edit("web", |k| k.spec.name = Some("Storefront".to_string()));
    let result = h.reconcile("web").await.unwrap();

    assert_eq!(result, Reconciled::Updated);
    assert_eq!(
        h.sentry.calls(),
        vec![
            "list_org_projects".to_string(),
            "list_keys:checkout".to_string(),
            format!("update_key:checkout:{id}"),
        ]
    );
    assert_eq!(h.sentry.keys()[0].name, "Storefront");
    assert_eq!(h.secrets.applies(), 2);
}

#[tokio::test]
async fn test_key_lookup_follows_pages() {
    let h = harness();
    for name in ["a", "b", "c"] {
        h.sentry.add_key("checkout", name);
    }
    h.store.insert(project_key("checkout"));
    h.reconcile("web").await.unwrap();
    h.sentry.clear_calls();

    let result = h.reconcile("web").await.unwrap();

    assert_eq!(result, Reconciled::Updated);
    assert_eq!(h.sentry.count_calls("list_keys:checkout"), 2);
    assert_eq!(h.sentry.count_calls("create_key"), 0);
}

#[tokio::test]
async fn test_delete_removes_key() {
    let h = synced().await;
    let id = key_id(&h);

    h.store.request_deletion("web");
    let result = h.reconcile("web").await.unwrap();

    assert_eq!(result, Reconciled::Deleted);
    assert_eq!(
        h.sentry.calls(),
        vec![
            "list_org_projects".to_string(),
            "list_keys:checkout".to_string(),
            format!("delete_key:checkout:{id}"),
        ]
    );
    assert!(h.sentry.keys().is_empty());
    assert!(h.store.object("web").is_none());
}

#[tokio::test]
async fn test_renamed_project_is_out_of_sync() {
    let h = synced().await;
    h.sentry.rename_project("checkout", "checkout-v2");

    let result = h.reconcile("web").await.unwrap();

    assert_eq!(result, Reconciled::Failed);
    assert_eq!(h.sentry.count_calls("update_key"), 0);
    let status = h.object("web").status.unwrap();
    assert_eq!(status.sync.condition, Some(SyncCondition::Error));
    assert_eq!(
        status.sync.message,
        "out of sync: ProjectKey's project could not be updated"
    );
}

#[tokio::test]
async fn test_project_change_is_rejected() {
    let h = synced().await;
    h.sentry.add_project("payments", "cart");

    h.store.edit("web", |k| k.spec.project = "cart".to_string());
    let result = h.reconcile("web").await.unwrap();

    assert_eq!(result, Reconciled::Failed);
    assert_eq!(h.sentry.count_calls("create_key"), 0);
}

#[tokio::test]
async fn test_deleted_project_skips_key_lookup() {
    let h = synced().await;
    h.sentry.remove_project("checkout");

    let err = h.reconcile("web").await.unwrap_err();

    // Parent gone: no key listing, and the create is retried until it returns
    assert!(matches!(err, ReconcileError::Remote(_)));
    assert_eq!(
        h.sentry.calls(),
        vec!["list_org_projects", "create_key:checkout"]
    );
}

#[tokio::test]
async fn test_deleted_key_is_recreated_with_new_dsn() {
    let h = synced().await;
    let old_id = key_id(&h);
    let old_dsn = h.secrets.dsn(SECRET).unwrap();
    h.sentry.remove_key(&old_id);

    let result = h.reconcile("web").await.unwrap();

    assert_eq!(result, Reconciled::Recreated);
    let new_id = key_id(&h);
    assert_ne!(new_id, old_id);
    let new_dsn = h.secrets.dsn(SECRET).unwrap();
    assert_ne!(new_dsn, old_dsn);
    assert_eq!(new_dsn, h.sentry.keys()[0].dsn.public);
}

#[tokio::test]
async fn test_secret_failure_is_retried() {
    let h = harness();
    h.store.insert(project_key("checkout"));
    h.secrets.fail_next();

    let err = h.reconcile("web").await.unwrap_err();

    assert!(matches!(err, ReconcileError::Store(_)));
    assert!(h.secrets.get(SECRET).is_none());
    let obj = h.object("web");
    assert_eq!(obj.status.unwrap().sync.condition, Some(SyncCondition::Error));

    let result = h.reconcile("web").await.unwrap();
    assert_eq!(result, Reconciled::Updated);
    assert!(h.secrets.get(SECRET).is_some());
    assert_eq!(h.sentry.keys().len(), 1);
}

#[tokio::test]
async fn test_missing_uid_is_terminal() {
    let h = harness();
    h.store.insert(project_key("checkout"));
    h.store.edit("web", |k| k.metadata.uid = None);

    let result = h.reconcile("web").await.unwrap();

    assert_eq!(result, Reconciled::Failed);
    assert!(h.secrets.get(SECRET).is_none());
    let status = h.object("web").status.unwrap();
    assert!(
        status.sync.message.starts_with("invalid object: "),
        "{}",
        status.sync.message
    );
}

#[tokio::test]
async fn test_key_list_server_error_is_retried_without_recreating() {
    let h = synced().await;
    let id = key_id(&h);
    h.sentry.fail_next("list_keys", 503, "unavailable");

    let err = h.reconcile("web").await.unwrap_err();

    assert!(matches!(err, ReconcileError::Remote(_)));
    assert_eq!(
        h.sentry.calls(),
        vec!["list_org_projects", "list_keys:checkout"]
    );
    assert_eq!(h.sentry.count_calls("create_"), 0);
    let obj = h.object("web");
    assert_eq!(obj.remote_id(), id);
    assert_eq!(
        obj.status.unwrap().sync.condition,
        Some(SyncCondition::Error)
    );
}
