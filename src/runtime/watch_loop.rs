//! # Watch Loop
//!
//! Runs one kube-rs `Controller` per managed kind until the process receives
//! SIGTERM or SIGINT. The ProjectKey controller also watches the Secrets it
//! owns, so a deleted or edited DSN Secret is put back.

use crate::config::ControllerConfig;
use crate::controller::backoff::{BackoffTracker, ExponentialBackoff};
use crate::controller::kinds::{ProjectKeyKind, ProjectKind, TeamKind};
use crate::controller::reconciler::{KubeStore, ReconcileError, Reconciler, ResourceKind};
use crate::crd::{Project, ProjectKey, Team};
use crate::runtime::context::{reconcile, Context};
use crate::runtime::error_policy::handle_reconciliation_error;
use crate::runtime::initialization::InitializationResult;
use anyhow::Result;
use futures::StreamExt;
use k8s_openapi::api::core::v1::Secret;
use kube::runtime::controller::{self, Action, Controller};
use kube::runtime::reflector::ObjectRef;
use kube::runtime::watcher;
use kube::Api;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run the Team, Project and ProjectKey controllers concurrently
///
/// # Errors
///
/// Currently never fails; the controllers stop on shutdown signals.
pub async fn run_watch_loop(init: InitializationResult) -> Result<()> {
    let InitializationResult {
        client,
        sentry,
        config,
        server_state,
    } = init;

    let store = Arc::new(KubeStore::new(client.clone()));

    let team_ctx = context(
        Reconciler::new(
            TeamKind::new(Arc::clone(&sentry), config.organization.clone()),
            store.clone(),
        ),
        &config,
    );
    let teams = Controller::new(Api::<Team>::all(client.clone()), watcher::Config::default())
        .shutdown_on_signal()
        .run(
            reconcile::<TeamKind>,
            handle_reconciliation_error::<TeamKind>,
            team_ctx,
        )
        .for_each(report::<TeamKind>);

    let project_ctx = context(
        Reconciler::new(
            ProjectKind::new(Arc::clone(&sentry), config.organization.clone()),
            store.clone(),
        ),
        &config,
    );
    let projects =
        Controller::new(Api::<Project>::all(client.clone()), watcher::Config::default())
            .shutdown_on_signal()
            .run(
                reconcile::<ProjectKind>,
                handle_reconciliation_error::<ProjectKind>,
                project_ctx,
            )
            .for_each(report::<ProjectKind>);

    let key_ctx = context(
        Reconciler::new(
            ProjectKeyKind::new(
                Arc::clone(&sentry),
                store.clone(),
                config.organization.clone(),
            ),
            store.clone(),
        ),
        &config,
    );
    let keys = Controller::new(
        Api::<ProjectKey>::all(client.clone()),
        watcher::Config::default(),
    )
    .owns(Api::<Secret>::all(client.clone()), watcher::Config::default())
    .shutdown_on_signal()
    .run(
        reconcile::<ProjectKeyKind>,
        handle_reconciliation_error::<ProjectKeyKind>,
        key_ctx,
    )
    .for_each(report::<ProjectKeyKind>);

    info!("Controllers started for Team, Project and ProjectKey");
    tokio::join!(teams, projects, keys);

    server_state.is_ready.store(false, Ordering::Relaxed);
    info!("Controllers stopped, shutting down");
    Ok(())
}

fn context<K: ResourceKind>(reconciler: Reconciler<K>, config: &ControllerConfig) -> Arc<Context<K>> {
    Arc::new(Context {
        reconciler,
        resync: config.resync_interval(),
        backoff: BackoffTracker::new(ExponentialBackoff::new(
            config.backoff_min(),
            config.backoff_max(),
        )),
    })
}

type ControllerResult<K> = Result<
    (ObjectRef<<K as ResourceKind>::Object>, Action),
    controller::Error<ReconcileError, watcher::Error>,
>;

async fn report<K: ResourceKind>(result: ControllerResult<K>) {
    match result {
        Ok((object, action)) => debug!(kind = K::KIND, object = %object, action = ?action, "Reconcile finished"),
        Err(controller::Error::ReconcilerFailed(err, object)) => {
            // Already logged and backed off by the error policy
            debug!(kind = K::KIND, object = %object, error = %err, "Reconcile failed");
        }
        Err(e) => warn!(kind = K::KIND, error = %e, "Controller error"),
    }
}
