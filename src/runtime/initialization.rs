//! # Initialization
//!
//! Operator initialization: rustls setup, tracing, metrics, configuration,
//! server startup, Kubernetes client and Sentry client setup.

use crate::config::{self, ControllerConfig, ServerConfig};
use crate::controller::server::{start_server, ServerState};
use crate::crd::{Project, ProjectKey, SyncedResource, Team};
use crate::observability;
use crate::sentry::{SentryApi, SentryClient};
use anyhow::{anyhow, Context, Result};
use kube::api::{Api, ListParams};
use kube::{Client, ResourceExt};
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Everything the controllers need to run
pub struct InitializationResult {
    /// Kubernetes client
    pub client: Client,
    /// Sentry API client shared by all kinds
    pub sentry: Arc<dyn SentryApi>,
    pub config: ControllerConfig,
    /// Server state for health checks
    pub server_state: Arc<ServerState>,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("config", &self.config)
            .field("server_state", &self.server_state)
            .finish_non_exhaustive()
    }
}

/// Initialize the operator runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Configuration loading
/// - Metrics registration
/// - HTTP server startup
/// - Kubernetes and Sentry client creation
///
/// # Errors
///
/// Returns an error if configuration is incomplete or any client cannot be built.
pub async fn initialize() -> Result<InitializationResult> {
    // Must happen before anything opens a TLS connection
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentry_operator=info".into()),
        )
        .init();

    info!("Starting Sentry operator v{}", env!("CARGO_PKG_VERSION"));

    let (config, server_config) = config::load_config()?;
    info!(
        sentry.url = %config.sentry_url,
        sentry.organization = %config.organization,
        resync_interval_secs = config.resync_interval_secs,
        "Configuration loaded"
    );

    observability::metrics::register_metrics()?;

    let server_state = Arc::new(ServerState::default());
    let server_handle = {
        let state = Arc::clone(&server_state);
        let port = server_config.metrics_port;
        tokio::spawn(async move {
            if let Err(e) = start_server(port, state).await {
                error!("HTTP server error: {:#}", e);
            }
        })
    };
    wait_for_server_ready(&server_state, &server_handle, &server_config).await?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let sentry = SentryClient::new(
        &config.sentry_url,
        &config.sentry_token,
        config.request_timeout(),
    )?;
    info!("Sentry API at {}", sentry.api_root());

    log_startup_summary(&client).await;

    Ok(InitializationResult {
        client,
        sentry: Arc::new(sentry),
        config,
        server_state,
    })
}

/// Wait for the HTTP server to become ready
async fn wait_for_server_ready(
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
    server_config: &ServerConfig,
) -> Result<()> {
    let startup_timeout = Duration::from_secs(server_config.startup_timeout_secs);
    let poll_interval = Duration::from_millis(server_config.poll_interval_ms);
    let start_time = Instant::now();

    loop {
        if server_handle.is_finished() {
            return Err(anyhow!("HTTP server failed to start"));
        }

        if server_state.is_ready.load(Ordering::Relaxed) {
            info!("HTTP server is ready and accepting connections");
            return Ok(());
        }

        if start_time.elapsed() > startup_timeout {
            return Err(anyhow!(
                "HTTP server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Log how many objects of each kind exist, per namespace
///
/// Also tells early whether the CRDs are installed. Failures are logged only;
/// the controllers retry on their own.
async fn log_startup_summary(client: &Client) {
    summarize::<Team>(client, "Team").await;
    summarize::<Project>(client, "Project").await;
    summarize::<ProjectKey>(client, "ProjectKey").await;
}

async fn summarize<K: SyncedResource>(client: &Client, kind: &str) {
    let api: Api<K> = Api::all(client.clone());
    match api.list(&ListParams::default()).await {
        Ok(list) => {
            let mut by_namespace: BTreeMap<String, usize> = BTreeMap::new();
            for item in &list.items {
                *by_namespace
                    .entry(item.namespace().unwrap_or_else(|| "default".to_string()))
                    .or_default() += 1;
            }
            let synced = list.items.iter().filter(|item| item.has_synced()).count();
            info!(
                "Found {} existing {} resources ({} synced) in {} namespaces",
                list.items.len(),
                kind,
                synced,
                by_namespace.len()
            );
            for (namespace, count) in &by_namespace {
                info!("  {}: {}", namespace, count);
            }
        }
        Err(e) => {
            error!("{} CRD is not queryable; {}. Is the CRD installed?", kind, e);
            warn!("Installation: crdgen | kubectl apply -f -");
        }
    }
}
