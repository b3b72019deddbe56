//! # sentryctl
//!
//! Command-line interface for the Sentry operator.
//!
//! ## Usage
//!
//! ```bash
//! # List all managed Sentry resources
//! sentryctl list
//!
//! # List only project keys in one namespace
//! sentryctl list --kind projectkey -n shop
//!
//! # Show status of a Project
//! sentryctl status project checkout -n shop
//!
//! # Force a drift check of a Team on the next trigger
//! sentryctl reconcile team platform -n shop
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::{Client, Resource, ResourceExt};
use sentry_operator::constants::FIELD_MANAGER;
use sentry_operator::crd::{Project, ProjectKey, SyncedResource, Team};
use serde_json::json;

/// Sentry operator CLI
#[derive(Parser)]
#[command(name = "sentryctl")]
#[command(about = "Inspect Sentry resources managed by the Sentry operator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Kubernetes namespace (defaults to all namespaces for list, "default" otherwise)
    #[arg(short, long, global = true)]
    namespace: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List managed resources with their sync state
    List {
        /// Only list resources of this kind
        #[arg(short, long, value_enum)]
        kind: Option<Kind>,
    },
    /// Show the status of one resource
    Status {
        #[arg(value_enum)]
        kind: Kind,
        name: String,
    },
    /// Make the operator re-check a resource against Sentry on its next trigger
    Reconcile {
        #[arg(value_enum)]
        kind: Kind,
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Team,
    Project,
    #[value(name = "projectkey")]
    ProjectKey,
}

impl Kind {
    const ALL: [Kind; 3] = [Kind::Team, Kind::Project, Kind::ProjectKey];

    fn name(self) -> &'static str {
        match self {
            Kind::Team => "Team",
            Kind::Project => "Project",
            Kind::ProjectKey => "ProjectKey",
        }
    }
}

/// One line of `sentryctl list`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    kind: &'static str,
    namespace: String,
    name: String,
    condition: String,
    id: String,
    last_synced: String,
}

impl Row {
    fn from_object<K: SyncedResource>(kind: &'static str, obj: &K) -> Self {
        let status = obj.sync_status();
        let or_dash = |value: Option<String>| value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".to_string());
        Self {
            kind,
            namespace: obj.namespace().unwrap_or_default(),
            name: obj.name_any(),
            condition: or_dash(status.and_then(|s| s.condition).map(|c| c.to_string())),
            id: or_dash(status.map(|s| s.id.clone())),
            last_synced: or_dash(status.and_then(|s| s.last_synced.clone())),
        }
    }

    fn render(&self) -> String {
        format!(
            "{:<12} {:<20} {:<30} {:<10} {:<34} {}",
            self.kind, self.namespace, self.name, self.condition, self.id, self.last_synced
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentryctl=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client. Ensure kubeconfig is configured.")?;

    match cli.command {
        Commands::List { kind } => list_command(client, kind, cli.namespace).await,
        Commands::Status { kind, name } => {
            let ns = cli.namespace.unwrap_or_else(|| "default".to_string());
            match kind {
                Kind::Team => status_command::<Team>(client, kind, &ns, &name).await,
                Kind::Project => status_command::<Project>(client, kind, &ns, &name).await,
                Kind::ProjectKey => status_command::<ProjectKey>(client, kind, &ns, &name).await,
            }
        }
        Commands::Reconcile { kind, name } => {
            let ns = cli.namespace.unwrap_or_else(|| "default".to_string());
            match kind {
                Kind::Team => reconcile_command::<Team>(client, kind, &ns, &name).await,
                Kind::Project => reconcile_command::<Project>(client, kind, &ns, &name).await,
                Kind::ProjectKey => reconcile_command::<ProjectKey>(client, kind, &ns, &name).await,
            }
        }
    }
}

fn api<K: SyncedResource>(client: Client, namespace: Option<&str>) -> Api<K> {
    match namespace {
        Some(ns) => Api::namespaced(client, ns),
        None => Api::all(client),
    }
}

async fn list_rows<K: SyncedResource>(
    client: Client,
    kind: Kind,
    namespace: Option<&str>,
) -> Result<Vec<Row>> {
    let objects = api::<K>(client, namespace)
        .list(&ListParams::default())
        .await
        .with_context(|| format!("Failed to list {} resources", kind.name()))?;
    Ok(objects
        .items
        .iter()
        .map(|obj| Row::from_object(kind.name(), obj))
        .collect())
}

/// List managed resources
async fn list_command(client: Client, kind: Option<Kind>, namespace: Option<String>) -> Result<()> {
    let kinds = kind.map_or(Kind::ALL.to_vec(), |k| vec![k]);
    let ns = namespace.as_deref();

    let mut rows = Vec::new();
    for kind in kinds {
        let mut found = match kind {
            Kind::Team => list_rows::<Team>(client.clone(), kind, ns).await?,
            Kind::Project => list_rows::<Project>(client.clone(), kind, ns).await?,
            Kind::ProjectKey => list_rows::<ProjectKey>(client.clone(), kind, ns).await?,
        };
        rows.append(&mut found);
    }

    if rows.is_empty() {
        println!("No Sentry resources found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<20} {:<30} {:<10} {:<34} {}",
        "KIND", "NAMESPACE", "NAME", "CONDITION", "ID", "LAST SYNCED"
    );
    for row in &rows {
        println!("{}", row.render());
    }
    Ok(())
}

/// Show detailed status of one resource
async fn status_command<K: SyncedResource>(
    client: Client,
    kind: Kind,
    namespace: &str,
    name: &str,
) -> Result<()> {
    let obj: K = api::<K>(client, Some(namespace))
        .get(name)
        .await
        .with_context(|| format!("Failed to get {} '{}/{}'", kind.name(), namespace, name))?;

    println!("{} '{}/{}':\n", kind.name(), namespace, name);
    if let Some(generation) = obj.meta().generation {
        println!("Generation: {generation}");
    }
    if !obj.finalizers().is_empty() {
        println!("Finalizers: {}", obj.finalizers().join(", "));
    }
    if obj.meta().deletion_timestamp.is_some() {
        println!("Deletion requested: yes");
    }

    let value = serde_json::to_value(&obj).context("Failed to serialize resource")?;
    println!("\nSpec:");
    print!("{}", indent(&serde_yaml::to_string(&value["spec"])?));

    match obj.sync_status() {
        Some(status) => {
            println!("\nStatus:");
            let condition = status.condition.map_or("-".to_string(), |c| c.to_string());
            println!("  Condition: {condition}");
            if !status.message.is_empty() {
                println!("  Message: {}", status.message);
            }
            println!("  ID: {}", status.id);
            if let Some(project_id) = value["status"]["projectId"].as_str() {
                println!("  Project ID: {project_id}");
            }
            println!(
                "  Last Synced: {}",
                status.last_synced.as_deref().unwrap_or("never")
            );
            if let Some(observed) = status.observed_generation {
                println!("  Observed Generation: {observed}");
            }
        }
        None => {
            println!("\nStatus: No status available (resource may not have been reconciled yet)");
        }
    }
    Ok(())
}

/// Clear the observed generation so the next trigger runs a full drift check
async fn reconcile_command<K: SyncedResource>(
    client: Client,
    kind: Kind,
    namespace: &str,
    name: &str,
) -> Result<()> {
    let patch = json!({ "status": { "observedGeneration": null } });
    api::<K>(client, Some(namespace))
        .patch_status(name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
        .await
        .with_context(|| {
            format!(
                "Failed to trigger reconciliation for {} '{}/{}'",
                kind.name(),
                namespace,
                name
            )
        })?;

    println!("Reconciliation requested for {} '{}/{}'", kind.name(), namespace, name);
    Ok(())
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("  {line}\n")).collect()
}
