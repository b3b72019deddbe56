//! # Sync Status
//!
//! Status types shared by the Team, Project and ProjectKey resources.

use serde::{Deserialize, Serialize};

/// Condition of a managed resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
pub enum SyncCondition {
    /// The Sentry resource was created or updated successfully
    Created,
    /// The last reconciliation failed, see `message`
    Error,
}

impl std::fmt::Display for SyncCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncCondition::Created => f.write_str("Created"),
            SyncCondition::Error => f.write_str("Error"),
        }
    }
}

/// Observed state of a Sentry resource
///
/// Owned by the operator. Fields are serialized even when empty so that a
/// merge patch of the whole status clears stale values (e.g. an old error message).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// The state of the Sentry resource
    /// "Created" indicates that the Sentry resource was created successfully.
    /// "Error" indicates that an error occurred while trying to reconcile it.
    #[serde(default)]
    pub condition: Option<SyncCondition>,
    /// Additional detail about any error that occurred during reconciliation
    #[serde(default)]
    pub message: String,
    /// The ID of the Sentry resource
    #[serde(default)]
    pub id: String,
    /// Time of the last successful create or update (RFC3339)
    /// Unset until the Sentry resource has been created for the first time
    #[serde(default)]
    pub last_synced: Option<String>,
    /// Generation of the resource the last successful sync was computed from
    #[serde(default)]
    pub observed_generation: Option<i64>,
}

impl SyncStatus {
    /// Whether the Sentry resource has ever been created for this object
    pub fn has_synced(&self) -> bool {
        self.last_synced.is_some()
    }

    /// Record a successful create or update
    pub fn mark_created(&mut self, id: &str, generation: Option<i64>) {
        self.condition = Some(SyncCondition::Created);
        self.message.clear();
        self.id = id.to_owned();
        self.last_synced = Some(chrono::Utc::now().to_rfc3339());
        self.observed_generation = generation;
    }

    /// Record a failed reconciliation; the remote ID and last sync time are kept
    pub fn mark_error(&mut self, message: String) {
        self.condition = Some(SyncCondition::Error);
        self.message = message;
    }

    /// Parsed `last_synced` timestamp, if any
    pub fn last_synced_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.last_synced
            .as_deref()
            .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&chrono::Utc))
    }
}
