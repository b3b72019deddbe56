//! # Sentry Types
//!
//! Response payloads and request bodies of the Sentry REST API.
//! Only the fields the operator reads are modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// A Sentry team
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Team {
    pub id: String,
    pub slug: String,
    pub name: String,
}

/// Team reference embedded in a project payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TeamRef {
    pub id: String,
    pub slug: String,
    pub name: String,
}

/// A Sentry project
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub name: String,
    /// Owning team; absent once the team has been deleted
    pub team: Option<TeamRef>,
}

/// DSN variants of a client key
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Dsn {
    pub public: String,
    pub secret: String,
    pub csp: String,
    pub security: String,
    pub minidump: String,
    pub cdn: String,
}

/// A Sentry client key (DSN)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectKey {
    pub id: String,
    pub name: String,
    pub project_id: i64,
    pub is_active: bool,
    pub dsn: Dsn,
}

/// Body of `POST organizations/{org}/teams/` and `PUT teams/{org}/{team}/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Body of `POST teams/{org}/{team}/projects/` and `PUT projects/{org}/{project}/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectParams {
    pub name: String,
    pub slug: String,
}

/// Body of `POST projects/{org}/{project}/keys/` and `PUT .../keys/{id}/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
