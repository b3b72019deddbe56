//! # Sentry Client
//!
//! `reqwest` implementation of [`SentryApi`].
//!
//! Requests are authenticated with a bearer token. Every call is traced and
//! counted in the `sentry_api_requests_total` metric.

use super::api::{SentryApi, SentryResult};
use super::error::SentryError;
use super::pagination::{Page, PageLinks};
use super::types::{KeyParams, Project, ProjectKey, ProjectParams, Team, TeamParams};
use crate::observability::metrics;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, LINK};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, Instrument};

/// HTTP client for the Sentry REST API
#[derive(Debug, Clone)]
pub struct SentryClient {
    http: reqwest::Client,
    /// `{base}/api/0/`
    api_root: Url,
    token: String,
}

impl SentryClient {
    /// Create a client for the Sentry instance at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url).with_context(|| format!("Invalid Sentry URL: {base_url}"))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let api_root = base
            .join("api/0/")
            .context("Failed to build Sentry API URL")?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sentry-operator/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            api_root,
            token: token.to_string(),
        })
    }

    /// Root of the API, e.g. `https://sentry.io/api/0/`
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    fn request(&self, method: Method, path: &str) -> SentryResult<RequestBuilder> {
        let url = self
            .api_root
            .join(path)
            .map_err(|e| SentryError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json"))
    }

    /// Send a request, turning non-2xx responses into [`SentryError::Api`]
    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> SentryResult<Response> {
        let span = tracing::debug_span!("sentry.request", http.method = %method, sentry.path = path);
        async move {
            let response = match builder.send().await {
                Ok(response) => response,
                Err(e) => {
                    metrics::increment_sentry_requests(method.as_str(), "error");
                    return Err(SentryError::Transport(e));
                }
            };

            let status = response.status();
            metrics::increment_sentry_requests(method.as_str(), status.as_str());
            debug!(status = status.as_u16(), "Sentry responded");

            if status.is_success() {
                return Ok(response);
            }
            let body = response.bytes().await.unwrap_or_default();
            Err(SentryError::from_response(status.as_u16(), &body))
        }
        .instrument(span)
        .await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        cursor: Option<&str>,
    ) -> SentryResult<Page<T>> {
        let mut builder = self.request(Method::GET, path)?;
        if let Some(cursor) = cursor {
            builder = builder.query(&[("cursor", cursor)]);
        }
        let response = self.send(Method::GET, path, builder).await?;

        let links = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(PageLinks::parse)
            .unwrap_or_default();
        let next_cursor = links.next_cursor().map(str::to_string);

        let body = response.bytes().await?;
        let items = serde_json::from_slice(&body)?;
        Ok(Page { items, next_cursor })
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> SentryResult<T> {
        let builder = self.request(method.clone(), path)?.json(body);
        let response = self.send(method, path, builder).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn delete(&self, path: &str) -> SentryResult<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(Method::DELETE, path, builder).await?;
        Ok(())
    }
}

#[async_trait]
impl SentryApi for SentryClient {
    async fn list_teams(&self, org: &str, cursor: Option<&str>) -> SentryResult<Page<Team>> {
        self.get_page(&format!("organizations/{org}/teams/"), cursor)
            .await
    }

    async fn create_team(&self, org: &str, params: &TeamParams) -> SentryResult<Team> {
        self.send_json(Method::POST, &format!("organizations/{org}/teams/"), params)
            .await
    }

    async fn update_team(&self, org: &str, slug: &str, params: &TeamParams) -> SentryResult<Team> {
        self.send_json(Method::PUT, &format!("teams/{org}/{slug}/"), params)
            .await
    }

    async fn delete_team(&self, org: &str, slug: &str) -> SentryResult<()> {
        self.delete(&format!("teams/{org}/{slug}/")).await
    }

    async fn list_org_projects(
        &self,
        org: &str,
        cursor: Option<&str>,
    ) -> SentryResult<Page<Project>> {
        self.get_page(&format!("organizations/{org}/projects/"), cursor)
            .await
    }

    async fn create_project(
        &self,
        org: &str,
        team: &str,
        params: &ProjectParams,
    ) -> SentryResult<Project> {
        self.send_json(
            Method::POST,
            &format!("teams/{org}/{team}/projects/"),
            params,
        )
        .await
    }

    async fn update_project(
        &self,
        org: &str,
        slug: &str,
        params: &ProjectParams,
    ) -> SentryResult<Project> {
        self.send_json(Method::PUT, &format!("projects/{org}/{slug}/"), params)
            .await
    }

    async fn delete_project(&self, org: &str, slug: &str) -> SentryResult<()> {
        self.delete(&format!("projects/{org}/{slug}/")).await
    }

    async fn list_keys(
        &self,
        org: &str,
        project: &str,
        cursor: Option<&str>,
    ) -> SentryResult<Page<ProjectKey>> {
        self.get_page(&format!("projects/{org}/{project}/keys/"), cursor)
            .await
    }

    async fn create_key(
        &self,
        org: &str,
        project: &str,
        params: &KeyParams,
    ) -> SentryResult<ProjectKey> {
        self.send_json(
            Method::POST,
            &format!("projects/{org}/{project}/keys/"),
            params,
        )
        .await
    }

    async fn update_key(
        &self,
        org: &str,
        project: &str,
        id: &str,
        params: &KeyParams,
    ) -> SentryResult<ProjectKey> {
        self.send_json(
            Method::PUT,
            &format!("projects/{org}/{project}/keys/{id}/"),
            params,
        )
        .await
    }

    async fn delete_key(&self, org: &str, project: &str, id: &str) -> SentryResult<()> {
        self.delete(&format!("projects/{org}/{project}/keys/{id}/"))
            .await
    }
}
