//! Build- and update-tracking service clients
//!
//! Read-only lookups keyed by component+version+release, plus update
//! creation. Both services are spoken over plain REST.

use crate::config::{BuildsConfig, UpdatesConfig};
use crate::error::{Error, Result};
use crate::types::{BuildState, Nvr, PublishOutcome, PublishedUpdate, Release};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Build-tracking lookups
#[async_trait]
pub trait BuildTracker: Send + Sync {
    /// Build state for an NVR; `None` when the service knows no such build
    async fn build_state(&self, nvr: &Nvr) -> Result<Option<BuildState>>;
}

/// Update-tracking lookups and update creation
#[async_trait]
pub trait UpdateTracker: Send + Sync {
    /// Currently active distribution releases
    async fn active_releases(&self) -> Result<Vec<Release>>;

    /// Whether an update has been published for this build
    async fn update_exists(&self, nvr: &Nvr) -> Result<bool>;

    /// Create an update for this build.
    ///
    /// A duplicate for an already-updated build is reported as
    /// [`PublishOutcome::AlreadyExists`], not an error.
    async fn create_update(&self, nvr: &Nvr, notes: &str) -> Result<PublishOutcome>;
}

fn build_http_client(what: &str) -> Result<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::Config(format!("failed to create {what} HTTP client: {e}")))
}

/// Decode a body that already passed the HTTP status gate; failures are
/// contract violations, not transport errors.
fn decode<T: DeserializeOwned>(what: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::Contract(format!("{what}: {e}")))
}

// =============================================================================
// Build-tracking service
// =============================================================================

/// REST client for the build-tracking service
pub struct BuildServiceClient {
    client: Client,
    api_base: String,
}

#[derive(Deserialize)]
struct BuildInfo {
    nvr: String,
    state: String,
}

impl BuildServiceClient {
    /// Create a new client
    pub fn new(api_base: &str) -> Result<Self> {
        Ok(Self {
            client: build_http_client("build service")?,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the validated configuration
    pub fn from_config(builds: &BuildsConfig) -> Result<Self> {
        Self::new(&builds.api_base)
    }
}

#[async_trait]
impl BuildTracker for BuildServiceClient {
    async fn build_state(&self, nvr: &Nvr) -> Result<Option<BuildState>> {
        debug!(nvr = %nvr, "looking up build");
        let url = format!("{}/builds/{}", self.api_base, urlencoding::encode(&nvr.to_string()));

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(nvr = %nvr, "no such build");
            return Ok(None);
        }
        if status.is_server_error() {
            return Err(Error::Transient(format!("build lookup returned {status}")));
        }
        if !status.is_success() {
            return Err(Error::BuildService(format!(
                "build lookup returned {status}: {body}"
            )));
        }

        let info: BuildInfo = decode("build lookup", &body)?;
        let state = BuildState::classify(&info.state)?;
        debug!(nvr = %info.nvr, %state, "build found");
        Ok(Some(state))
    }
}

// =============================================================================
// Update-tracking service
// =============================================================================

/// REST client for the update-tracking service
pub struct UpdateServiceClient {
    client: Client,
    api_base: String,
    release_prefix: Option<String>,
}

#[derive(Deserialize)]
struct ReleaseList {
    releases: Vec<ReleaseItem>,
}

#[derive(Deserialize)]
struct ReleaseItem {
    version: String,
    id_prefix: String,
    dist_tag: String,
}

#[derive(Deserialize)]
struct UpdateList {
    total: u64,
}

#[derive(Serialize)]
struct CreateUpdateRequest {
    builds: Vec<String>,
    #[serde(rename = "type")]
    update_type: String,
    notes: String,
}

#[derive(Deserialize)]
struct CreatedUpdate {
    alias: String,
    url: String,
    #[serde(default)]
    date_submitted: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct UpdateServiceError {
    error: String,
}

impl From<CreatedUpdate> for PublishedUpdate {
    fn from(update: CreatedUpdate) -> Self {
        Self {
            alias: update.alias,
            url: update.url,
            submitted_at: update.date_submitted,
        }
    }
}

impl UpdateServiceClient {
    /// Create a new client; `release_prefix` filters active releases
    pub fn new(api_base: &str, release_prefix: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_http_client("update service")?,
            api_base: api_base.trim_end_matches('/').to_string(),
            release_prefix,
        })
    }

    /// Create a client from the validated configuration
    pub fn from_config(updates: &UpdatesConfig) -> Result<Self> {
        Self::new(&updates.api_base, updates.release_prefix.clone())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_server_error() {
            return Err(Error::Transient(format!("{what} returned {status}")));
        }
        if !status.is_success() {
            return Err(Error::UpdateService(format!(
                "{what} returned {status}: {body}"
            )));
        }

        decode(what, &body)
    }
}

#[async_trait]
impl UpdateTracker for UpdateServiceClient {
    async fn active_releases(&self) -> Result<Vec<Release>> {
        debug!("listing active releases");
        let url = format!("{}/releases", self.api_base);
        let list: ReleaseList = self
            .get_json("release listing", &url, &[("state", "current")])
            .await?;

        let releases: Vec<Release> = list
            .releases
            .into_iter()
            .filter(|r| {
                self.release_prefix
                    .as_deref()
                    .is_none_or(|prefix| r.id_prefix == prefix)
            })
            .map(|r| Release {
                version: r.version,
                dist_tag: r.dist_tag,
            })
            .collect();

        debug!(count = releases.len(), "listed active releases");
        Ok(releases)
    }

    async fn update_exists(&self, nvr: &Nvr) -> Result<bool> {
        debug!(nvr = %nvr, "looking up update");
        let url = format!("{}/updates/", self.api_base);
        let list: UpdateList = self
            .get_json("update lookup", &url, &[("builds", &nvr.to_string())])
            .await?;

        debug!(nvr = %nvr, total = list.total, "update lookup complete");
        Ok(list.total > 0)
    }

    async fn create_update(&self, nvr: &Nvr, notes: &str) -> Result<PublishOutcome> {
        debug!(nvr = %nvr, "creating update");
        let url = format!("{}/updates/", self.api_base);
        let payload = CreateUpdateRequest {
            builds: vec![nvr.to_string()],
            update_type: "enhancement".to_string(),
            notes: notes.to_string(),
        };

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_server_error() {
            return Err(Error::Transient(format!("update creation returned {status}")));
        }

        if status.is_success() {
            let created: CreatedUpdate = decode("update creation", &body)?;
            debug!(nvr = %nvr, alias = %created.alias, "update created");
            return Ok(PublishOutcome::Created(created.into()));
        }

        // A duplicate submission for an already-updated build comes back as
        // a client error naming the existing update.
        let service_error: UpdateServiceError = decode("update creation error", &body)?;
        if service_error.error.contains("already exists") {
            debug!(nvr = %nvr, "update already exists");
            return Ok(PublishOutcome::AlreadyExists);
        }
        Err(Error::UpdateService(service_error.error))
    }
}
