//! Dist-git forge client (Pagure-style API v0)

use crate::config::ForgeConfig;
use crate::error::{Error, Result};
use crate::forge::ForgeClient;
use crate::types::{CheckResult, CheckStatus, MergeOutcome, PullRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Response message the forge sends for a successful merge
const MERGED_MESSAGE: &str = "Changes merged!";

/// Dist-git forge client using reqwest
pub struct DistGitClient {
    client: Client,
    api_base: String,
    bot_account: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct PullRequestList {
    total_requests: u64,
    requests: Vec<PullRequestItem>,
}

#[derive(Deserialize)]
struct PullRequestItem {
    id: u64,
    title: String,
    user: UserRef,
    #[serde(default)]
    full_url: Option<String>,
}

#[derive(Deserialize)]
struct UserRef {
    name: String,
}

#[derive(Deserialize)]
struct FlagList {
    flags: Vec<Flag>,
}

#[derive(Deserialize)]
struct Flag {
    username: String,
    status: String,
}

#[derive(Deserialize)]
struct MergeResponse {
    message: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: String,
}

impl DistGitClient {
    /// Create a new client
    pub fn new(api_base: &str, bot_account: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Forge(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_account: bot_account.to_string(),
            token,
        })
    }

    /// Create a client from the validated forge configuration
    pub fn from_config(forge: &ForgeConfig) -> Result<Self> {
        Self::new(&forge.api_base, &forge.bot_account, forge.token.clone())
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/0{path}", self.api_base)
    }

    fn pr_url(&self, component: &str, pr_id: u64) -> String {
        format!("{}/rpms/{component}/pull-request/{pr_id}", self.api_base)
    }
}

fn encoded(component: &str) -> String {
    urlencoding::encode(component).into_owned()
}

/// Decode a body that already passed the HTTP status gate.
///
/// A decode failure here means the data contract changed, which must
/// surface as the fatal [`Error::Contract`] rather than a retryable
/// transport error.
fn decode<T: DeserializeOwned>(what: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::Contract(format!("{what}: {e}")))
}

/// Map an unsuccessful HTTP status: 5xx is transient, anything else is a
/// definite refusal.
fn status_error(what: &str, status: reqwest::StatusCode, body: &str) -> Error {
    if status.is_server_error() {
        Error::Transient(format!("{what} returned {status}"))
    } else {
        Error::Forge(format!("{what} returned {status}: {body}"))
    }
}

#[async_trait]
impl ForgeClient for DistGitClient {
    async fn list_open_pull_requests(&self, component: &str) -> Result<Vec<PullRequest>> {
        debug!(component, author = %self.bot_account, "listing open pull requests");
        let url = self.api_url(&format!("/rpms/{}/pull-requests", encoded(component)));

        let response = self
            .client
            .get(&url)
            .query(&[("author", self.bot_account.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error("pull-request listing", status, &body));
        }

        let list: PullRequestList = decode("pull-request listing", &body)?;
        debug!(component, total = list.total_requests, "listed pull requests");

        Ok(list
            .requests
            .into_iter()
            .map(|item| PullRequest {
                id: item.id,
                author: item.user.name,
                title: item.title,
                html_url: item
                    .full_url
                    .unwrap_or_else(|| self.pr_url(component, item.id)),
            })
            .collect())
    }

    async fn fetch_checks(&self, component: &str, pr_id: u64) -> Result<Vec<CheckResult>> {
        debug!(component, pr_id, "fetching check results");
        let url = self.api_url(&format!(
            "/rpms/{}/pull-request/{pr_id}/flag",
            encoded(component)
        ));

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error("check fetch", status, &body));
        }

        let list: FlagList = decode("check fetch", &body)?;
        let mut results = Vec::with_capacity(list.flags.len());
        for flag in list.flags {
            let status = CheckStatus::classify(&flag.status)?;
            results.push(CheckResult {
                name: flag.username,
                status,
            });
        }

        debug!(component, pr_id, count = results.len(), "fetched check results");
        Ok(results)
    }

    async fn merge_pull_request(&self, component: &str, pr_id: u64) -> Result<MergeOutcome> {
        debug!(component, pr_id, "merging pull request");
        let token = self.token.as_deref().ok_or_else(|| {
            Error::Config("a forge token is required to merge pull requests".to_string())
        })?;

        let url = self.api_url(&format!(
            "/rpms/{}/pull-request/{pr_id}/merge",
            encoded(component)
        ));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("token {token}"))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_server_error() {
            return Err(Error::Transient(format!("merge returned {status}")));
        }

        if status.is_success() {
            let merged: MergeResponse = decode("merge response", &body)?;
            if merged.message == MERGED_MESSAGE {
                debug!(component, pr_id, "merged pull request");
                return Ok(MergeOutcome::Merged);
            }
            return Ok(MergeOutcome::Refused(merged.message));
        }

        // The forge answers a merge of an already-merged request with a
        // client error whose body names the state.
        let api_error: ApiError = decode("merge error response", &body)?;
        if api_error.error.contains("merged or closed") {
            debug!(component, pr_id, "pull request was already merged");
            return Ok(MergeOutcome::AlreadyMerged);
        }
        Ok(MergeOutcome::Refused(api_error.error))
    }
}
