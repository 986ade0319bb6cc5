//! Forge services for the dist-git pull-request API
//!
//! Provides a client trait for the operations the merge train needs, so the
//! driver can be exercised against a mock.

mod distgit;

pub use distgit::DistGitClient;

use crate::error::Result;
use crate::types::{CheckResult, MergeOutcome, PullRequest};
use async_trait::async_trait;

/// Forge operations consumed by the merge train
#[async_trait]
pub trait ForgeClient: Send + Sync {
    /// List open pull requests for `component` authored by the automation
    /// account.
    async fn list_open_pull_requests(&self, component: &str) -> Result<Vec<PullRequest>>;

    /// Fetch the currently reported check results for one pull request.
    ///
    /// The full set is refetched on every call; results legitimately take
    /// time to appear, so callers wrap this in the retry policy rather
    /// than treating a transient failure as final.
    async fn fetch_checks(&self, component: &str, pr_id: u64) -> Result<Vec<CheckResult>>;

    /// Merge one pull request.
    ///
    /// Must be safe to call on an already-merged request; that case is
    /// reported as [`MergeOutcome::AlreadyMerged`], not an error.
    async fn merge_pull_request(&self, component: &str, pr_id: u64) -> Result<MergeOutcome>;
}
