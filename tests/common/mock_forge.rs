//! Mock forge client for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use relbot::error::{Error, Result};
use relbot::forge::ForgeClient;
use relbot::types::{CheckResult, MergeOutcome, PullRequest};
use std::collections::HashMap;
use std::sync::Mutex;

/// Call record for `merge_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub component: String,
    pub pr_id: u64,
}

/// Kind of error a mock method is set up to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedError {
    /// Retryable transport failure
    Transient,
    /// Fatal data-contract violation
    Contract,
}

impl InjectedError {
    fn to_error(self, what: &str) -> Error {
        match self {
            Self::Transient => Error::Transient(format!("{what}: injected transient failure")),
            Self::Contract => Error::Contract(format!("{what}: injected contract violation")),
        }
    }
}

/// Simple mock forge client for driver tests
///
/// Features:
/// - Configurable pull-request listings per component
/// - Configurable check results and merge outcomes per pull request
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockForge {
    list_responses: Mutex<HashMap<String, Vec<PullRequest>>>,
    check_responses: Mutex<HashMap<u64, Vec<CheckResult>>>,
    merge_responses: Mutex<HashMap<u64, MergeOutcome>>,
    // Call tracking
    list_calls: Mutex<Vec<String>>,
    check_calls: Mutex<Vec<u64>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    // Error injection
    error_on_list: Mutex<Option<InjectedError>>,
    error_on_checks: Mutex<HashMap<u64, InjectedError>>,
    error_on_merge: Mutex<HashMap<u64, InjectedError>>,
}

impl MockForge {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            list_responses: Mutex::new(HashMap::new()),
            check_responses: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            list_calls: Mutex::new(Vec::new()),
            check_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            error_on_list: Mutex::new(None),
            error_on_checks: Mutex::new(HashMap::new()),
            error_on_merge: Mutex::new(HashMap::new()),
        }
    }

    // === Response configuration ===

    /// Set the open pull requests returned for a component
    pub fn set_pull_requests(&self, component: &str, prs: Vec<PullRequest>) {
        self.list_responses
            .lock()
            .unwrap()
            .insert(component.to_string(), prs);
    }

    /// Set the check results returned for a pull request
    pub fn set_checks(&self, pr_id: u64, results: Vec<CheckResult>) {
        self.check_responses.lock().unwrap().insert(pr_id, results);
    }

    /// Set the merge outcome for a pull request (default is `Merged`)
    pub fn set_merge_outcome(&self, pr_id: u64, outcome: MergeOutcome) {
        self.merge_responses.lock().unwrap().insert(pr_id, outcome);
    }

    // === Error injection ===

    /// Make the pull-request listing fail
    pub fn fail_list(&self, kind: InjectedError) {
        *self.error_on_list.lock().unwrap() = Some(kind);
    }

    /// Make the check fetch for one pull request fail
    pub fn fail_checks(&self, pr_id: u64, kind: InjectedError) {
        self.error_on_checks.lock().unwrap().insert(pr_id, kind);
    }

    /// Make the merge of one pull request fail
    pub fn fail_merge(&self, pr_id: u64, kind: InjectedError) {
        self.error_on_merge.lock().unwrap().insert(pr_id, kind);
    }

    // === Call verification ===

    /// Components the listing was called for
    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    /// Pull requests the check fetch was called for
    pub fn check_calls(&self) -> Vec<u64> {
        self.check_calls.lock().unwrap().clone()
    }

    /// All `merge_pull_request` calls
    pub fn merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Number of merge calls made
    pub fn merge_call_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
    }

    /// Assert that `merge_pull_request` was called for a pull request
    pub fn assert_merge_called(&self, pr_id: u64) {
        let calls = self.merge_calls();
        assert!(
            calls.iter().any(|c| c.pr_id == pr_id),
            "expected merge_pull_request({pr_id}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pull_request` was NOT called for a pull request
    pub fn assert_merge_not_called(&self, pr_id: u64) {
        let calls = self.merge_calls();
        assert!(
            !calls.iter().any(|c| c.pr_id == pr_id),
            "expected merge_pull_request({pr_id}) NOT to be called but it was: {calls:?}"
        );
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForgeClient for MockForge {
    async fn list_open_pull_requests(&self, component: &str) -> Result<Vec<PullRequest>> {
        self.list_calls.lock().unwrap().push(component.to_string());

        if let Some(kind) = *self.error_on_list.lock().unwrap() {
            return Err(kind.to_error("list_open_pull_requests"));
        }

        let responses = self.list_responses.lock().unwrap();
        Ok(responses.get(component).cloned().unwrap_or_default())
    }

    async fn fetch_checks(&self, _component: &str, pr_id: u64) -> Result<Vec<CheckResult>> {
        self.check_calls.lock().unwrap().push(pr_id);

        if let Some(kind) = self.error_on_checks.lock().unwrap().get(&pr_id) {
            return Err(kind.to_error("fetch_checks"));
        }

        let responses = self.check_responses.lock().unwrap();
        responses.get(&pr_id).cloned().ok_or_else(|| {
            Error::Forge(format!("fetch_checks: no response configured for PR #{pr_id}"))
        })
    }

    async fn merge_pull_request(&self, component: &str, pr_id: u64) -> Result<MergeOutcome> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            component: component.to_string(),
            pr_id,
        });

        if let Some(kind) = self.error_on_merge.lock().unwrap().get(&pr_id) {
            return Err(kind.to_error("merge_pull_request"));
        }

        let responses = self.merge_responses.lock().unwrap();
        Ok(responses
            .get(&pr_id)
            .cloned()
            .unwrap_or(MergeOutcome::Merged))
    }
}
