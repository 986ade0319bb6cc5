//! Shared test fixtures

#![allow(dead_code)]

pub mod mock_forge;

pub use mock_forge::{InjectedError, MockForge};

use async_trait::async_trait;
use relbot::config::ComponentConfig;
use relbot::notify::Notifier;
use relbot::types::{CheckResult, CheckStatus, PullRequest};
use std::sync::Mutex;

/// Build a pull request fixture authored by the bot account
pub fn make_pr(id: u64, author: &str) -> PullRequest {
    PullRequest {
        id,
        author: author.to_string(),
        title: format!("Update to version {id}"),
        html_url: format!("https://src.example.org/rpms/osbuild/pull-request/{id}"),
    }
}

/// Build a check result fixture
pub fn make_check(name: &str, status: CheckStatus) -> CheckResult {
    CheckResult::new(name, status)
}

/// Component config with a count policy
pub fn component_with_count(name: &str, count: usize) -> ComponentConfig {
    ComponentConfig {
        name: name.to_string(),
        expected_checks: Some(count),
        required_checks: None,
        build_release: "1".to_string(),
    }
}

/// Component config with a named-check policy
pub fn component_with_required(name: &str, checks: &[&str]) -> ComponentConfig {
    ComponentConfig {
        name: name.to_string(),
        expected_checks: None,
        required_checks: Some(checks.iter().map(ToString::to_string).collect()),
        build_release: "1".to_string(),
    }
}

/// Notifier that records every message it is asked to send
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
