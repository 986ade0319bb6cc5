//! Integration tests for relbot

#![allow(deprecated)] // cargo_bin is the standard way to test CLI binaries

mod common;

use assert_cmd::Command;
use common::{InjectedError, MockForge, RecordingNotifier, component_with_count, make_check, make_pr};
use predicates::prelude::*;
use relbot::error::Error;
use relbot::notify::NullNotifier;
use relbot::progress::SilentProgress;
use relbot::retry::RetryPolicy;
use relbot::train::run_merge_train;
use relbot::types::{CheckStatus, MergeDecision, MergeOutcome};
use std::time::Duration;

// =============================================================================
// CLI Tests
// =============================================================================

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("relbot").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Release-engineering automation bot"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("relbot").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_train_help() {
    let mut cmd = Command::cargo_bin("relbot").unwrap();
    cmd.args(["train", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("merge train"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_updates_help() {
    let mut cmd = Command::cargo_bin("relbot").unwrap();
    cmd.args(["updates", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("missing updates"))
        .stdout(predicate::str::contains("--publish"));
}

#[test]
fn test_missing_config_fails() {
    let mut cmd = Command::cargo_bin("relbot").unwrap();
    cmd.args(["--config", "/nonexistent/relbot.toml", "train"]);

    cmd.assert().failure();
}

// =============================================================================
// Merge Train Driver Tests
// =============================================================================

fn instant_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn test_no_open_pull_requests_is_a_noop() {
    // Scenario E: zero open bot pull requests -> 0 merged, no merge calls.
    let forge = MockForge::new();
    let component = component_with_count("osbuild", 3);

    let report = run_merge_train(
        &forge,
        &component,
        &RetryPolicy::none(),
        &NullNotifier,
        &SilentProgress,
    )
    .await
    .unwrap();

    assert_eq!(report.merged_count(), 0);
    assert!(report.is_noop());
    assert_eq!(forge.merge_call_count(), 0);
    assert_eq!(forge.list_calls(), vec!["osbuild".to_string()]);
}

#[tokio::test]
async fn test_only_approved_pull_requests_are_merged() {
    // Scenario F: one approved and one not-ready PR -> exactly one merge call.
    let forge = MockForge::new();
    forge.set_pull_requests("osbuild", vec![make_pr(7, "packit"), make_pr(8, "packit")]);
    forge.set_checks(
        7,
        vec![
            make_check("zuul", CheckStatus::Success),
            make_check("ci-pipeline", CheckStatus::Success),
        ],
    );
    forge.set_checks(8, vec![make_check("zuul", CheckStatus::Pending)]);

    let component = component_with_count("osbuild", 2);
    let report = run_merge_train(
        &forge,
        &component,
        &RetryPolicy::none(),
        &NullNotifier,
        &SilentProgress,
    )
    .await
    .unwrap();

    assert_eq!(report.merged, vec![7]);
    assert_eq!(report.merged_count(), 1);
    assert_eq!(forge.merge_call_count(), 1);
    forge.assert_merge_called(7);
    forge.assert_merge_not_called(8);

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].pr_id, 8);
    assert_eq!(report.skipped[0].decision, MergeDecision::NotReady);
}

#[tokio::test]
async fn test_rejected_pull_request_is_left_open() {
    let forge = MockForge::new();
    forge.set_pull_requests("osbuild", vec![make_pr(7, "packit")]);
    forge.set_checks(
        7,
        vec![
            make_check("zuul", CheckStatus::Failure),
            make_check("ci-pipeline", CheckStatus::Success),
        ],
    );

    let component = component_with_count("osbuild", 2);
    let report = run_merge_train(
        &forge,
        &component,
        &RetryPolicy::none(),
        &NullNotifier,
        &SilentProgress,
    )
    .await
    .unwrap();

    assert_eq!(forge.merge_call_count(), 0);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].decision, MergeDecision::Rejected);
}

#[tokio::test]
async fn test_merge_failure_does_not_stop_siblings() {
    // Merges are independent: a failure merging one PR must not prevent
    // evaluation and merging of the others in the same run.
    let forge = MockForge::new();
    forge.set_pull_requests("osbuild", vec![make_pr(7, "packit"), make_pr(8, "packit")]);
    forge.set_checks(7, vec![make_check("zuul", CheckStatus::Success)]);
    forge.set_checks(8, vec![make_check("zuul", CheckStatus::Success)]);
    forge.fail_merge(7, InjectedError::Transient);

    let component = component_with_count("osbuild", 1);
    let report = run_merge_train(
        &forge,
        &component,
        &instant_retry(),
        &NullNotifier,
        &SilentProgress,
    )
    .await
    .unwrap();

    assert_eq!(report.merged, vec![8]);
    assert_eq!(report.refused.len(), 1);
    assert_eq!(report.refused[0].0, 7);
    forge.assert_merge_called(8);
}

#[tokio::test]
async fn test_transient_check_failure_defers_only_that_pull_request() {
    let forge = MockForge::new();
    forge.set_pull_requests("osbuild", vec![make_pr(7, "packit"), make_pr(8, "packit")]);
    forge.fail_checks(7, InjectedError::Transient);
    forge.set_checks(8, vec![make_check("zuul", CheckStatus::Success)]);

    let component = component_with_count("osbuild", 1);
    let report = run_merge_train(
        &forge,
        &component,
        &instant_retry(),
        &NullNotifier,
        &SilentProgress,
    )
    .await
    .unwrap();

    // PR 7 deferred to the next scheduled run after retries exhausted;
    // retry made two attempts at its checks.
    assert_eq!(report.deferred, vec![7]);
    assert_eq!(report.merged, vec![8]);
    assert_eq!(forge.check_calls().iter().filter(|id| **id == 7).count(), 2);
    forge.assert_merge_not_called(7);
}

#[tokio::test]
async fn test_contract_violation_aborts_the_run() {
    let forge = MockForge::new();
    forge.set_pull_requests("osbuild", vec![make_pr(7, "packit"), make_pr(8, "packit")]);
    forge.fail_checks(7, InjectedError::Contract);
    forge.set_checks(8, vec![make_check("zuul", CheckStatus::Success)]);

    let component = component_with_count("osbuild", 1);
    let result = run_merge_train(
        &forge,
        &component,
        &instant_retry(),
        &NullNotifier,
        &SilentProgress,
    )
    .await;

    assert!(matches!(result, Err(Error::Contract(_))));
    // The run stopped before touching the sibling.
    assert_eq!(forge.merge_call_count(), 0);
}

#[tokio::test]
async fn test_already_merged_is_a_safe_noop() {
    // Idempotence: an already-merged PR is a recognized non-fatal outcome.
    let forge = MockForge::new();
    forge.set_pull_requests("osbuild", vec![make_pr(7, "packit")]);
    forge.set_checks(7, vec![make_check("zuul", CheckStatus::Success)]);
    forge.set_merge_outcome(7, MergeOutcome::AlreadyMerged);

    let component = component_with_count("osbuild", 1);
    let report = run_merge_train(
        &forge,
        &component,
        &RetryPolicy::none(),
        &NullNotifier,
        &SilentProgress,
    )
    .await
    .unwrap();

    assert_eq!(report.already_merged, vec![7]);
    assert_eq!(report.merged_count(), 0);
    assert!(report.refused.is_empty());
}

#[tokio::test]
async fn test_refused_merge_is_reported_with_the_message() {
    let forge = MockForge::new();
    forge.set_pull_requests("osbuild", vec![make_pr(7, "packit")]);
    forge.set_checks(7, vec![make_check("zuul", CheckStatus::Success)]);
    forge.set_merge_outcome(7, MergeOutcome::Refused("conflicts with target".to_string()));

    let component = component_with_count("osbuild", 1);
    let report = run_merge_train(
        &forge,
        &component,
        &RetryPolicy::none(),
        &NullNotifier,
        &SilentProgress,
    )
    .await
    .unwrap();

    assert_eq!(report.refused, vec![(7, "conflicts with target".to_string())]);
    assert_eq!(report.merged_count(), 0);
}

#[tokio::test]
async fn test_merges_are_announced_to_the_chat_sink() {
    let forge = MockForge::new();
    forge.set_pull_requests("osbuild", vec![make_pr(7, "packit")]);
    forge.set_checks(7, vec![make_check("zuul", CheckStatus::Success)]);

    let notifier = RecordingNotifier::new();
    let component = component_with_count("osbuild", 1);
    run_merge_train(
        &forge,
        &component,
        &RetryPolicy::none(),
        &notifier,
        &SilentProgress,
    )
    .await
    .unwrap();

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("osbuild"), "got: {}", messages[0]);
    assert!(messages[0].contains("pull-request/7"), "got: {}", messages[0]);
}

#[tokio::test]
async fn test_listing_failure_errors_the_component_run() {
    let forge = MockForge::new();
    forge.fail_list(InjectedError::Transient);

    let component = component_with_count("osbuild", 1);
    let result = run_merge_train(
        &forge,
        &component,
        &instant_retry(),
        &NullNotifier,
        &SilentProgress,
    )
    .await;

    assert!(matches!(result, Err(Error::RetriesExhausted { .. })));
}
