//! Merge train driver - effectful iteration over open pull requests
//!
//! Each invocation is a fresh, complete re-evaluation: list the open
//! bot-authored pull requests, evaluate each against the component's check
//! policy, merge the approved ones. Failures local to one pull request
//! never abort processing of its siblings; only a data-contract violation
//! aborts the run.

use crate::config::ComponentConfig;
use crate::error::{Error, Result};
use crate::forge::ForgeClient;
use crate::notify::Notifier;
use crate::progress::Progress;
use crate::retry::RetryPolicy;
use crate::train::decide::evaluate;
use crate::types::{MergeDecision, MergeOutcome};
use tracing::{debug, info, warn};

/// A pull request this run left open, and why
#[derive(Debug, Clone)]
pub struct SkippedPr {
    /// Pull request id
    pub pr_id: u64,
    /// The decision that kept it open
    pub decision: MergeDecision,
    /// Human-readable reasons from the evaluation
    pub reasons: Vec<String>,
}

/// Outcome of one merge train run for a component
#[derive(Debug, Clone, Default)]
pub struct TrainReport {
    /// Pull requests merged by this run
    pub merged: Vec<u64>,
    /// Pull requests that turned out to be merged already
    pub already_merged: Vec<u64>,
    /// Pull requests left open with a NotReady/Rejected decision
    pub skipped: Vec<SkippedPr>,
    /// Pull requests deferred because their checks could not be fetched
    pub deferred: Vec<u64>,
    /// Pull requests whose merge was refused or failed, with the message
    pub refused: Vec<(u64, String)>,
}

impl TrainReport {
    /// Number of pull requests merged by this run
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.merged.len()
    }

    /// Whether the run had nothing to act on at all
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.merged.is_empty()
            && self.already_merged.is_empty()
            && self.skipped.is_empty()
            && self.deferred.is_empty()
            && self.refused.is_empty()
    }
}

/// Run the merge train for one component.
///
/// Transient failures on one pull request defer it to the next scheduled
/// invocation of the whole driver; nothing is re-attempted within a run
/// beyond the bounded retry policy. The merge endpoint is idempotent
/// (already-merged is a recognized no-op), so the write path is retried
/// under the same policy as the reads.
pub async fn run_merge_train(
    forge: &dyn ForgeClient,
    component: &ComponentConfig,
    retry: &RetryPolicy,
    notifier: &dyn Notifier,
    progress: &dyn Progress,
) -> Result<TrainReport> {
    let policy = component.check_policy()?;

    let prs = retry
        .run("pull-request listing", || {
            forge.list_open_pull_requests(&component.name)
        })
        .await?;

    let mut report = TrainReport::default();
    if prs.is_empty() {
        info!(component = %component.name, "no open pull requests");
        return Ok(report);
    }

    progress
        .on_message(&format!(
            "found {} open pull request(s) for {}",
            prs.len(),
            component.name
        ))
        .await;

    for pr in &prs {
        let results = match retry
            .run("check fetch", || forge.fetch_checks(&component.name, pr.id))
            .await
        {
            Ok(results) => results,
            // The aggregator's data contract changed; deciding on
            // mis-parsed data could approve a merge that should not happen.
            Err(e @ Error::Contract(_)) => return Err(e),
            Err(e) => {
                warn!(pr_id = pr.id, error = %e, "deferring pull request to the next run");
                report.deferred.push(pr.id);
                continue;
            }
        };

        let evaluation = evaluate(&results, &policy);
        match evaluation.decision {
            MergeDecision::Approved => {
                progress
                    .on_message(&format!("merging PR #{}: {}", pr.id, pr.title))
                    .await;

                match retry
                    .run("merge", || forge.merge_pull_request(&component.name, pr.id))
                    .await
                {
                    Ok(MergeOutcome::Merged) => {
                        info!(pr_id = pr.id, component = %component.name, "merged pull request");
                        notifier
                            .notify(&format!(
                                "Merged pull request for {}: {}",
                                component.name, pr.html_url
                            ))
                            .await;
                        report.merged.push(pr.id);
                    }
                    Ok(MergeOutcome::AlreadyMerged) => {
                        info!(pr_id = pr.id, "pull request was already merged");
                        report.already_merged.push(pr.id);
                    }
                    Ok(MergeOutcome::Refused(message)) => {
                        warn!(pr_id = pr.id, %message, "merge refused, leaving open");
                        report.refused.push((pr.id, message));
                    }
                    Err(e @ Error::Contract(_)) => return Err(e),
                    Err(e) => {
                        warn!(pr_id = pr.id, error = %e, "merge failed, leaving open");
                        report.refused.push((pr.id, e.to_string()));
                    }
                }
            }
            decision => {
                debug!(
                    pr_id = pr.id,
                    %decision,
                    reasons = ?evaluation.reasons,
                    "leaving pull request open"
                );
                progress
                    .on_message(&format!(
                        "skipping PR #{} ({}): {}",
                        pr.id,
                        decision,
                        evaluation.reasons.join(", ")
                    ))
                    .await;
                report.skipped.push(SkippedPr {
                    pr_id: pr.id,
                    decision,
                    reasons: evaluation.reasons,
                });
            }
        }
    }

    Ok(report)
}
