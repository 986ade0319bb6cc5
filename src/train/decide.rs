//! Merge decision engine - pure functions over fetched check results
//!
//! No I/O happens here. The driver fetches the current check set and calls
//! in; the engine is re-run from scratch on every scheduled invocation.

use crate::types::{CheckPolicy, CheckResult, CheckStatus, MergeDecision};
use std::collections::BTreeSet;

/// A decision together with the reasons behind a non-approved outcome
#[derive(Debug, Clone)]
pub struct CheckEvaluation {
    /// The merge decision
    pub decision: MergeDecision,
    /// Human-readable reasons; empty when approved
    pub reasons: Vec<String>,
}

impl CheckEvaluation {
    fn approved() -> Self {
        Self {
            decision: MergeDecision::Approved,
            reasons: Vec::new(),
        }
    }

    fn not_ready(reason: String) -> Self {
        Self {
            decision: MergeDecision::NotReady,
            reasons: vec![reason],
        }
    }

    fn rejected(reason: String) -> Self {
        Self {
            decision: MergeDecision::Rejected,
            reasons: vec![reason],
        }
    }
}

/// Decide merge eligibility for one pull request.
///
/// Check results are eventually consistent: they trickle in while CI runs,
/// so an inconclusive set yields [`MergeDecision::NotReady`] and the caller
/// re-evaluates on the next scheduled run.
///
/// For [`CheckPolicy::ExpectedCount`], precedence is:
/// 1. a reported count different from the expected count (strictly, not
///    "at least") is NotReady;
/// 2. any failure rejects;
/// 3. any pending is NotReady;
/// 4. otherwise approved.
///
/// For [`CheckPolicy::RequiredChecks`] the same precedence is applied to
/// the required names: a failed required check rejects even while another
/// required check is still pending or missing, and checks outside the
/// required set never affect the decision.
#[must_use]
pub fn decide(results: &[CheckResult], policy: &CheckPolicy) -> MergeDecision {
    evaluate(results, policy).decision
}

/// Like [`decide`], but also reports why a pull request was not approved
#[must_use]
pub fn evaluate(results: &[CheckResult], policy: &CheckPolicy) -> CheckEvaluation {
    match policy {
        CheckPolicy::ExpectedCount(expected) => evaluate_count(results, *expected),
        CheckPolicy::RequiredChecks(required) => evaluate_named(results, required),
    }
}

fn evaluate_count(results: &[CheckResult], expected: usize) -> CheckEvaluation {
    if results.len() != expected {
        return CheckEvaluation::not_ready(format!(
            "{}/{} checks reported",
            results.len(),
            expected
        ));
    }

    let failed: Vec<&str> = results
        .iter()
        .filter(|r| r.status == CheckStatus::Failure)
        .map(|r| r.name.as_str())
        .collect();
    if !failed.is_empty() {
        return CheckEvaluation::rejected(format!("failed checks: {}", failed.join(", ")));
    }

    if results.iter().any(|r| r.status == CheckStatus::Pending) {
        return CheckEvaluation::not_ready("checks still running".to_string());
    }

    CheckEvaluation::approved()
}

fn evaluate_named(results: &[CheckResult], required: &BTreeSet<String>) -> CheckEvaluation {
    let mut failed = Vec::new();
    let mut waiting = Vec::new();

    for name in required {
        match results.iter().find(|r| &r.name == name) {
            Some(r) if r.status == CheckStatus::Failure => failed.push(name.as_str()),
            Some(r) if r.status == CheckStatus::Pending => waiting.push(name.as_str()),
            Some(_) => {}
            None => waiting.push(name.as_str()),
        }
    }

    if !failed.is_empty() {
        return CheckEvaluation::rejected(format!("failed checks: {}", failed.join(", ")));
    }
    if !waiting.is_empty() {
        return CheckEvaluation::not_ready(format!(
            "waiting for checks: {}",
            waiting.join(", ")
        ));
    }

    CheckEvaluation::approved()
}
