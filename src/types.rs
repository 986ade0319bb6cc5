//! Core types for relbot

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Status of a single CI check reported on a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The check is still running or queued
    Pending,
    /// The check passed
    Success,
    /// The check failed
    Failure,
}

impl CheckStatus {
    /// Classify a raw status string reported by the forge.
    ///
    /// Only `pending`, `success` and `failure` are part of the data
    /// contract; any other value means the forge's status vocabulary
    /// changed and is surfaced as a [`Error::Contract`] violation rather
    /// than fed into a merge decision.
    pub fn classify(raw: &str) -> Result<Self> {
        match raw {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            other => Err(Error::Contract(format!("unknown check status {other:?}"))),
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// A single CI check result attached to a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the reporting CI account (e.g. "zuul")
    pub name: String,
    /// Reported status
    pub status: CheckStatus,
}

impl CheckResult {
    /// Create a check result
    pub fn new(name: impl Into<String>, status: CheckStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Merge eligibility of one pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeDecision {
    /// Not enough data to decide; re-evaluated on the next scheduled run
    NotReady,
    /// A check failed; the pull request must not be auto-merged
    Rejected,
    /// All required checks passed; safe to merge
    Approved,
}

impl std::fmt::Display for MergeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "not ready"),
            Self::Rejected => write!(f, "rejected"),
            Self::Approved => write!(f, "approved"),
        }
    }
}

/// Per-component policy deciding when a pull request's checks suffice
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckPolicy {
    /// Exactly this many checks must be reported, all successful.
    ///
    /// Strict equality: more checks than expected is as inconclusive as
    /// fewer. A count of 0 approves an empty check set immediately, so
    /// configuration validation rejects it.
    ExpectedCount(usize),
    /// These named checks must all be reported successful.
    ///
    /// Unrelated checks reported by the forge never affect the decision,
    /// so a new CI service appearing on the forge cannot silently stall
    /// or unblock the train.
    RequiredChecks(BTreeSet<String>),
}

impl CheckPolicy {
    /// Build a named-check policy from an iterator of check names
    pub fn required<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::RequiredChecks(names.into_iter().map(Into::into).collect())
    }
}

/// An open pull request on the forge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request id, unique within the component
    pub id: u64,
    /// Login of the account that opened the pull request
    pub author: String,
    /// Pull request title
    pub title: String,
    /// Web URL of the pull request
    pub html_url: String,
}

/// Outcome of a call to the forge merge endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The pull request was merged by this call
    Merged,
    /// The pull request had already been merged; a safe no-op
    AlreadyMerged,
    /// The forge declined the merge (message from the response)
    Refused(String),
}

impl MergeOutcome {
    /// Whether the pull request ended up merged
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Merged | Self::AlreadyMerged)
    }
}

/// An active distribution release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release version (e.g. "41")
    pub version: String,
    /// Dist tag appended to build identifiers (e.g. "fc41")
    pub dist_tag: String,
}

impl std::fmt::Display for Release {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Name-version-release build identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nvr {
    /// Component name
    pub name: String,
    /// Component version
    pub version: String,
    /// Package release field (usually "1")
    pub build_release: String,
    /// Dist tag of the target release
    pub dist_tag: String,
}

impl Nvr {
    /// Build the NVR of `name` at `version` for one release
    pub fn new(name: &str, version: &str, build_release: &str, release: &Release) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            build_release: build_release.to_string(),
            dist_tag: release.dist_tag.clone(),
        }
    }
}

impl std::fmt::Display for Nvr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}.{}",
            self.name, self.version, self.build_release, self.dist_tag
        )
    }
}

/// Build state reported by the build-tracking service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// The build finished successfully
    Complete,
    /// The build is queued or running
    InProgress,
    /// The build failed
    Failed,
}

impl BuildState {
    /// Classify a raw state string reported by the build-tracking service.
    ///
    /// Unknown values violate the data contract, same as check statuses.
    pub fn classify(raw: &str) -> Result<Self> {
        match raw {
            "complete" => Ok(Self::Complete),
            "building" => Ok(Self::InProgress),
            "failed" => Ok(Self::Failed),
            other => Err(Error::Contract(format!("unknown build state {other:?}"))),
        }
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::InProgress => write!(f, "building"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// An update published in the update-tracking service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedUpdate {
    /// Service-assigned update identifier
    pub alias: String,
    /// Web URL of the update
    pub url: String,
    /// When the update was submitted, if the service reports it
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Outcome of an update-creation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new update was created
    Created(PublishedUpdate),
    /// An update for this build already exists; a safe no-op
    AlreadyExists,
}
