//! Release status - pure computation over tracker lookups
//!
//! No I/O happens here; the sweep in [`crate::release::scan_releases`]
//! gathers the facts and calls in.

use crate::types::{BuildState, Release};

/// Facts gathered about one release
#[derive(Debug, Clone)]
pub struct ReleaseStatus {
    /// The release
    pub release: Release,
    /// Build state; `None` when the build-tracking service has no such build
    pub build: Option<BuildState>,
    /// Whether an update is already published for the build
    pub update_published: bool,
}

impl ReleaseStatus {
    /// Whether this release has a complete build but no published update
    #[must_use]
    pub const fn needs_update(&self) -> bool {
        matches!(self.build, Some(BuildState::Complete)) && !self.update_published
    }

    /// Whether the build is absent or still running (submission in flight)
    #[must_use]
    pub const fn build_in_flight(&self) -> bool {
        matches!(self.build, None | Some(BuildState::InProgress))
    }
}

/// Releases with a complete build and no published update
#[must_use]
pub fn missing_updates(statuses: &[ReleaseStatus]) -> Vec<Release> {
    statuses
        .iter()
        .filter(|s| s.needs_update())
        .map(|s| s.release.clone())
        .collect()
}

/// Releases whose build has not completed yet
#[must_use]
pub fn builds_in_flight(statuses: &[ReleaseStatus]) -> Vec<Release> {
    statuses
        .iter()
        .filter(|s| s.build_in_flight())
        .map(|s| s.release.clone())
        .collect()
}
