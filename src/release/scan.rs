//! Release sweep - gather per-release facts for the status computation

use crate::config::ComponentConfig;
use crate::error::Result;
use crate::release::status::ReleaseStatus;
use crate::release::tracker::{BuildTracker, UpdateTracker};
use crate::retry::RetryPolicy;
use crate::types::{BuildState, Nvr};
use tracing::debug;

/// Gather build and update facts for every active release.
///
/// The update lookup is skipped for releases without a complete build:
/// an update cannot exist for a build that is absent or still running,
/// and the lookup would only burn a request.
pub async fn scan_releases(
    builds: &dyn BuildTracker,
    updates: &dyn UpdateTracker,
    component: &ComponentConfig,
    version: &str,
    retry: &RetryPolicy,
) -> Result<Vec<ReleaseStatus>> {
    let releases = retry
        .run("release listing", || updates.active_releases())
        .await?;
    debug!(
        component = %component.name,
        version,
        releases = releases.len(),
        "scanning releases"
    );

    let mut statuses = Vec::with_capacity(releases.len());
    for release in releases {
        let nvr = Nvr::new(&component.name, version, &component.build_release, &release);

        let build = retry
            .run("build lookup", || builds.build_state(&nvr))
            .await?;

        let update_published = if build == Some(BuildState::Complete) {
            retry
                .run("update lookup", || updates.update_exists(&nvr))
                .await?
        } else {
            false
        };

        statuses.push(ReleaseStatus {
            release,
            build,
            update_published,
        });
    }

    Ok(statuses)
}
