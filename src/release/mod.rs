//! Missing-update detection across active distribution releases
//!
//! Three-phase pattern shared with the merge train:
//! 1. Gather - per-release build and update lookups (effectful, bounded)
//! 2. Compute - `missing_updates` over the gathered facts (pure, testable)
//! 3. Act - update creation, driven from the CLI

mod scan;
mod status;
mod tracker;

pub use scan::scan_releases;
pub use status::{ReleaseStatus, builds_in_flight, missing_updates};
pub use tracker::{BuildServiceClient, BuildTracker, UpdateServiceClient, UpdateTracker};
