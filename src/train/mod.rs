//! Merge train for bot-authored pull requests
//!
//! Two-layer pattern:
//! 1. Decide - pure evaluation of fetched check results (testable)
//! 2. Drive - list, evaluate and merge via the forge client (effectful)

mod decide;
mod driver;

pub use decide::{CheckEvaluation, decide, evaluate};
pub use driver::{SkippedPr, TrainReport, run_merge_train};
