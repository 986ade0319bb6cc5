//! relbot - release-engineering automation
//!
//! Automates the routine chores of shipping a component through a dist-git
//! packaging pipeline: merging bot-authored pull requests once their CI
//! checks pass (the merge train), detecting releases with a complete build
//! but no published update, publishing those updates, and announcing the
//! results to a chat webhook.
//!
//! The binary is invoked periodically by an external scheduler; every run
//! is a fresh, complete re-evaluation with no state carried between
//! invocations beyond what the external services hold.

pub mod config;
pub mod error;
pub mod forge;
pub mod notify;
pub mod progress;
pub mod release;
pub mod retry;
pub mod train;
pub mod types;
