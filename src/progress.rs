//! Progress reporting for long-running drivers
//!
//! The library never prints; drivers hand status lines to a [`Progress`]
//! sink and the binary decides how to render them.

use async_trait::async_trait;
use tracing::info;

/// Callback receiving human-readable progress messages
#[async_trait]
pub trait Progress: Send + Sync {
    /// Report one progress message
    async fn on_message(&self, message: &str);
}

/// Progress sink forwarding messages to tracing at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

#[async_trait]
impl Progress for LogProgress {
    async fn on_message(&self, message: &str) {
        info!("{message}");
    }
}

/// Progress sink that discards messages
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

#[async_trait]
impl Progress for SilentProgress {
    async fn on_message(&self, _message: &str) {}
}
