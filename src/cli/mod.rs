//! CLI commands for the relbot binary

pub mod context;
pub mod style;
pub mod train;
pub mod updates;

use async_trait::async_trait;
use relbot::progress::Progress;
use style::Stylize;

/// Progress sink printing compact status lines to the terminal
#[derive(Debug, Clone, Copy)]
pub struct CliProgress;

impl CliProgress {
    /// Compact single-line progress output
    pub const fn compact() -> Self {
        Self
    }
}

#[async_trait]
impl Progress for CliProgress {
    async fn on_message(&self, message: &str) {
        anstream::println!("  {}", message.muted());
    }
}
