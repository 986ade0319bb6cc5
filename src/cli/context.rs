//! Shared command context for CLI commands
//!
//! Extracts the client construction shared by the train and updates
//! commands.

use relbot::config::BotConfig;
use relbot::error::{Error, Result};
use relbot::forge::DistGitClient;
use relbot::notify::{Notifier, notifier_from_config};
use relbot::release::{BuildServiceClient, UpdateServiceClient};
use relbot::retry::RetryPolicy;

/// Shared context: clients built once from the validated configuration
pub struct CommandContext {
    /// Forge client
    pub forge: DistGitClient,
    /// Chat sink (no-op when no webhook is configured)
    pub notifier: Box<dyn Notifier>,
    /// Retry policy applied to idempotent service calls
    pub retry: RetryPolicy,
}

impl CommandContext {
    /// Build the context from a loaded configuration
    pub fn new(config: &BotConfig) -> Result<Self> {
        let forge = DistGitClient::from_config(&config.forge)?;
        let notifier = notifier_from_config(&config.notify)?;

        Ok(Self {
            forge,
            notifier,
            retry: RetryPolicy::default(),
        })
    }

    /// Update-tracking client; the `updates` and `releases` commands need it
    pub fn update_tracker(config: &BotConfig) -> Result<UpdateServiceClient> {
        let updates = config.updates.as_ref().ok_or_else(|| {
            Error::Config("an [updates] section is required for this command".to_string())
        })?;
        UpdateServiceClient::from_config(updates)
    }

    /// Build-tracking client; the `updates` command needs it
    pub fn build_tracker(config: &BotConfig) -> Result<BuildServiceClient> {
        let builds = config.builds.as_ref().ok_or_else(|| {
            Error::Config("a [builds] section is required for this command".to_string())
        })?;
        BuildServiceClient::from_config(builds)
    }
}
