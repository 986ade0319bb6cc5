//! Bot configuration
//!
//! An explicit configuration structure passed into the drivers at
//! construction. Loaded from a TOML file; secrets can be supplied through
//! environment variables instead of the file.

use crate::error::{Error, Result};
use crate::types::CheckPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `forge.token`
pub const FORGE_TOKEN_ENV: &str = "RELBOT_FORGE_TOKEN";

/// Environment variable overriding `notify.webhook_url`
pub const WEBHOOK_URL_ENV: &str = "RELBOT_WEBHOOK_URL";

/// Config filename within the user config directory
const CONFIG_FILE: &str = "relbot.toml";

/// Forge connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Base URL of the dist-git forge (e.g. "https://src.fedoraproject.org")
    pub api_base: String,
    /// Account that authors the automated pull requests
    pub bot_account: String,
    /// API token used for merge calls; [`FORGE_TOKEN_ENV`] overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Update-tracking service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatesConfig {
    /// Base URL of the update-tracking service
    pub api_base: String,
    /// Only releases with this id prefix count as active (None = all)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_prefix: Option<String>,
}

/// Build-tracking service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildsConfig {
    /// Base URL of the build-tracking service
    pub api_base: String,
}

/// Chat notification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook URL for outbound messages; [`WEBHOOK_URL_ENV`] overrides.
    /// When unset, notifications are silently dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

/// One component managed by the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Package name as known to the forge
    pub name: String,
    /// Number of checks that must be reported, all successful.
    /// Mutually exclusive with `required_checks`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_checks: Option<usize>,
    /// Names of the checks that must pass; other checks are ignored.
    /// Mutually exclusive with `expected_checks`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_checks: Option<Vec<String>>,
    /// Package release field used to form build NVRs
    #[serde(default = "default_build_release")]
    pub build_release: String,
}

fn default_build_release() -> String {
    "1".to_string()
}

impl ComponentConfig {
    /// Resolve the check policy for this component.
    ///
    /// Exactly one of `expected_checks` / `required_checks` must be set,
    /// and a count of 0 is rejected: it would approve a pull request the
    /// moment its (empty) check set is fetched.
    pub fn check_policy(&self) -> Result<CheckPolicy> {
        match (self.expected_checks, &self.required_checks) {
            (Some(_), Some(_)) => Err(Error::Config(format!(
                "component '{}': expected_checks and required_checks are mutually exclusive",
                self.name
            ))),
            (Some(0), None) => Err(Error::Config(format!(
                "component '{}': expected_checks must be at least 1 \
                 (0 would merge before any check reports)",
                self.name
            ))),
            (Some(count), None) => Ok(CheckPolicy::ExpectedCount(count)),
            (None, Some(names)) if !names.is_empty() => {
                Ok(CheckPolicy::required(names.iter().cloned()))
            }
            _ => Err(Error::Config(format!(
                "component '{}': set expected_checks or required_checks",
                self.name
            ))),
        }
    }
}

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Forge connection
    pub forge: ForgeConfig,
    /// Update-tracking service; required by the `updates` command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<UpdatesConfig>,
    /// Build-tracking service; required by the `updates` command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builds: Option<BuildsConfig>,
    /// Chat notifications
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Components managed by the bot
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentConfig>,
}

impl BotConfig {
    /// Default config path under the user config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("relbot").join(CONFIG_FILE))
    }

    /// Load from `path`, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        let mut config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Find a configured component by name
    pub fn component(&self, name: &str) -> Option<&ComponentConfig> {
        self.components.iter().find(|c| c.name == name)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            env::var(FORGE_TOKEN_ENV).ok(),
            env::var(WEBHOOK_URL_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, token: Option<String>, webhook: Option<String>) {
        if let Some(token) = token
            && !token.is_empty()
        {
            self.forge.token = Some(token);
        }
        if let Some(webhook) = webhook
            && !webhook.is_empty()
        {
            self.notify.webhook_url = Some(webhook);
        }
    }

    fn validate(&self) -> Result<()> {
        validate_url("forge.api_base", &self.forge.api_base)?;
        if let Some(ref updates) = self.updates {
            validate_url("updates.api_base", &updates.api_base)?;
        }
        if let Some(ref builds) = self.builds {
            validate_url("builds.api_base", &builds.api_base)?;
        }
        if let Some(ref webhook) = self.notify.webhook_url {
            validate_url("notify.webhook_url", webhook)?;
        }

        if self.forge.bot_account.trim().is_empty() {
            return Err(Error::Config("forge.bot_account must not be empty".to_string()));
        }

        for component in &self.components {
            component.check_policy()?;
        }

        let mut seen = std::collections::BTreeSet::new();
        for component in &self.components {
            if !seen.insert(&component.name) {
                return Err(Error::Config(format!(
                    "component '{}' is configured twice",
                    component.name
                )));
            }
        }

        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    url::Url::parse(value)
        .map_err(|e| Error::Config(format!("{field} is not a valid URL: {e}")))?;
    Ok(())
}
