//! Error types for relbot

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the bot
///
/// The taxonomy mirrors how failures propagate: transient failures are
/// retried and then defer the current item to the next scheduled run,
/// contract violations abort the whole run, service refusals stay local
/// to the item that triggered them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Transient service failure (network, timeout, 5xx) that may succeed later
    #[error("transient service failure: {0}")]
    Transient(String),

    /// Definite refusal from the forge API
    #[error("forge API error: {0}")]
    Forge(String),

    /// Definite refusal from the update-tracking service
    #[error("update service error: {0}")]
    UpdateService(String),

    /// Definite refusal from the build-tracking service
    #[error("build service error: {0}")]
    BuildService(String),

    /// A response did not match the expected data contract
    ///
    /// Fatal for the whole run: continuing to decide on mis-parsed data
    /// could approve a merge that should not happen.
    #[error("unexpected response shape: {0}")]
    Contract(String),

    /// A bounded retry loop ran out of attempts
    #[error("{operation} failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        /// Name of the operation that was retried
        operation: String,
        /// Number of attempts made, including the first
        attempts: u32,
        /// Message of the last transient failure
        last_error: String,
    },

    /// Underlying HTTP client failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether a later attempt of the same call may succeed.
    ///
    /// This is the single retry-eligibility predicate consulted by
    /// [`crate::retry::RetryPolicy::run`].
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::Http(_))
    }
}
