//! Bounded retry with exponential backoff
//!
//! Transient failures on idempotent calls are retried a fixed number of
//! times with exponentially growing delays. Exhaustion yields a
//! distinguishable [`Error::RetriesExhausted`] instead of looping forever.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Bounded retry policy for transient failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy that makes a single attempt and never sleeps
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay applied after the failed attempt number `attempt` (1-based).
    ///
    /// Doubles per attempt, capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails non-transiently, or attempts exhaust.
    ///
    /// Non-transient errors (see [`Error::is_transient`]) are returned
    /// immediately: a contract violation or a definite API refusal will not
    /// change on a second attempt. `operation` names the call in the
    /// exhaustion error and in backoff log events.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    last_error = e.to_string();
                    if attempt < attempts {
                        let delay = self.delay_for(attempt);
                        debug!(
                            operation,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "transient failure, backing off"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(Error::RetriesExhausted {
            operation: operation.to_string(),
            attempts,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    #[test]
    fn delay_schedule_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        // 400ms capped at 350ms
        assert_eq!(policy.delay_for(3), Duration::from_millis(350));
        assert_eq!(policy.delay_for(10), Duration::from_millis(350));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = instant_policy(3)
            .run("test op", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(Error::Transient("flaky".to_string()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_names_the_operation() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = instant_policy(3)
            .run("check fetch", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::Transient("down".to_string())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(Error::RetriesExhausted {
                operation,
                attempts,
                ..
            }) => {
                assert_eq!(operation, "check fetch");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected RetriesExhausted, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_transient_error_short_circuits() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = instant_policy(3)
            .run("test op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::Contract("bad shape".to_string())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(Error::Contract(_))));
    }
}
