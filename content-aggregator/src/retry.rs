use crate::types::{Result, RetryPolicy};
use backoff::backoff::Backoff;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff schedule growing by a fixed step: `base`, `2 * base`, `3 * base`...
/// Yields `None` once the attempt budget is spent.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: Duration,
    max_attempts: u32,
    attempt: u32,
}

impl LinearBackoff {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            base: policy.base_delay,
            max_attempts: policy.max_attempts.max(1),
            attempt: 0,
        }
    }
}

impl Backoff for LinearBackoff {
    fn reset(&mut self) {
        self.attempt = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }
        Some(self.base * self.attempt)
    }
}

/// Runs one fallible async operation under a bounded retry budget.
///
/// Failures never escape: once the budget is exhausted a warning is logged
/// and `None` is returned, which callers treat as an empty result.
#[derive(Debug, Clone)]
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn execute<T, F, Fut>(&self, label: &str, mut operation: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut backoff = LinearBackoff::new(self.policy);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", label, attempt);
                    }
                    return Some(value);
                }
                Err(e) => match backoff.next_backoff() {
                    Some(delay) => {
                        debug!("Attempt {} failed for {}: {}; retrying in {:?}", attempt, label, e, delay);
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        warn!("Failed to fetch {} after {} attempts: {}", label, attempt, e);
                        return None;
                    }
                },
            }
        }
    }
}

impl Default for RetryController {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
