//! Fixed-delay retry loop shared by both fetchers.

use crate::config::PortalConfig;
use crate::error::{ScrapeError, ScrapeResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Sequential retries with a constant pause (no backoff).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Never less than 1.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn from_config(cfg: &PortalConfig) -> Self {
        Self::new(cfg.max_attempts, cfg.retry_delay)
    }

    /// Run `op` until it succeeds or the attempts run out.
    ///
    /// `op` receives the 1-based attempt number and must start from scratch
    /// each time. When every attempt fails, the last error is returned.
    /// Non-retryable errors end the loop immediately.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> ScrapeResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ScrapeResult<T>>,
    {
        let mut last_error: Option<ScrapeError> = None;

        for attempt in 1..=self.max_attempts {
            debug!(label, attempt, "starting attempt");
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        label,
                        attempt,
                        max_attempts = self.max_attempts,
                        kind = e.kind(),
                        "attempt failed: {e}"
                    );
                    let retryable = e.is_retryable();
                    last_error = Some(e);
                    if !retryable {
                        break;
                    }
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ScrapeError::Transport(format!("{label}: no attempt was made"))
        }))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&PortalConfig::default())
    }
}
