//! Bounded retry with exponential backoff around single page requests

use std::time::Duration;

use shared::{FetchFailure, Page, QueryParams, run_warn};

use crate::config::RetryConfig;
use crate::error::{CollectorError, CollectorResult};
use crate::traits::PageFetcher;

/// Retries transient transport failures; everything else passes straight through
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// Delay before retry number `attempt` (0-based).
    ///
    /// A `Retry-After` hint wins over the exponential schedule; both are capped
    /// at the configured maximum.
    pub fn backoff_delay(&self, attempt: u32, failure: &FetchFailure) -> Duration {
        let delay = failure.retry_after().unwrap_or_else(|| {
            let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
            self.config.base_delay().saturating_mul(factor)
        });
        delay.min(self.config.max_delay())
    }

    /// Run one page request, retrying up to `max_retries` times
    pub async fn fetch<F>(&self, fetcher: &F, params: &QueryParams, label: &str) -> CollectorResult<Page>
    where
        F: PageFetcher + ?Sized,
    {
        let mut attempt = 0u32;

        loop {
            match fetcher.fetch_page(params).await {
                Ok(page) => return Ok(page),
                Err(failure) if failure.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.backoff_delay(attempt, &failure);
                    run_warn!(
                        label,
                        "⏳ {} (attempt {}), retrying in {}ms",
                        failure,
                        attempt + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => {
                    return Err(CollectorError::Transport {
                        failure,
                        attempts: attempt + 1,
                    });
                }
            }
        }
    }
}
