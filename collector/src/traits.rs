//! Collector trait definitions for dependency injection

use async_trait::async_trait;

use shared::{FetchFailure, Page, QueryParams};

/// Single request against the award-search endpoint.
///
/// Implementations perform exactly one network call per invocation and never
/// retry; retries belong to the retry policy wrapped around them.
#[mockall::automock]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page for the complete parameter set (strategy, paging, fields)
    async fn fetch_page(&self, params: &QueryParams) -> Result<Page, FetchFailure>;
}
