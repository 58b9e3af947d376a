//! Real page fetcher backed by a reqwest client

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;

use shared::{FetchFailure, Page, QueryParams, parse_envelope};

use crate::config::FetchConfig;
use crate::error::{CollectorError, CollectorResult};
use crate::traits::PageFetcher;

/// Award-search client. Construct once per run and pass it to the collector.
pub struct RealPageFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl RealPageFetcher {
    pub fn new(config: &FetchConfig) -> CollectorResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| CollectorError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PageFetcher for RealPageFetcher {
    async fn fetch_page(&self, params: &QueryParams) -> Result<Page, FetchFailure> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params.as_slice())
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            return Err(FetchFailure::from_status(status.as_u16(), retry_after_secs));
        }

        let body = response.text().await.map_err(classify_reqwest_error)?;

        parse_envelope(&body).map_err(|e| FetchFailure::MalformedBody(e.to_string()))
    }
}

fn classify_reqwest_error(error: reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_connect() || error.is_body() || error.is_request() {
        FetchFailure::Connection(error.to_string())
    } else if error.is_decode() {
        FetchFailure::MalformedBody(error.to_string())
    } else {
        FetchFailure::Request(error.to_string())
    }
}
