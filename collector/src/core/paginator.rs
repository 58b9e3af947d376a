//! Offset pagination over a single search strategy

use shared::{Notification, PAGE_SIZE, RawAward, SearchStrategy, run_debug};

use crate::config::PagingConfig;
use crate::core::retry::RetryPolicy;
use crate::error::{CollectorError, CollectorResult};
use crate::traits::PageFetcher;

/// Where the page loop stands for the current strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Fetching { offset: usize },
    Done,
}

/// Drives repeated page requests for one strategy until a short page,
/// an empty page, or the page ceiling.
#[derive(Debug, Clone)]
pub struct Paginator {
    retry: RetryPolicy,
    paging: PagingConfig,
    print_fields: String,
}

impl Paginator {
    pub fn new(retry: RetryPolicy, paging: PagingConfig, print_fields: String) -> Self {
        Self {
            retry,
            paging,
            print_fields,
        }
    }

    /// Collect every award the strategy yields, tagged with its label.
    ///
    /// Notifications in any page fail the strategy with `Protocol`; transport
    /// failures surface as `Transport` once the retry policy gives up.
    pub async fn collect<F>(&self, fetcher: &F, strategy: &SearchStrategy) -> CollectorResult<Vec<RawAward>>
    where
        F: PageFetcher + ?Sized,
    {
        let label = strategy.label();
        let base_params = strategy.query_params();
        let mut awards = Vec::new();
        let mut pages = 0u32;
        let mut state = PageState::Fetching { offset: 1 };

        while let PageState::Fetching { offset } = state {
            let params = base_params
                .clone()
                .with("rpp", PAGE_SIZE.to_string())
                .with("offset", offset.to_string())
                .with("printFields", self.print_fields.as_str());

            let page = self.retry.fetch(fetcher, &params, label).await?;

            if !page.notifications.is_empty() {
                return Err(protocol_error(&page.notifications));
            }

            let returned = page.awards.len();
            run_debug!(label, "📄 offset {} returned {} award(s)", offset, returned);

            if returned == 0 {
                state = PageState::Done;
                continue;
            }

            awards.extend(page.awards.into_iter().map(|fields| RawAward::new(label, fields)));
            pages += 1;

            state = if returned < PAGE_SIZE || pages >= self.paging.max_pages {
                PageState::Done
            } else {
                tokio::time::sleep(self.paging.page_pause()).await;
                PageState::Fetching {
                    offset: offset + PAGE_SIZE,
                }
            };
        }

        Ok(awards)
    }
}

fn protocol_error(notifications: &[Notification]) -> CollectorError {
    let codes = notifications
        .iter()
        .map(|n| n.code.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let messages = notifications
        .iter()
        .map(|n| n.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    CollectorError::Protocol { codes, messages }
}
