//! Collector: wires planner, paginator, aggregator and normalizer into one run

use chrono::NaiveDate;
use shared::{DateWindow, logging};

use crate::config::CollectorConfig;
use crate::core::{Aggregator, Paginator, QueryPlanner, RetryPolicy, normalize};
use crate::error::CollectorResult;
use crate::traits::PageFetcher;
use crate::types::{CollectionReport, QueryPlan};

/// One-shot award collection over an injected page fetcher
pub struct Collector<F>
where
    F: PageFetcher,
{
    config: CollectorConfig,
    fetcher: F,
}

impl<F> Collector<F>
where
    F: PageFetcher,
{
    pub fn new(config: CollectorConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Strategies a run starting on `today` would execute
    pub fn plan(&self, today: NaiveDate) -> CollectorResult<QueryPlan> {
        let window = DateWindow::lookback(today, self.config.years_back)?;
        let mut planner = QueryPlanner::new(self.config.organizations.clone(), window);
        if let Some(state) = &self.config.state_code {
            planner = planner.with_state_sweep(state.as_str(), self.config.stems.clone());
        }
        planner.plan()
    }

    /// Execute the full pipeline for a window ending on `today`
    pub async fn run(&self, today: NaiveDate) -> CollectorResult<CollectionReport> {
        self.config.validate()?;

        let plan = self.plan(today)?;
        logging::log_startup(&format!(
            "collection: {} organization(s), {} primary + {} fallback strategies, {} year window",
            self.config.organizations.len(),
            plan.primary.len(),
            plan.fallback.len(),
            self.config.years_back
        ));

        let paginator = Paginator::new(
            RetryPolicy::new(self.config.retry.clone()),
            self.config.paging.clone(),
            self.config.fetch.print_fields_param(),
        );

        let aggregation = Aggregator::new()
            .collect(&paginator, &self.fetcher, &plan)
            .await?;

        let table = normalize(&aggregation.awards);
        logging::log_success(&format!("collected {} unique award(s)", table.len()));

        Ok(CollectionReport {
            table,
            outcomes: aggregation.outcomes,
            fallback_used: aggregation.fallback_used,
        })
    }
}
