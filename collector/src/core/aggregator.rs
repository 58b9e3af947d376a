//! Runs planned strategies and merges their awards with first-seen dedup

use std::collections::HashSet;

use shared::{RawAward, SearchStrategy, run_debug, run_error, run_info, run_warn};

use crate::core::paginator::Paginator;
use crate::error::{CollectorError, CollectorResult};
use crate::traits::PageFetcher;
use crate::types::{OutcomeStatus, QueryPlan, StrategyOutcome};

/// Merged result of every executed strategy
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub awards: Vec<RawAward>,
    pub outcomes: Vec<StrategyOutcome>,
    pub fallback_used: bool,
}

/// Accumulates unique awards across strategies in execution order
#[derive(Debug, Default)]
pub struct Aggregator {
    seen: HashSet<String>,
    awards: Vec<RawAward>,
    outcomes: Vec<StrategyOutcome>,
    last_error: Option<String>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a batch, keeping only awards whose id has not been seen yet.
    ///
    /// Returns the number of new unique awards. Awards without an id are dropped.
    pub fn absorb(&mut self, batch: Vec<RawAward>) -> usize {
        let before = self.awards.len();
        for award in batch {
            match award.id() {
                Some(id) => {
                    if self.seen.insert(id) {
                        self.awards.push(award);
                    }
                }
                None => {
                    run_debug!(award.strategy, "dropping award without id");
                }
            }
        }
        self.awards.len() - before
    }

    pub fn len(&self) -> usize {
        self.awards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.awards.is_empty()
    }

    /// Run strategies in order. A failed strategy is recorded and skipped.
    ///
    /// Returns the number of rows fetched before dedup, id-less rows included.
    pub async fn run_strategies<F>(&mut self, paginator: &Paginator, fetcher: &F, strategies: &[SearchStrategy]) -> usize
    where
        F: PageFetcher + ?Sized,
    {
        let mut total_fetched = 0;
        for strategy in strategies {
            let label = strategy.label();
            match paginator.collect(fetcher, strategy).await {
                Ok(batch) => {
                    let fetched = batch.len();
                    total_fetched += fetched;
                    let unique = self.absorb(batch);
                    run_info!(label, "✅ {} award(s), {} new", fetched, unique);
                    self.outcomes.push(StrategyOutcome {
                        label: label.to_string(),
                        status: OutcomeStatus::Completed { fetched, unique },
                    });
                }
                Err(e) => {
                    run_warn!(label, "⚠️ strategy failed, continuing: {}", e);
                    let reason = e.to_string();
                    self.last_error = Some(reason.clone());
                    self.outcomes.push(StrategyOutcome {
                        label: label.to_string(),
                        status: OutcomeStatus::Failed { reason },
                    });
                }
            }
        }
        total_fetched
    }

    /// Run the primary strategies, then the fallback set only if nothing was found
    pub async fn collect<F>(mut self, paginator: &Paginator, fetcher: &F, plan: &QueryPlan) -> CollectorResult<Aggregation>
    where
        F: PageFetcher + ?Sized,
    {
        let primary_rows = self.run_strategies(paginator, fetcher, &plan.primary).await;

        let fallback_used = primary_rows == 0 && !plan.fallback.is_empty();
        if fallback_used {
            run_info!("fallback", "🔁 no awards from primary strategies, trying start-date window");
            self.run_strategies(paginator, fetcher, &plan.fallback).await;
        }

        let mut aggregation = self.finish()?;
        aggregation.fallback_used = fallback_used;
        Ok(aggregation)
    }

    /// Close the run; fails only when every executed strategy failed
    pub fn finish(self) -> CollectorResult<Aggregation> {
        let attempted = self.outcomes.len();
        if attempted > 0 && self.outcomes.iter().all(StrategyOutcome::is_failed) {
            let last_error = self.last_error.unwrap_or_default();
            run_error!("aggregate", "❌ all {} strategies failed", attempted);
            return Err(CollectorError::CollectionFailed { attempted, last_error });
        }

        Ok(Aggregation {
            awards: self.awards,
            outcomes: self.outcomes,
            fallback_used: false,
        })
    }
}

/// First-seen dedup of an already concatenated award list
pub fn dedup_awards(awards: Vec<RawAward>) -> Vec<RawAward> {
    let mut aggregator = Aggregator::new();
    aggregator.absorb(awards);
    aggregator.awards
}
