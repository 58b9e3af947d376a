//! Collector-specific data types

use serde::{Deserialize, Serialize};
use shared::{AwardTable, SearchStrategy};

/// Ordered strategies for one run
#[derive(Debug, Clone, Default)]
pub struct QueryPlan {
    /// Exact, keyword and geographic strategies, in execution order
    pub primary: Vec<SearchStrategy>,
    /// Start-date variants, run only when the primary set yields no rows
    pub fallback: Vec<SearchStrategy>,
}

impl QueryPlan {
    pub fn len(&self) -> usize {
        self.primary.len() + self.fallback.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.fallback.is_empty()
    }
}

/// How a single strategy ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    Completed { fetched: usize, unique: usize },
    Failed { reason: String },
}

/// Per-strategy entry of the run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub label: String,
    pub status: OutcomeStatus,
}

impl StrategyOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

/// Everything a run hands to the output shell
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionReport {
    pub table: AwardTable,
    pub outcomes: Vec<StrategyOutcome>,
    pub fallback_used: bool,
}

impl CollectionReport {
    pub fn failed_strategies(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}
