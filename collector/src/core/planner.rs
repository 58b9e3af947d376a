//! Expands organizations and a date window into ordered search strategies

use shared::{DateWindow, SearchStrategy};

use crate::error::{CollectorError, CollectorResult};
use crate::types::QueryPlan;

/// Builds the strategy list for one run.
///
/// Higher-precision strategies come first so first-seen dedup keeps the most
/// precise copy of an award.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    organizations: Vec<String>,
    window: DateWindow,
    state_code: Option<String>,
    stems: Vec<String>,
}

impl QueryPlanner {
    pub fn new(organizations: Vec<String>, window: DateWindow) -> Self {
        let organizations = organizations
            .into_iter()
            .map(|org| org.trim().to_string())
            .filter(|org| !org.is_empty())
            .collect();
        Self {
            organizations,
            window,
            state_code: None,
            stems: Vec::new(),
        }
    }

    /// Add the geographic safety net. Empty `stems` derives them from the organizations.
    pub fn with_state_sweep(mut self, state_code: impl Into<String>, stems: Vec<String>) -> Self {
        self.state_code = Some(state_code.into());
        self.stems = stems;
        self
    }

    pub fn plan(&self) -> CollectorResult<QueryPlan> {
        if self.organizations.is_empty() {
            return Err(CollectorError::config("at least one organization is required"));
        }

        let mut primary = Vec::with_capacity(self.organizations.len() * 3 + 1);

        for org in &self.organizations {
            primary.push(SearchStrategy::exact_name(org, self.window));
        }

        for org in &self.organizations {
            primary.push(SearchStrategy::phrase_keyword(org, self.window));
            primary.push(SearchStrategy::keyword(org, self.window));
        }

        if let Some(state) = &self.state_code {
            let stems = if self.stems.is_empty() {
                derive_stems(&self.organizations)
            } else {
                self.stems.clone()
            };
            primary.push(SearchStrategy::state_sweep(state, &stems, self.window));
        }

        let fallback = self
            .organizations
            .iter()
            .map(|org| SearchStrategy::start_date_fallback(org, self.window))
            .collect();

        Ok(QueryPlan { primary, fallback })
    }
}

/// First word of each organization, case-insensitively deduplicated in order
pub fn derive_stems(organizations: &[String]) -> Vec<String> {
    let mut stems: Vec<String> = Vec::new();
    for org in organizations {
        if let Some(stem) = org.split_whitespace().next() {
            if !stems.iter().any(|s| s.eq_ignore_ascii_case(stem)) {
                stems.push(stem.to_string());
            }
        }
    }
    stems
}
