//! Core shared types: date windows, search strategies and transport failures

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// Number of records the award endpoint returns per page (`rpp`)
pub const PAGE_SIZE: usize = 25;

/// Date format the award endpoint expects for window bounds
pub const API_DATE_FORMAT: &str = "%m/%d/%Y";

/// Which award date a window filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateField {
    /// Award date (initial amendment): `dateStart` / `dateEnd`
    AwardDate,
    /// Award start date: `startDateStart` / `startDateEnd`
    StartDate,
}

impl DateField {
    /// Query parameter names for the lower and upper bound
    pub fn param_keys(&self) -> (&'static str, &'static str) {
        match self {
            DateField::AwardDate => ("dateStart", "dateEnd"),
            DateField::StartDate => ("startDateStart", "startDateEnd"),
        }
    }
}

/// Inclusive date window used to bound every query of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> SharedResult<Self> {
        if start > end {
            return Err(SharedError::InvalidDateWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window reaching `years_back` years (of 365 days) before `today`.
    ///
    /// Fails when the start would fall outside the representable calendar.
    pub fn lookback(today: NaiveDate, years_back: u32) -> SharedResult<Self> {
        let start = Duration::try_days(365 * i64::from(years_back))
            .and_then(|span| today.checked_sub_signed(span))
            .ok_or_else(|| SharedError::InvalidDateWindow {
                start: format!("{years_back} years before {today}"),
                end: today.to_string(),
            })?;
        Ok(Self { start, end: today })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Bounds formatted for the endpoint (`MM/DD/YYYY`)
    pub fn formatted(&self) -> (String, String) {
        (
            self.start.format(API_DATE_FORMAT).to_string(),
            self.end.format(API_DATE_FORMAT).to_string(),
        )
    }
}

/// Shape of a planned query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// `awardeeName` exact match
    ExactName,
    /// `keyword` search with the quoted organization name
    PhraseKeyword,
    /// `keyword` search with the bare organization name
    Keyword,
    /// `awardeeStateCode` combined with OR-joined name stems
    StateSweep,
    /// `awardeeName` exact match over the start-date window
    StartDateFallback,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::ExactName => write!(f, "exact"),
            StrategyKind::PhraseKeyword => write!(f, "phrase"),
            StrategyKind::Keyword => write!(f, "keyword"),
            StrategyKind::StateSweep => write!(f, "state-sweep"),
            StrategyKind::StartDateFallback => write!(f, "start-date"),
        }
    }
}

/// Ordered query parameters for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Copy of these parameters with one more pair appended
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }
}

/// One concrete parameterization of the award search.
///
/// Built once per run by the planner and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStrategy {
    kind: StrategyKind,
    label: String,
    awardee_name: Option<String>,
    keyword: Option<String>,
    state_code: Option<String>,
    window: DateWindow,
    date_field: DateField,
}

impl SearchStrategy {
    pub fn exact_name(organization: &str, window: DateWindow) -> Self {
        Self {
            kind: StrategyKind::ExactName,
            label: format!("{}:{}", StrategyKind::ExactName, organization),
            awardee_name: Some(organization.to_string()),
            keyword: None,
            state_code: None,
            window,
            date_field: DateField::AwardDate,
        }
    }

    pub fn phrase_keyword(organization: &str, window: DateWindow) -> Self {
        Self {
            kind: StrategyKind::PhraseKeyword,
            label: format!("{}:{}", StrategyKind::PhraseKeyword, organization),
            awardee_name: None,
            keyword: Some(format!("\"{organization}\"")),
            state_code: None,
            window,
            date_field: DateField::AwardDate,
        }
    }

    pub fn keyword(organization: &str, window: DateWindow) -> Self {
        Self {
            kind: StrategyKind::Keyword,
            label: format!("{}:{}", StrategyKind::Keyword, organization),
            awardee_name: None,
            keyword: Some(organization.to_string()),
            state_code: None,
            window,
            date_field: DateField::AwardDate,
        }
    }

    pub fn state_sweep(state_code: &str, stems: &[String], window: DateWindow) -> Self {
        Self {
            kind: StrategyKind::StateSweep,
            label: format!("{}:{}", StrategyKind::StateSweep, state_code),
            awardee_name: None,
            keyword: Some(stems.join(" OR ")),
            state_code: Some(state_code.to_string()),
            window,
            date_field: DateField::AwardDate,
        }
    }

    pub fn start_date_fallback(organization: &str, window: DateWindow) -> Self {
        Self {
            kind: StrategyKind::StartDateFallback,
            label: format!("{}:{}", StrategyKind::StartDateFallback, organization),
            awardee_name: Some(organization.to_string()),
            keyword: None,
            state_code: None,
            window,
            date_field: DateField::StartDate,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Tag attached to every award this strategy produces
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn keyword_value(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn date_field(&self) -> DateField {
        self.date_field
    }

    /// Strategy-specific query parameters, without paging or field selection
    pub fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(name) = &self.awardee_name {
            params.push("awardeeName", name.as_str());
        }
        if let Some(state) = &self.state_code {
            params.push("awardeeStateCode", state.as_str());
        }
        if let Some(keyword) = &self.keyword {
            params.push("keyword", keyword.as_str());
        }
        let (start_key, end_key) = self.date_field.param_keys();
        let (start, end) = self.window.formatted();
        params.push(start_key, start);
        params.push(end_key, end);
        params
    }
}

/// Transport-level failure reasons for a single page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchFailure {
    /// HTTP 429, optionally with a `Retry-After` hint in seconds
    RateLimited { retry_after_secs: Option<u64> },
    /// HTTP 5xx
    ServerError { status: u16, retry_after_secs: Option<u64> },
    /// Any other non-success HTTP status
    ClientError { status: u16 },
    /// Connection could not be established or was dropped
    Connection(String),
    /// Request exceeded the per-call timeout
    Timeout,
    /// Request could not be built or sent for a non-transient reason
    Request(String),
    /// Body was not a valid award envelope
    MalformedBody(String),
}

impl FetchFailure {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, retry_after_secs: Option<u64>) -> Self {
        match status {
            429 => FetchFailure::RateLimited { retry_after_secs },
            500..=599 => FetchFailure::ServerError { status, retry_after_secs },
            _ => FetchFailure::ClientError { status },
        }
    }

    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchFailure::RateLimited { .. } => true,
            FetchFailure::ServerError { status, .. } => matches!(status, 500 | 502 | 503 | 504),
            FetchFailure::Connection(_) | FetchFailure::Timeout => true,
            FetchFailure::ClientError { .. }
            | FetchFailure::Request(_)
            | FetchFailure::MalformedBody(_) => false,
        }
    }

    /// Server-provided wait hint, if any
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            FetchFailure::RateLimited { retry_after_secs }
            | FetchFailure::ServerError { retry_after_secs, .. } => {
                retry_after_secs.map(std::time::Duration::from_secs)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::RateLimited { .. } => write!(f, "rate limited (HTTP 429)"),
            FetchFailure::ServerError { status, .. } => write!(f, "server error (HTTP {status})"),
            FetchFailure::ClientError { status } => write!(f, "request rejected (HTTP {status})"),
            FetchFailure::Connection(message) => write!(f, "connection failed: {message}"),
            FetchFailure::Timeout => write!(f, "request timed out"),
            FetchFailure::Request(message) => write!(f, "request failed: {message}"),
            FetchFailure::MalformedBody(message) => write!(f, "malformed response body: {message}"),
        }
    }
}
