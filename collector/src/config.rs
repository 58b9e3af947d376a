//! Runtime configuration for a collection run

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::SharedError;

use crate::error::CollectorResult;

/// Public NSF award-search endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.nsf.gov/services/v1/awards.json";

pub const DEFAULT_USER_AGENT: &str = concat!("award-collector/", env!("CARGO_PKG_VERSION"));

/// Every printable field the award endpoint documents
pub const DEFAULT_PRINT_FIELDS: &[&str] = &[
    "id", "agency", "awardeeCity", "awardeeCountryCode", "awardeeDistrictCode",
    "awardeeName", "awardeeStateCode", "awardeeZipCode", "awdSpAttnCode",
    "awdSpAttnDesc", "cfdaNumber", "coPDPI", "date", "startDate", "expDate",
    "estimatedTotalAmt", "fundsObligatedAmt", "ueiNumber", "fundProgramName",
    "parentUeiNumber", "pdPIName", "perfCity", "perfCountryCode",
    "perfDistrictCode", "perfLocation", "perfStateCode", "perfZipCode",
    "poName", "primaryProgram", "transType", "title", "awardee",
    "poPhone", "poEmail", "awardeeAddress", "perfAddress",
    "publicationResearch", "publicationConference", "fundAgencyCode",
    "awardAgencyCode", "projectOutComesReport", "abstractText",
    "piFirstName", "piMiddeInitial", "piLastName", "piEmail",
];

/// HTTP settings for the page fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub print_fields: Vec<String>,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Comma-joined `printFields` value
    pub fn print_fields_param(&self) -> String {
        self.print_fields.join(",")
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            print_fields: DEFAULT_PRINT_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Bounded retry settings for transient transport failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 500,
            max_delay_ms: 60_000,
        }
    }
}

/// Pagination limits and pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    pub max_pages: u32,
    pub page_pause_ms: u64,
}

impl PagingConfig {
    pub fn page_pause(&self) -> Duration {
        Duration::from_millis(self.page_pause_ms)
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_pages: 200,
            page_pause_ms: 250,
        }
    }
}

/// Complete configuration of one collection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    pub organizations: Vec<String>,
    pub years_back: u32,
    /// State for the geographic sweep; `None` skips that strategy
    pub state_code: Option<String>,
    /// Keyword stems for the geographic sweep; empty means derive from organizations
    pub stems: Vec<String>,
    pub output: PathBuf,
    pub fetch: FetchConfig,
    pub retry: RetryConfig,
    pub paging: PagingConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            organizations: Vec::new(),
            years_back: 25,
            state_code: None,
            stems: Vec::new(),
            output: PathBuf::from("data/nsf_awards_25y.csv"),
            fetch: FetchConfig::default(),
            retry: RetryConfig::default(),
            paging: PagingConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// Reject settings that would make every strategy meaningless
    pub fn validate(&self) -> CollectorResult<()> {
        if self.organizations.iter().all(|org| org.trim().is_empty()) {
            return Err(invalid("organizations", "[]").into());
        }
        if self.years_back == 0 {
            return Err(invalid("years_back", "0").into());
        }
        if self.fetch.print_fields.is_empty() {
            return Err(invalid("print_fields", "[]").into());
        }
        if self.paging.max_pages == 0 {
            return Err(invalid("max_pages", "0").into());
        }
        if self.fetch.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "0").into());
        }
        if let Some(state) = &self.state_code {
            if state.trim().is_empty() {
                return Err(invalid("state_code", state).into());
            }
        }
        url::Url::parse(&self.fetch.base_url)
            .map_err(|_| invalid("base_url", &self.fetch.base_url))?;
        Ok(())
    }
}

fn invalid(field: &str, value: &str) -> SharedError {
    SharedError::InvalidConfig {
        field: field.to_string(),
        value: value.to_string(),
    }
}
