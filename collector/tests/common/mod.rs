//! Test fixtures and helpers for collector integration tests

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::MockServer;

use collector::{CollectorConfig, FetchConfig, PagingConfig, RetryConfig};

pub const AWARDS_PATH: &str = "/services/v1/awards.json";

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const ORG_A: &'static str = "Corewell Health";
    pub const ORG_B: &'static str = "Spectrum Health";
    pub const ORG_C: &'static str = "Beaumont Health";

    pub fn organizations() -> Vec<String> {
        vec![Self::ORG_A.to_string(), Self::ORG_B.to_string(), Self::ORG_C.to_string()]
    }

    /// Award object shaped like the endpoint's output
    pub fn award(id: usize, org: &str) -> Value {
        json!({
            "id": format!("{}", 2_000_000 + id),
            "title": format!("Research award {id}"),
            "awardeeName": org,
            "awardeeCity": "Grand Rapids",
            "awardeeStateCode": "MI",
            "pdPIName": "Jane Q. Doe",
            "date": "05/01/2020",
            "startDate": "06/01/2020",
            "expDate": "05/31/2023",
            "fundsObligatedAmt": "150000",
        })
    }

    /// `{"response": {"award": [...]}}` with awards `start..start+count`
    pub fn award_envelope(start: usize, count: usize, org: &str) -> Value {
        let awards: Vec<Value> = (start..start + count).map(|id| Self::award(id, org)).collect();
        json!({"response": {"award": awards}})
    }

    pub fn empty_envelope() -> Value {
        json!({"response": {"award": []}})
    }

    pub fn notification_envelope(code: &str, message: &str) -> Value {
        json!({
            "response": {
                "serviceNotification": [
                    {"notificationCode": code, "notificationMessage": message}
                ]
            }
        })
    }
}

/// Fast, deterministic config pointed at a mock server
pub fn test_config(server: &MockServer) -> CollectorConfig {
    CollectorConfig {
        organizations: TestFixtures::organizations(),
        years_back: 5,
        state_code: Some("MI".to_string()),
        stems: Vec::new(),
        output: std::path::PathBuf::from("unused.csv"),
        fetch: FetchConfig {
            base_url: format!("{}{}", server.uri(), AWARDS_PATH),
            timeout_secs: 5,
            ..FetchConfig::default()
        },
        retry: RetryConfig {
            max_retries: 5,
            base_delay_ms: 0,
            max_delay_ms: 0,
        },
        paging: PagingConfig {
            max_pages: 200,
            page_pause_ms: 0,
        },
    }
}
