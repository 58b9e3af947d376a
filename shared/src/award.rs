//! Award records as they come off the wire and as they leave the pipeline

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// Service-level condition embedded in an otherwise successful response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "notificationCode", default, deserialize_with = "string_or_number")]
    pub code: String,
    #[serde(rename = "notificationMessage", default, deserialize_with = "string_or_number")]
    pub message: String,
}

/// One parsed response page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub awards: Vec<Map<String, Value>>,
    pub notifications: Vec<Notification>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Option<EnvelopeBody>,
}

#[derive(Deserialize)]
struct EnvelopeBody {
    #[serde(default)]
    award: Option<Vec<Map<String, Value>>>,
    #[serde(rename = "serviceNotification", default)]
    service_notification: Option<Vec<Notification>>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Parse the `{"response": {"award": [...], "serviceNotification": [...]}}` envelope.
///
/// A missing `response`, `award` or `serviceNotification` key reads as empty.
pub fn parse_envelope(body: &str) -> SharedResult<Page> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| SharedError::MalformedEnvelope {
        message: e.to_string(),
    })?;

    let body = envelope.response.unwrap_or(EnvelopeBody {
        award: None,
        service_notification: None,
    });

    Ok(Page {
        awards: body.award.unwrap_or_default(),
        notifications: body.service_notification.unwrap_or_default(),
    })
}

/// Award as returned by one strategy, tagged with the strategy that found it
#[derive(Debug, Clone, PartialEq)]
pub struct RawAward {
    pub strategy: String,
    pub fields: Map<String, Value>,
}

impl RawAward {
    pub fn new(strategy: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            strategy: strategy.into(),
            fields,
        }
    }

    /// Dedup key. Numeric ids are rendered as text; empty ids count as missing.
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field rendered as text; null, empty strings and nested values read as absent
    pub fn text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Output columns in their fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Id,
    Title,
    AwardeeName,
    AwardeeCity,
    AwardeeStateCode,
    PiFirstName,
    PiLastName,
    Date,
    StartDate,
    ExpDate,
    FundsObligatedAmt,
    Agency,
    AbstractText,
    Strategy,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Id,
        Column::Title,
        Column::AwardeeName,
        Column::AwardeeCity,
        Column::AwardeeStateCode,
        Column::PiFirstName,
        Column::PiLastName,
        Column::Date,
        Column::StartDate,
        Column::ExpDate,
        Column::FundsObligatedAmt,
        Column::Agency,
        Column::AbstractText,
        Column::Strategy,
    ];

    /// Header name, matching the endpoint's field name where one exists
    pub fn name(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Title => "title",
            Column::AwardeeName => "awardeeName",
            Column::AwardeeCity => "awardeeCity",
            Column::AwardeeStateCode => "awardeeStateCode",
            Column::PiFirstName => "piFirstName",
            Column::PiLastName => "piLastName",
            Column::Date => "date",
            Column::StartDate => "startDate",
            Column::ExpDate => "expDate",
            Column::FundsObligatedAmt => "fundsObligatedAmt",
            Column::Agency => "agency",
            Column::AbstractText => "abstractText",
            Column::Strategy => "strategy",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output row with a fixed schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAward {
    pub id: String,
    pub title: Option<String>,
    pub awardee_name: Option<String>,
    pub awardee_city: Option<String>,
    pub awardee_state_code: Option<String>,
    pub pi_first_name: Option<String>,
    pub pi_last_name: Option<String>,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub exp_date: Option<String>,
    pub funds_obligated_amt: Option<f64>,
    pub agency: Option<String>,
    pub abstract_text: Option<String>,
    pub strategy: String,
}

impl NormalizedAward {
    /// Cell text for a column; `None` renders as an empty cell
    pub fn cell(&self, column: Column) -> Option<String> {
        match column {
            Column::Id => Some(self.id.clone()),
            Column::Title => self.title.clone(),
            Column::AwardeeName => self.awardee_name.clone(),
            Column::AwardeeCity => self.awardee_city.clone(),
            Column::AwardeeStateCode => self.awardee_state_code.clone(),
            Column::PiFirstName => self.pi_first_name.clone(),
            Column::PiLastName => self.pi_last_name.clone(),
            Column::Date => self.date.clone(),
            Column::StartDate => self.start_date.clone(),
            Column::ExpDate => self.exp_date.clone(),
            Column::FundsObligatedAmt => self.funds_obligated_amt.map(|amount| amount.to_string()),
            Column::Agency => self.agency.clone(),
            Column::AbstractText => self.abstract_text.clone(),
            Column::Strategy => Some(self.strategy.clone()),
        }
    }
}

/// Final table: the observed columns and the deduplicated rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AwardTable {
    pub columns: Vec<Column>,
    pub rows: Vec<NormalizedAward>,
}

impl AwardTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
