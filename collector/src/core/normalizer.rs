//! Coerces raw awards into the fixed output schema

use std::collections::HashSet;

use serde_json::Value;
use shared::{AwardTable, Column, NormalizedAward, RawAward};

/// Normalize deduplicated awards into the output table.
///
/// Columns follow `Column::ALL` order, restricted to columns observed in at
/// least one input row. `id` and `strategy` are always present.
pub fn normalize(awards: &[RawAward]) -> AwardTable {
    let mut observed: HashSet<Column> = HashSet::from([Column::Id, Column::Strategy]);
    let mut rows = Vec::with_capacity(awards.len());

    for award in awards {
        let Some(id) = award.id() else { continue };

        for column in Column::ALL {
            if award.has_field(column.name()) {
                observed.insert(column);
            }
        }

        let row = normalize_award(id, award);
        if row.pi_first_name.is_some() {
            observed.insert(Column::PiFirstName);
        }
        if row.pi_last_name.is_some() {
            observed.insert(Column::PiLastName);
        }
        rows.push(row);
    }

    let columns = Column::ALL
        .into_iter()
        .filter(|column| observed.contains(column))
        .collect();

    AwardTable { columns, rows }
}

fn normalize_award(id: String, award: &RawAward) -> NormalizedAward {
    let mut pi_first_name = award.text("piFirstName");
    let mut pi_last_name = award.text("piLastName");

    if pi_first_name.is_none() || pi_last_name.is_none() {
        if let Some((first, last)) = award.text("pdPIName").as_deref().and_then(split_pi_name) {
            pi_first_name = pi_first_name.or(Some(first));
            pi_last_name = pi_last_name.or(Some(last));
        }
    }

    NormalizedAward {
        id,
        title: award.text("title"),
        awardee_name: award.text("awardeeName"),
        awardee_city: award.text("awardeeCity"),
        awardee_state_code: award.text("awardeeStateCode"),
        pi_first_name,
        pi_last_name,
        date: award.text("date"),
        start_date: award.text("startDate"),
        exp_date: award.text("expDate"),
        funds_obligated_amt: award.value("fundsObligatedAmt").and_then(coerce_money),
        agency: award.text("agency"),
        abstract_text: award.text("abstractText"),
        strategy: award.strategy.clone(),
    }
}

/// Numeric value of a money field; anything unparseable is `None`
pub fn coerce_money(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    amount.is_finite().then_some(amount)
}

/// Split a combined PI name into (first, rest). Needs at least two tokens.
pub fn split_pi_name(full_name: &str) -> Option<(String, String)> {
    let mut parts = full_name.split_whitespace();
    let first = parts.next()?;
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        return None;
    }
    Some((first.to_string(), rest.join(" ")))
}
