//! Tests for Aggregator: merge order, dedup, partial failure and fallback

use chrono::NaiveDate;
use serde_json::json;
use shared::{DateWindow, FetchFailure, Page, QueryParams, RawAward};

use super::{RoutedFetcher, award_fields, fast_paginator, notification_page, page_of};
use crate::core::{Aggregator, QueryPlanner, dedup_awards};
use crate::error::CollectorError;
use crate::types::{OutcomeStatus, QueryPlan};

fn plan() -> QueryPlan {
    let window = DateWindow::lookback(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 5).unwrap();
    QueryPlanner::new(vec!["Org A".to_string(), "Org B".to_string()], window)
        .with_state_sweep("MI", Vec::new())
        .plan()
        .unwrap()
}

fn is_exact(p: &QueryParams, org: &str) -> bool {
    p.get("awardeeName") == Some(org) && p.get("dateStart").is_some()
}

fn raw(strategy: &str, id: &str, title: &str) -> RawAward {
    RawAward::new(strategy, json!({"id": id, "title": title}).as_object().unwrap().clone())
}

#[tokio::test]
async fn test_first_seen_wins_across_strategies() {
    let fetcher = RoutedFetcher::new(|p: &QueryParams| {
        if is_exact(p, "Org A") {
            return Ok(page_of("X", 0, 2));
        }
        if p.get("keyword") == Some("Org A") {
            let mut page = page_of("X", 1, 2);
            page.awards[0].insert("title".to_string(), json!("different copy"));
            return Ok(page);
        }
        Ok(Page::default())
    });

    let aggregation = Aggregator::new()
        .collect(&fast_paginator(200), &fetcher, &plan())
        .await
        .unwrap();

    let ids: Vec<String> = aggregation.awards.iter().filter_map(RawAward::id).collect();
    assert_eq!(ids, vec!["X-0", "X-1", "X-2"]);
    assert_eq!(aggregation.awards[1].strategy, "exact:Org A");
    assert_eq!(aggregation.awards[1].text("title").as_deref(), Some("Award X-1"));
    assert_eq!(aggregation.awards[2].strategy, "keyword:Org A");
    assert!(!aggregation.fallback_used);
}

#[tokio::test]
async fn test_outcomes_follow_plan_order() {
    let fetcher = RoutedFetcher::new(|_: &QueryParams| Ok(Page::default()));
    let plan = plan();

    let aggregation = Aggregator::new()
        .collect(&fast_paginator(200), &fetcher, &plan)
        .await
        .unwrap();

    let labels: Vec<&str> = aggregation.outcomes.iter().map(|o| o.label.as_str()).collect();
    let expected: Vec<&str> = plan
        .primary
        .iter()
        .chain(plan.fallback.iter())
        .map(|s| s.label())
        .collect();
    assert_eq!(labels, expected);
}

#[tokio::test]
async fn test_failed_strategy_is_skipped() {
    let fetcher = RoutedFetcher::new(|p: &QueryParams| {
        if is_exact(p, "Org A") {
            Ok(notification_page("2", "Invalid parameter"))
        } else if is_exact(p, "Org B") {
            Ok(page_of("B", 0, 4))
        } else if p.get("awardeeStateCode").is_some() {
            Err(FetchFailure::from_status(400, None))
        } else {
            Ok(Page::default())
        }
    });

    let aggregation = Aggregator::new()
        .collect(&fast_paginator(200), &fetcher, &plan())
        .await
        .unwrap();

    assert_eq!(aggregation.awards.len(), 4);
    let failed: Vec<&str> = aggregation
        .outcomes
        .iter()
        .filter(|o| o.is_failed())
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(failed, vec!["exact:Org A", "state-sweep:MI"]);
    assert_eq!(
        aggregation.outcomes[1].status,
        OutcomeStatus::Completed { fetched: 4, unique: 4 }
    );
}

#[tokio::test]
async fn test_all_strategies_failing_is_collection_failure() {
    let fetcher = RoutedFetcher::new(|_: &QueryParams| Err(FetchFailure::from_status(403, None)));
    let plan = plan();

    let result = Aggregator::new()
        .collect(&fast_paginator(200), &fetcher, &plan)
        .await;

    match result {
        Err(CollectorError::CollectionFailed { attempted, last_error }) => {
            assert_eq!(attempted, plan.len());
            assert!(last_error.contains("403"));
        }
        other => panic!("Expected collection failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fallback_runs_only_when_primary_is_empty() {
    let fetcher = RoutedFetcher::new(|p: &QueryParams| {
        if p.get("startDateStart").is_some() && p.get("awardeeName") == Some("Org B") {
            Ok(page_of("L", 0, 3))
        } else {
            Ok(Page::default())
        }
    });

    let aggregation = Aggregator::new()
        .collect(&fast_paginator(200), &fetcher, &plan())
        .await
        .unwrap();

    assert!(aggregation.fallback_used);
    assert_eq!(aggregation.awards.len(), 3);
    assert!(aggregation.awards.iter().all(|a| a.strategy == "start-date:Org B"));
}

#[tokio::test]
async fn test_fallback_skipped_when_primary_has_rows() {
    let fetcher = RoutedFetcher::new(|p: &QueryParams| {
        if p.get("awardeeStateCode").is_some() {
            Ok(page_of("S", 0, 1))
        } else {
            Ok(Page::default())
        }
    });

    let aggregation = Aggregator::new()
        .collect(&fast_paginator(200), &fetcher, &plan())
        .await
        .unwrap();

    assert!(!aggregation.fallback_used);
    assert!(fetcher.calls().iter().all(|p| p.get("startDateStart").is_none()));
}

#[tokio::test]
async fn test_idless_primary_rows_suppress_fallback() {
    let fetcher = RoutedFetcher::new(|p: &QueryParams| {
        if is_exact(p, "Org A") {
            Ok(Page {
                awards: vec![award_fields("")],
                notifications: Vec::new(),
            })
        } else {
            Ok(Page::default())
        }
    });

    let aggregation = Aggregator::new()
        .collect(&fast_paginator(200), &fetcher, &plan())
        .await
        .unwrap();

    assert!(!aggregation.fallback_used);
    assert!(aggregation.awards.is_empty());
    assert_eq!(
        aggregation.outcomes[0].status,
        OutcomeStatus::Completed { fetched: 1, unique: 0 }
    );
    assert!(fetcher.calls().iter().all(|p| p.get("startDateStart").is_none()));
}

#[tokio::test]
async fn test_empty_result_after_primary_failures_is_not_an_error() {
    let fetcher = RoutedFetcher::new(|p: &QueryParams| {
        if p.get("startDateStart").is_some() {
            Ok(Page::default())
        } else {
            Err(FetchFailure::from_status(404, None))
        }
    });

    let aggregation = Aggregator::new()
        .collect(&fast_paginator(200), &fetcher, &plan())
        .await
        .unwrap();

    assert!(aggregation.fallback_used);
    assert!(aggregation.awards.is_empty());
}

#[test]
fn test_absorb_counts_new_awards_and_drops_missing_ids() {
    let mut aggregator = Aggregator::new();

    assert_eq!(aggregator.absorb(vec![raw("exact:A", "1", "a"), raw("exact:A", "2", "b")]), 2);
    assert_eq!(
        aggregator.absorb(vec![
            raw("keyword:A", "2", "b2"),
            RawAward::new("keyword:A", award_fields("")),
            raw("keyword:A", "3", "c"),
        ]),
        1
    );
    assert_eq!(aggregator.len(), 3);
}

#[test]
fn test_dedup_keeps_first_of_every_duplicate_permutation() {
    let copies = [
        raw("exact:A", "7", "exact"),
        raw("phrase:A", "7", "phrase"),
        raw("keyword:A", "7", "keyword"),
    ];
    let orders: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

    for order in orders {
        let input: Vec<RawAward> = order.iter().map(|&i| copies[i].clone()).collect();
        let deduped = dedup_awards(input.clone());

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0], input[0]);
    }
}

#[test]
fn test_dedup_is_idempotent() {
    let input = vec![
        raw("exact:A", "1", "a"),
        raw("exact:A", "2", "b"),
        raw("keyword:A", "1", "a2"),
        raw("state-sweep:MI", "3", "c"),
        raw("state-sweep:MI", "2", "b2"),
    ];

    let once = dedup_awards(input);
    let twice = dedup_awards(once.clone());

    assert_eq!(once, twice);
    let ids: Vec<String> = once.iter().filter_map(RawAward::id).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}
