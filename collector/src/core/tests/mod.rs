//! Tests for the collection pipeline
//!
//! Fetchers are either mockall-generated or scripted in memory so call
//! sequences and parameters can be asserted without a network.

pub mod aggregator;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use shared::{FetchFailure, Notification, Page, QueryParams};

use crate::config::{PagingConfig, RetryConfig};
use crate::core::{Paginator, RetryPolicy};
use crate::traits::PageFetcher;

/// Retry policy with no sleeping between attempts
pub fn instant_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(RetryConfig {
        max_retries,
        base_delay_ms: 0,
        max_delay_ms: 0,
    })
}

/// Paginator with no pacing and instant retries
pub fn fast_paginator(max_pages: u32) -> Paginator {
    Paginator::new(
        instant_retry(5),
        PagingConfig {
            max_pages,
            page_pause_ms: 0,
        },
        "id,title".to_string(),
    )
}

pub fn award_fields(id: &str) -> Map<String, Value> {
    json!({"id": id, "title": format!("Award {id}")})
        .as_object()
        .cloned()
        .unwrap_or_default()
}

/// Page of `count` awards with ids `prefix-start` .. `prefix-(start+count-1)`
pub fn page_of(prefix: &str, start: usize, count: usize) -> Page {
    Page {
        awards: (start..start + count)
            .map(|n| award_fields(&format!("{prefix}-{n}")))
            .collect(),
        notifications: Vec::new(),
    }
}

pub fn notification_page(code: &str, message: &str) -> Page {
    Page {
        awards: Vec::new(),
        notifications: vec![Notification {
            code: code.to_string(),
            message: message.to_string(),
        }],
    }
}

/// Replays a fixed sequence of results, then empty pages
#[derive(Default)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Result<Page, FetchFailure>>>,
    calls: Mutex<Vec<QueryParams>>,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<Result<Page, FetchFailure>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn offsets(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|p| p.get("offset").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, params: &QueryParams) -> Result<Page, FetchFailure> {
        self.calls.lock().unwrap().push(params.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Page::default()))
    }
}

/// Answers each request through a routing closure
pub struct RoutedFetcher<R>
where
    R: Fn(&QueryParams) -> Result<Page, FetchFailure> + Send + Sync,
{
    route: R,
    calls: Mutex<Vec<QueryParams>>,
}

impl<R> RoutedFetcher<R>
where
    R: Fn(&QueryParams) -> Result<Page, FetchFailure> + Send + Sync,
{
    pub fn new(route: R) -> Self {
        Self {
            route,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<QueryParams> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<R> PageFetcher for RoutedFetcher<R>
where
    R: Fn(&QueryParams) -> Result<Page, FetchFailure> + Send + Sync,
{
    async fn fetch_page(&self, params: &QueryParams) -> Result<Page, FetchFailure> {
        self.calls.lock().unwrap().push(params.clone());
        (self.route)(params)
    }
}
