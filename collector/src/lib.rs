//! Award collector library
//!
//! Queries a public award-search API with several complementary strategies
//! per organization and produces a deduplicated, normalized award table.

pub mod collector_impl;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use collector_impl::Collector;
pub use config::{CollectorConfig, FetchConfig, PagingConfig, RetryConfig};
pub use error::{CollectorError, CollectorResult};
pub use traits::*;
pub use types::*;
