//! Collection pipeline: planning, paging with retries, merging and normalizing

pub mod aggregator;
pub mod normalizer;
pub mod paginator;
pub mod planner;
pub mod retry;

#[cfg(test)]
mod tests;

pub use aggregator::{Aggregation, Aggregator, dedup_awards};
pub use normalizer::{coerce_money, normalize, split_pi_name};
pub use paginator::Paginator;
pub use planner::{QueryPlanner, derive_stems};
pub use retry::RetryPolicy;
