//! Shared logging utilities for consistent tracing across the collector

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Filter directive for the collector crates at the given level
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("collector={base_level},shared={base_level},reqwest=warn")
}

/// Initialize the stdout tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set. Calling this twice is
/// harmless; the second subscriber is ignored.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for strategy-aware info logging
#[macro_export]
macro_rules! run_info {
    ($strategy:expr, $($arg:tt)*) => {
        tracing::info!(
            strategy = %$strategy,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for strategy-aware warning logging
#[macro_export]
macro_rules! run_warn {
    ($strategy:expr, $($arg:tt)*) => {
        tracing::warn!(
            strategy = %$strategy,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for strategy-aware error logging
#[macro_export]
macro_rules! run_error {
    ($strategy:expr, $($arg:tt)*) => {
        tracing::error!(
            strategy = %$strategy,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for strategy-aware debug logging
#[macro_export]
macro_rules! run_debug {
    ($strategy:expr, $($arg:tt)*) => {
        tracing::debug!(
            strategy = %$strategy,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(details: &str) {
    info!(timestamp = format_timestamp(), "🚀 Starting {}", details);
}

/// Contextual logging helper for error conditions
pub fn log_error(context: &str, error: &dyn std::fmt::Display) {
    error!(
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(message: &str) {
    info!(timestamp = format_timestamp(), "✅ {}", message);
}
