// Telemetry module for structured logging and resolution metrics

use anyhow::Result;
use metrics::{counter, describe_counter};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize structured logging
///
/// Sets up the tracing subscriber with:
/// - Log level from RUST_LOG, falling back to the configured level
/// - JSON formatting when `json` is set, compact text otherwise
/// - Output on stderr so stdout stays free for command results
#[tracing::instrument(skip_all)]
pub fn init_logging(log_level: &str, json: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(log_level)?,
    };

    let fmt_layer = if json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    describe_metrics();

    tracing::info!(log_level = log_level, json = json, "Structured logging initialized");

    Ok(())
}

/// Filter for the configured level, used when RUST_LOG is unset or invalid
pub fn level_filter(log_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(log_level)
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))
}

/// Describe all counters so an installed recorder can export help text
pub fn describe_metrics() {
    describe_counter!(
        "directory_fetch_total",
        "Directory fetches by outcome (success or error kind)"
    );
    describe_counter!("cache_hit_total", "Group schedule lookups served from cache");
    describe_counter!(
        "assignment_resolved_total",
        "Assignments resolved, by winning strategy"
    );
    describe_counter!(
        "assignment_skipped_total",
        "Assignments that contributed no sessions, by reason"
    );
}

/// Record the outcome of a directory fetch
#[inline]
pub fn record_fetch(outcome: &str) {
    counter!("directory_fetch_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a lookup served from the cache
#[inline]
pub fn record_cache_hit() {
    counter!("cache_hit_total").increment(1);
}

/// Record the strategy that produced an assignment's sessions
#[inline]
pub fn record_resolved(strategy: &str) {
    counter!("assignment_resolved_total", "strategy" => strategy.to_string()).increment(1);
}

/// Record why an assignment produced nothing
#[inline]
pub fn record_skipped(reason: &str) {
    counter!("assignment_skipped_total", "reason" => reason.to_string()).increment(1);
}
