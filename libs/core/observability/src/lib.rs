//! Metrics for the quote calculator.
//!
//! This crate provides:
//! - Prometheus recorder setup and the `/metrics` handler
//! - [`QuoteMetrics`] for domain events (quotes, validation failures, floors)
//! - Axum middleware for per-route HTTP metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, QuoteMetrics};
//!
//! init_metrics()?;
//! QuoteMetrics::record_quote_computed(3, 0.0004, false);
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;
pub mod quote;

pub use middleware::metrics_middleware;
pub use quote::QuoteMetrics;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder.
///
/// Only the first call installs anything; later calls return the same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "HTTP requests answered with a 4xx or 5xx status"
    );

    describe_counter!("quote_computations_total", "Quotes computed successfully");
    describe_histogram!(
        "quote_computation_duration_seconds",
        "Time spent computing a single quote"
    );
    describe_histogram!("quote_tiers", "Number of priced tiers per quote");
    describe_counter!(
        "quote_validation_failures_total",
        "Quote requests rejected by validation, by kind"
    );
    describe_counter!(
        "quote_compliance_floor_total",
        "Quotes whose compliance cost was raised to the revenue floor"
    );
    describe_counter!(
        "quote_documents_total",
        "Extracted documents summarized, by outcome"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_metrics_is_idempotent_and_renders_quote_metrics() {
        let first = init_metrics().expect("recorder installs once") as *const PrometheusHandle;
        let second = init_metrics().expect("second call reuses handle") as *const PrometheusHandle;
        assert_eq!(first, second);

        QuoteMetrics::record_quote_computed(2, 0.001, true);
        let rendered = get_metrics_handle().unwrap().render();
        assert!(rendered.contains("quote_computations_total"));
        assert!(rendered.contains("quote_compliance_floor_total"));
    }
}
