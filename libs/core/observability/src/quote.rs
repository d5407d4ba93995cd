//! Domain metrics for quote computation.

use metrics::{counter, histogram};

/// Quote metrics recorder
pub struct QuoteMetrics;

impl QuoteMetrics {
    /// Record a successful quote.
    pub fn record_quote_computed(tiers: usize, duration_secs: f64, floor_applied: bool) {
        counter!("quote_computations_total").increment(1);
        histogram!("quote_computation_duration_seconds").record(duration_secs);
        histogram!("quote_tiers").record(tiers as f64);

        if floor_applied {
            counter!("quote_compliance_floor_total").increment(1);
        }

        tracing::debug!(tiers, duration_secs, floor_applied, "Quote computed");
    }

    /// Record a rejected quote. `kind` is a short stable label such as
    /// `region_percentage_exceeded`.
    pub fn record_validation_failure(kind: &'static str) {
        counter!("quote_validation_failures_total", "kind" => kind).increment(1);
    }

    /// Record the outcome of a document summary run.
    pub fn record_documents_summarized(accepted: usize, failed: usize) {
        counter!("quote_documents_total", "outcome" => "accepted").increment(accepted as u64);
        counter!("quote_documents_total", "outcome" => "failed").increment(failed as u64);

        if failed > 0 {
            tracing::debug!(accepted, failed, "Some documents could not be used");
        }
    }
}
