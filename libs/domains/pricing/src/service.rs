//! Quote service layer

use std::time::Instant;

use observability::QuoteMetrics;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::calculator::{CalculatorOptions, QuoteCalculator};
use crate::error::{PricingError, PricingResult};
use crate::ingestion::{summarize_documents, DocumentSummary, ExtractedDocument};
use crate::models::{CostBreakdown, QuoteRequest};
use crate::report::QuoteReport;
use crate::tariffs::TariffSheet;

/// Validates requests, runs the calculator and records metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteService {
    calculator: QuoteCalculator,
}

impl QuoteService {
    pub fn new(options: CalculatorOptions) -> Self {
        Self {
            calculator: QuoteCalculator::new(options),
        }
    }

    pub fn options(&self) -> CalculatorOptions {
        self.calculator.options()
    }

    /// Price a quote request
    #[instrument(skip(self, request), fields(tiers = request.supplier_distribution.len()))]
    pub fn quote(&self, request: &QuoteRequest) -> PricingResult<CostBreakdown> {
        let started = Instant::now();

        let result = request
            .validate()
            .map_err(PricingError::from)
            .and_then(|_| self.calculator.calculate(request));

        match &result {
            Ok(breakdown) => {
                QuoteMetrics::record_quote_computed(
                    breakdown.tiers.len(),
                    started.elapsed().as_secs_f64(),
                    breakdown.compliance.revenue_floor_applied,
                );
                info!(
                    suppliers = breakdown.total_suppliers,
                    total_cost = breakdown.total_cost,
                    suggested_price = breakdown.suggested_price,
                    "Quote computed"
                );
            }
            Err(e) => {
                QuoteMetrics::record_validation_failure(e.kind());
                warn!(error = %e, "Quote rejected");
            }
        }

        result
    }

    /// Price a quote request and lay it out as report tables
    pub fn report(&self, request: &QuoteRequest) -> PricingResult<QuoteReport> {
        let breakdown = self.quote(request)?;
        Ok(QuoteReport::from_breakdown(&breakdown))
    }

    /// Fold extracted documents into per-tier feature flags
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub fn summarize_documents(
        &self,
        documents: &[ExtractedDocument],
    ) -> PricingResult<DocumentSummary> {
        for document in documents {
            document.validate()?;
        }

        let summary = summarize_documents(documents);
        QuoteMetrics::record_documents_summarized(
            documents.len() - summary.failed_documents.len(),
            summary.failed_documents.len(),
        );
        info!(
            tiers = summary.features_by_tier.len(),
            failed = summary.failed_documents.len(),
            "Documents summarized"
        );

        Ok(summary)
    }

    pub fn tariffs(&self) -> TariffSheet {
        TariffSheet::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarginConvention;

    fn request(entries: &[(&str, u64)]) -> QuoteRequest {
        QuoteRequest {
            supplier_distribution: entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_quote_uses_configured_convention() {
        let service = QuoteService::new(
            CalculatorOptions::default().with_margin_convention(MarginConvention::Markup),
        );
        let mut req = request(&[("Digital", 100)]);
        req.margin = Some(1.0);

        let breakdown = service.quote(&req).unwrap();
        assert_eq!(breakdown.suggested_price, 54.0);
    }

    #[test]
    fn test_quote_rejects_blank_tier_label() {
        let err = QuoteService::default().quote(&request(&[(" ", 3)])).unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }

    #[test]
    fn test_report_wraps_breakdown() {
        let report = QuoteService::default()
            .report(&request(&[("360", 10), ("Basic", 5)]))
            .unwrap();
        assert_eq!(report.tables.len(), 4);
    }

    #[test]
    fn test_summarize_documents_rejects_unnamed_document() {
        let documents = vec![ExtractedDocument::default()];
        let err = QuoteService::default()
            .summarize_documents(&documents)
            .unwrap_err();
        assert!(matches!(err, PricingError::Validation(_)));
    }

    #[test]
    fn test_summarize_documents() {
        let documents = vec![
            ExtractedDocument {
                name: "a.xlsx".to_string(),
                tier: Some("360".to_string()),
                features: vec!["Peps y Sips".to_string()],
                parse_error: None,
            },
            ExtractedDocument {
                name: "b.xlsx".to_string(),
                tier: None,
                ..Default::default()
            },
        ];
        let summary = QuoteService::default()
            .summarize_documents(&documents)
            .unwrap();
        assert_eq!(summary.failed_documents, vec!["b.xlsx"]);
        assert_eq!(summary.accepted_documents(), 1);
    }
}
