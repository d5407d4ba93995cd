//! Pricing Domain
//!
//! Minimum-price calculator for supplier screening projects. A quote prices
//! every tier of suppliers for operations, third-party sourcing and
//! compliance calls, adds the client's onboarding fees and applies a margin.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← axum routes, OpenAPI
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← request validation, metrics, logging
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Calculator  │  ← pure computation over the tariff tables
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← requests, breakdowns, enums
//! └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use domain_pricing::{QuoteCalculator, QuoteRequest};
//!
//! let request = QuoteRequest {
//!     supplier_distribution: BTreeMap::from([("360".to_string(), 10), ("Basic".to_string(), 5)]),
//!     ..Default::default()
//! };
//! let breakdown = QuoteCalculator::default().calculate(&request).unwrap();
//! assert_eq!(breakdown.total_cost, 271.30);
//! assert_eq!(breakdown.price_per_supplier, 18.09);
//! ```

pub mod calculator;
pub mod compliance;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ingestion;
pub mod margin;
pub mod models;
pub mod report;
pub mod service;
pub mod tariffs;

// Re-export commonly used types
pub use calculator::{compute_pricing, CalculatorOptions, QuoteCalculator};
pub use error::{PricingError, PricingResult};
pub use ingestion::{summarize_documents, DocumentSummary, ExtractedDocument};
pub use margin::PriceAdjuster;
pub use models::{
    ClientType, ComplianceProfile, ComplianceSummary, CostBreakdown, FixedCostDetail,
    MarginConvention, QuoteRequest, Tier, TierBreakdown,
};
pub use report::{QuoteReport, ReportTable};
pub use service::QuoteService;
pub use tariffs::TariffSheet;
