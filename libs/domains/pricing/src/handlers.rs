//! HTTP handlers for the quote calculator

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::PricingResult;
use crate::ingestion::{DocumentSummary, ExtractedDocument};
use crate::models::{
    ClientType, ComplianceProfile, ComplianceSummary, CostBreakdown, FixedCostDetail,
    MarginConvention, QuoteRequest, Tier, TierBreakdown,
};
use crate::report::{QuoteReport, ReportTable};
use crate::service::QuoteService;
use crate::tariffs::{ClientFees, ComplianceRate, RegionRate, TariffSheet, TierRate};

pub const TAG: &str = "quotes";

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Stable error label, e.g. `margin_out_of_range`
    pub kind: String,
    pub code: u16,
}

/// OpenAPI documentation for the quote API
#[derive(OpenApi)]
#[openapi(
    paths(create_quote, create_report, summarize_documents, get_tariffs),
    components(schemas(
        QuoteRequest,
        CostBreakdown,
        TierBreakdown,
        FixedCostDetail,
        ComplianceSummary,
        Tier,
        ComplianceProfile,
        ClientType,
        MarginConvention,
        QuoteReport,
        ReportTable,
        ExtractedDocument,
        DocumentSummary,
        TariffSheet,
        TierRate,
        RegionRate,
        ComplianceRate,
        ClientFees,
        ErrorResponse,
    )),
    tags(
        (name = TAG, description = "Supplier screening quotes")
    )
)]
pub struct ApiDoc;

/// Create the quote router with all HTTP endpoints
pub fn router(service: QuoteService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/quotes", post(create_quote))
        .route("/quotes/report", post(create_report))
        .route("/documents/summary", post(summarize_documents))
        .route("/tariffs", get(get_tariffs))
        .with_state(shared_service)
}

/// Compute the minimum price of a quote
#[utoipa::path(
    post,
    path = "/quotes",
    tag = TAG,
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Cost breakdown and minimum prices", body = CostBreakdown),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 422, description = "Region shares, margin or supplier total rejected", body = ErrorResponse)
    )
)]
async fn create_quote(
    State(service): State<Arc<QuoteService>>,
    Json(request): Json<QuoteRequest>,
) -> PricingResult<Json<CostBreakdown>> {
    let breakdown = service.quote(&request)?;
    Ok(Json(breakdown))
}

/// Compute a quote and return it as display tables
#[utoipa::path(
    post,
    path = "/quotes/report",
    tag = TAG,
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Named report tables", body = QuoteReport),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 422, description = "Region shares, margin or supplier total rejected", body = ErrorResponse)
    )
)]
async fn create_report(
    State(service): State<Arc<QuoteService>>,
    Json(request): Json<QuoteRequest>,
) -> PricingResult<Json<QuoteReport>> {
    let report = service.report(&request)?;
    Ok(Json(report))
}

/// Fold extracted documents into per-tier feature flags
#[utoipa::path(
    post,
    path = "/documents/summary",
    tag = TAG,
    request_body = Vec<ExtractedDocument>,
    responses(
        (status = 200, description = "Feature flags per tier and failed documents", body = DocumentSummary),
        (status = 400, description = "Malformed request", body = ErrorResponse)
    )
)]
async fn summarize_documents(
    State(service): State<Arc<QuoteService>>,
    Json(documents): Json<Vec<ExtractedDocument>>,
) -> PricingResult<Json<DocumentSummary>> {
    let summary = service.summarize_documents(&documents)?;
    Ok(Json(summary))
}

/// List every tariff used by the calculator
#[utoipa::path(
    get,
    path = "/tariffs",
    tag = TAG,
    responses(
        (status = 200, description = "Current tariff tables", body = TariffSheet)
    )
)]
async fn get_tariffs(State(service): State<Arc<QuoteService>>) -> Json<TariffSheet> {
    Json(service.tariffs())
}
