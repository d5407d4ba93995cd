use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::MarginConvention;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Reasons a quote is refused. No variant carries a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("Region percentages add up to {total}%, which exceeds 100%")]
    RegionPercentageExceeded { total: f64 },

    #[error("Region percentages add up to {total}%, but must add up to exactly 100%")]
    RegionPercentageIncomplete { total: f64 },

    #[error("Region '{region}' has percentage {value}, expected a value between 0 and 100")]
    InvalidRegionPercentage { region: String, value: f64 },

    #[error("Margin {margin} is out of range for {convention} pricing: expected {}", convention_range(.convention))]
    MarginOutOfRange {
        margin: f64,
        convention: MarginConvention,
    },

    #[error("Declared {declared} suppliers but the tier distribution adds up to {distributed}")]
    SupplierCountMismatch { declared: u64, distributed: u64 },

    /// Request DTO failed `validator` checks
    #[error("Invalid input: {0}")]
    Validation(String),
}

fn convention_range(convention: &MarginConvention) -> &'static str {
    match convention {
        MarginConvention::OnPrice => "0 <= margin < 1",
        MarginConvention::Markup => "margin >= 0",
    }
}

impl PricingError {
    /// Stable short label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            PricingError::RegionPercentageExceeded { .. } => "region_percentage_exceeded",
            PricingError::RegionPercentageIncomplete { .. } => "region_percentage_incomplete",
            PricingError::InvalidRegionPercentage { .. } => "invalid_region_percentage",
            PricingError::MarginOutOfRange { .. } => "margin_out_of_range",
            PricingError::SupplierCountMismatch { .. } => "supplier_count_mismatch",
            PricingError::Validation(_) => "validation",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PricingError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<validator::ValidationErrors> for PricingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        PricingError::Validation(errors.to_string())
    }
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_error_names_valid_range() {
        let err = PricingError::MarginOutOfRange {
            margin: 1.0,
            convention: MarginConvention::OnPrice,
        };
        let message = err.to_string();
        assert!(message.contains("on_price"));
        assert!(message.contains("0 <= margin < 1"));
    }

    #[test]
    fn test_region_error_names_total() {
        let err = PricingError::RegionPercentageExceeded { total: 110.0 };
        assert!(err.to_string().contains("110"));
        assert_eq!(err.kind(), "region_percentage_exceeded");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PricingError::SupplierCountMismatch {
                declared: 3,
                distributed: 2
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            PricingError::Validation("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = PricingError::RegionPercentageIncomplete { total: 80.0 }.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
