//! Margin conventions
//!
//! A margin of 0.4 means two different prices depending on the convention:
//! `OnPrice` keeps 40% of the sale price (`cost / 0.6`), `Markup` adds 40% of
//! the cost (`cost * 1.4`). Callers pick one explicitly; the default is
//! `OnPrice`.

use crate::error::{PricingError, PricingResult};
use crate::models::MarginConvention;

impl MarginConvention {
    /// Check that `margin` is usable under this convention.
    pub fn validate(self, margin: f64) -> PricingResult<()> {
        let valid = margin.is_finite()
            && match self {
                MarginConvention::OnPrice => (0.0..1.0).contains(&margin),
                MarginConvention::Markup => margin >= 0.0,
            };

        if valid {
            Ok(())
        } else {
            Err(PricingError::MarginOutOfRange {
                margin,
                convention: self,
            })
        }
    }

    /// Turn a cost into a price. Assumes `margin` passed [`Self::validate`].
    pub fn apply(self, cost: f64, margin: f64) -> f64 {
        match self {
            MarginConvention::OnPrice => cost / (1.0 - margin),
            MarginConvention::Markup => cost * (1.0 + margin),
        }
    }
}

/// A validated margin bound to its convention.
///
/// `None` margin prices at cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceAdjuster {
    convention: MarginConvention,
    margin: Option<f64>,
}

impl PriceAdjuster {
    pub fn new(convention: MarginConvention, margin: Option<f64>) -> PricingResult<Self> {
        if let Some(m) = margin {
            convention.validate(m)?;
        }
        Ok(Self { convention, margin })
    }

    pub fn adjust(&self, cost: f64) -> f64 {
        match self.margin {
            Some(m) => self.convention.apply(cost, m),
            None => cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_price_range() {
        let convention = MarginConvention::OnPrice;
        assert!(convention.validate(0.0).is_ok());
        assert!(convention.validate(0.4).is_ok());
        assert!(convention.validate(0.999).is_ok());
        assert!(convention.validate(1.0).is_err());
        assert!(convention.validate(-0.1).is_err());
        assert!(convention.validate(f64::NAN).is_err());
    }

    #[test]
    fn test_markup_range() {
        let convention = MarginConvention::Markup;
        assert!(convention.validate(0.0).is_ok());
        assert!(convention.validate(2.5).is_ok());
        assert!(convention.validate(-0.1).is_err());
        assert!(convention.validate(f64::INFINITY).is_err());
    }

    #[test]
    fn test_on_price_keeps_margin_share_of_price() {
        let price = MarginConvention::OnPrice.apply(600.0, 0.4);
        assert!((price - 1000.0).abs() < 1e-9);
        assert!((price * (1.0 - 0.4) - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_markup_adds_margin_share_of_cost() {
        let price = MarginConvention::Markup.apply(600.0, 0.4);
        assert!((price - 840.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjuster_without_margin_prices_at_cost() {
        let adjuster = PriceAdjuster::new(MarginConvention::OnPrice, None).unwrap();
        assert_eq!(adjuster.adjust(271.3), 271.3);
    }

    #[test]
    fn test_adjuster_rejects_invalid_margin() {
        let err = PriceAdjuster::new(MarginConvention::OnPrice, Some(1.0)).unwrap_err();
        assert_eq!(err.kind(), "margin_out_of_range");
    }
}
