//! Compliance call model
//!
//! Every tier with a compliance profile expects a number of screening calls
//! per supplier. Calls are pooled across the whole project and priced on a
//! volume curve, `COEFFICIENT * calls^EXPONENT`, so a larger project pays less
//! per call. A project that uses compliance at all pays at least the revenue
//! floor, spread over the contributing tiers by supplier count.

use tracing::debug;

use crate::models::{ComplianceProfile, ComplianceSummary};
use crate::tariffs::{
    compliance_tariff, CALL_COST_COEFFICIENT, CALL_COST_EXPONENT, COMPLIANCE_REVENUE_FLOOR,
};

/// Pick the profile with the highest price factor among `features`.
///
/// Labels that are not compliance profiles are ignored. On an equal price
/// factor the earlier flag is kept.
pub fn select_profile<S: AsRef<str>>(features: &[S]) -> Option<ComplianceProfile> {
    features
        .iter()
        .filter_map(|f| ComplianceProfile::from_feature(f.as_ref()))
        .fold(None, |best: Option<ComplianceProfile>, candidate| match best {
            Some(current)
                if compliance_tariff(current).price_factor
                    >= compliance_tariff(candidate).price_factor =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
}

/// Cost of one call when `pooled_calls` calls are expected in total.
pub fn unit_cost_per_call(pooled_calls: f64) -> f64 {
    if pooled_calls <= 0.0 {
        return 0.0;
    }
    CALL_COST_COEFFICIENT * pooled_calls.powf(CALL_COST_EXPONENT)
}

/// Compliance demand of one tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceDemand {
    pub suppliers: u64,
    pub profile: Option<ComplianceProfile>,
}

impl ComplianceDemand {
    fn calls(&self) -> f64 {
        self.profile
            .map(|p| compliance_tariff(p).avg_calls_per_supplier * self.suppliers as f64)
            .unwrap_or(0.0)
    }

    fn contributes(&self) -> bool {
        self.profile.is_some() && self.suppliers > 0
    }
}

/// Unrounded outcome of [`price_compliance`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompliancePricing {
    /// Cost per tier, in input order
    pub tier_costs: Vec<f64>,
    pub total: f64,
    pub pooled_calls: f64,
    pub unit_cost_per_call: f64,
    pub contributing_suppliers: u64,
    pub revenue_floor_applied: bool,
}

impl CompliancePricing {
    pub fn summary(&self) -> ComplianceSummary {
        ComplianceSummary {
            pooled_calls: self.pooled_calls,
            unit_cost_per_call: self.unit_cost_per_call,
            contributing_suppliers: self.contributing_suppliers,
            revenue_floor_applied: self.revenue_floor_applied,
        }
    }
}

/// Price the compliance calls of every tier.
pub fn price_compliance(demands: &[ComplianceDemand]) -> CompliancePricing {
    let pooled_calls: f64 = demands.iter().map(ComplianceDemand::calls).sum();
    let unit_cost = unit_cost_per_call(pooled_calls);

    let mut tier_costs: Vec<f64> = demands
        .iter()
        .map(|d| match d.profile {
            Some(p) => compliance_tariff(p).price_factor * unit_cost * d.suppliers as f64,
            None => 0.0,
        })
        .collect();
    let mut total: f64 = tier_costs.iter().sum();

    let contributing_suppliers: u64 = demands
        .iter()
        .filter(|d| d.contributes())
        .map(|d| d.suppliers)
        .sum();

    let revenue_floor_applied = contributing_suppliers > 0 && total < COMPLIANCE_REVENUE_FLOOR;
    if revenue_floor_applied {
        debug!(
            raw_total = total,
            floor = COMPLIANCE_REVENUE_FLOOR,
            contributing_suppliers,
            "Compliance total below revenue floor, reallocating"
        );
        for (cost, demand) in tier_costs.iter_mut().zip(demands) {
            *cost = if demand.contributes() {
                COMPLIANCE_REVENUE_FLOOR * demand.suppliers as f64 / contributing_suppliers as f64
            } else {
                0.0
            };
        }
        total = COMPLIANCE_REVENUE_FLOOR;
    }

    CompliancePricing {
        tier_costs,
        total,
        pooled_calls,
        unit_cost_per_call: unit_cost,
        contributing_suppliers,
        revenue_floor_applied,
    }
}
