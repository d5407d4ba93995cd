//! Quote calculator
//!
//! Turns a [`QuoteRequest`] into a [`CostBreakdown`] in one synchronous pass:
//! normalize the input, cost operations, third-party sourcing and compliance
//! per tier, add the client's fixed fees, then apply the margin.
//!
//! Amounts are accumulated unrounded and rounded to cents only when the
//! breakdown is built.

use std::collections::BTreeMap;

use tracing::debug;

use crate::compliance::{price_compliance, select_profile, ComplianceDemand};
use crate::error::{PricingError, PricingResult};
use crate::margin::PriceAdjuster;
use crate::models::{
    ClientType, CostBreakdown, FixedCostDetail, MarginConvention, QuoteRequest, Tier,
    TierBreakdown,
};
use crate::tariffs::{fixed_fees, is_enrichment_marker, operations_unit_cost, region_unit_cost};

/// Tolerance when comparing region percentage sums against 100
const PERCENT_EPSILON: f64 = 1e-9;

/// Behaviour switches of the calculator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculatorOptions {
    pub margin_convention: MarginConvention,
    /// Require region percentages to add up to exactly 100
    pub strict_regions: bool,
}

impl CalculatorOptions {
    pub fn with_margin_convention(mut self, convention: MarginConvention) -> Self {
        self.margin_convention = convention;
        self
    }

    pub fn with_strict_regions(mut self, strict: bool) -> Self {
        self.strict_regions = strict;
        self
    }
}

/// Stateless quote calculator. Cheap to copy and safe to share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteCalculator {
    options: CalculatorOptions,
}

/// One tier after normalization, before costing
#[derive(Debug, Clone, PartialEq)]
struct TierInput {
    label: String,
    tier: Option<Tier>,
    suppliers: u64,
    features: Vec<String>,
}

/// Unrounded cost lines of one tier
#[derive(Debug, Clone, PartialEq)]
struct TierCosts {
    operations: f64,
    third_party: f64,
    compliance: f64,
    enriched: bool,
}

impl QuoteCalculator {
    pub fn new(options: CalculatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CalculatorOptions {
        self.options
    }

    /// Compute the full breakdown of a quote.
    ///
    /// Fails before any costing when the region distribution, margin or
    /// declared supplier total is invalid; no partial result is produced.
    pub fn calculate(&self, request: &QuoteRequest) -> PricingResult<CostBreakdown> {
        if let Some(regions) = &request.region_distribution {
            validate_regions(regions, self.options.strict_regions)?;
        }
        let adjuster = PriceAdjuster::new(self.options.margin_convention, request.margin)?;

        let tiers = normalize_tiers(request);
        let distributed = tiers
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.suppliers));
        let total_suppliers = match request.total_suppliers {
            Some(declared) if declared != distributed => {
                return Err(PricingError::SupplierCountMismatch {
                    declared,
                    distributed,
                })
            }
            _ => distributed,
        };

        let region_rates = request
            .region_distribution
            .as_ref()
            .map(resolve_region_rates)
            .unwrap_or_default();

        let profiles: Vec<_> = tiers.iter().map(|t| select_profile(&t.features)).collect();
        let demands: Vec<ComplianceDemand> = tiers
            .iter()
            .zip(&profiles)
            .map(|(t, profile)| ComplianceDemand {
                suppliers: t.suppliers,
                profile: *profile,
            })
            .collect();
        let compliance = price_compliance(&demands);

        let costs: Vec<TierCosts> = tiers
            .iter()
            .zip(&compliance.tier_costs)
            .map(|(t, compliance_cost)| {
                let enriched = t.features.iter().any(|f| is_enrichment_marker(f));
                TierCosts {
                    operations: operations_cost(t),
                    third_party: if enriched {
                        third_party_cost(t.suppliers, &region_rates)
                    } else {
                        0.0
                    },
                    compliance: *compliance_cost,
                    enriched,
                }
            })
            .collect();

        let fixed = fixed_cost(request.client_type.as_deref(), request.include_integrations);

        // Published figures are built from the rounded components so the
        // breakdown adds up to the cent.
        let operations_cost = round2(costs.iter().map(|c| c.operations).sum());
        let third_party_cost = round2(costs.iter().map(|c| c.third_party).sum());
        let compliance_cost = round2(compliance.total);
        let variable_cost = round2(operations_cost + third_party_cost + compliance_cost);
        let fixed_cost = round2(fixed.total());
        let total_cost = round2(variable_cost + fixed_cost);

        let price_per_supplier = if total_suppliers > 0 {
            adjuster.adjust(variable_cost) / total_suppliers as f64
        } else {
            0.0
        };

        let tier_breakdowns: Vec<TierBreakdown> = tiers
            .iter()
            .zip(&costs)
            .zip(&profiles)
            .map(|((t, c), profile)| {
                let operations_cost = round2(c.operations);
                let third_party_cost = round2(c.third_party);
                let compliance_cost = round2(c.compliance);
                TierBreakdown {
                    tier: t.label.clone(),
                    suppliers: t.suppliers,
                    operations_cost,
                    third_party_cost,
                    compliance_cost,
                    total_cost: round2(operations_cost + third_party_cost + compliance_cost),
                    enriched: c.enriched,
                    compliance_profile: *profile,
                }
            })
            .collect();

        let price_per_tier: BTreeMap<String, f64> = tier_breakdowns
            .iter()
            .filter(|t| t.suppliers > 0)
            .map(|t| {
                (
                    t.tier.clone(),
                    round2(adjuster.adjust(t.total_cost) / t.suppliers as f64),
                )
            })
            .collect();

        let mut compliance_summary = compliance.summary();
        compliance_summary.unit_cost_per_call = round8(compliance_summary.unit_cost_per_call);

        Ok(CostBreakdown {
            tiers: tier_breakdowns,
            operations_cost,
            third_party_cost,
            compliance_cost,
            variable_cost,
            fixed_cost,
            fixed_cost_detail: FixedCostDetail {
                client_type: fixed.client_type,
                setup: round2(fixed.setup),
                license: round2(fixed.license),
                integrations: round2(fixed.integrations),
            },
            total_cost,
            suggested_price: round2(adjuster.adjust(total_cost)),
            price_per_supplier: round2(price_per_supplier),
            price_per_tier,
            total_suppliers,
            margin: request.margin,
            margin_convention: self.options.margin_convention,
            compliance: compliance_summary,
        })
    }
}

/// Compute a quote with the default calculator from positional arguments.
#[allow(clippy::too_many_arguments)]
pub fn compute_pricing(
    total_supplier_count: u64,
    supplier_distribution: BTreeMap<String, u64>,
    region_distribution: Option<BTreeMap<String, f64>>,
    margin: Option<f64>,
    feature_flags: Option<BTreeMap<String, Vec<String>>>,
    client_type: Option<&str>,
    include_integrations: bool,
) -> PricingResult<CostBreakdown> {
    let request = QuoteRequest {
        total_suppliers: Some(total_supplier_count),
        supplier_distribution,
        region_distribution,
        margin,
        feature_flags,
        client_type: client_type.map(str::to_string),
        include_integrations,
    };
    QuoteCalculator::default().calculate(&request)
}

/// Check each percentage and their sum.
pub fn validate_regions(regions: &BTreeMap<String, f64>, strict: bool) -> PricingResult<()> {
    if regions.is_empty() {
        return Ok(());
    }

    for (region, value) in regions {
        if !value.is_finite() || !(0.0..=100.0).contains(value) {
            return Err(PricingError::InvalidRegionPercentage {
                region: region.clone(),
                value: *value,
            });
        }
    }

    let total: f64 = regions.values().sum();
    if total > 100.0 + PERCENT_EPSILON {
        return Err(PricingError::RegionPercentageExceeded { total });
    }
    if strict && (total - 100.0).abs() > PERCENT_EPSILON {
        return Err(PricingError::RegionPercentageIncomplete { total });
    }
    Ok(())
}

/// Merge labels that name the same tier and attach their feature flags.
fn normalize_tiers(request: &QuoteRequest) -> Vec<TierInput> {
    let mut merged: BTreeMap<String, TierInput> = BTreeMap::new();

    for (label, count) in &request.supplier_distribution {
        let canonical = Tier::canonical_label(label);
        let entry = merged.entry(canonical.clone()).or_insert_with(|| TierInput {
            tier: Tier::from_label(&canonical),
            label: canonical,
            suppliers: 0,
            features: Vec::new(),
        });
        entry.suppliers = entry.suppliers.saturating_add(*count);
    }

    if let Some(flags) = &request.feature_flags {
        for (label, features) in flags {
            let canonical = Tier::canonical_label(label);
            match merged.get_mut(&canonical) {
                Some(entry) => {
                    for feature in features {
                        if !entry.features.contains(feature) {
                            entry.features.push(feature.clone());
                        }
                    }
                }
                None => debug!(tier = %canonical, "Feature flags for a tier without suppliers ignored"),
            }
        }
    }

    for input in merged.values().filter(|t| t.tier.is_none()) {
        debug!(tier = %input.label, "Unknown tier, operations cost is zero");
    }

    merged.into_values().collect()
}

fn operations_cost(input: &TierInput) -> f64 {
    input
        .tier
        .map(|tier| operations_unit_cost(tier) * input.suppliers as f64)
        .unwrap_or(0.0)
}

/// `(unit cost, share)` of each region; unknown regions cost zero.
fn resolve_region_rates(regions: &BTreeMap<String, f64>) -> Vec<(f64, f64)> {
    regions
        .iter()
        .map(|(region, pct)| {
            let unit_cost = region_unit_cost(region).unwrap_or_else(|| {
                debug!(%region, "Unknown region, sourcing cost is zero");
                0.0
            });
            (unit_cost, pct / 100.0)
        })
        .collect()
}

fn third_party_cost(suppliers: u64, rates: &[(f64, f64)]) -> f64 {
    rates
        .iter()
        .map(|(unit_cost, share)| unit_cost * suppliers as f64 * share)
        .sum()
}

fn fixed_cost(client_type: Option<&str>, include_integrations: bool) -> FixedCostDetail {
    let Some(label) = client_type else {
        return FixedCostDetail::default();
    };
    let Some(client) = ClientType::from_label(label) else {
        debug!(client_type = %label, "Unknown client type, no fixed costs");
        return FixedCostDetail::default();
    };

    let fees = fixed_fees(client);
    FixedCostDetail {
        client_type: Some(client),
        setup: fees.setup,
        license: fees.license,
        integrations: if include_integrations {
            fees.integrations
        } else {
            0.0
        },
    }
}

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round8(value: f64) -> f64 {
    (value * 1e8).round() / 1e8
}
