use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use ts_rs::TS;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Service tier a supplier is screened under
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
    TS,
)]
#[ts(export)]
#[strum(ascii_case_insensitive)]
pub enum Tier {
    #[serde(rename = "360")]
    #[strum(serialize = "360")]
    Full360,
    #[serde(rename = "180")]
    #[strum(serialize = "180")]
    Partial180,
    Basic,
    Elementary,
    Digital,
}

impl Tier {
    /// Resolve a caller-supplied label. Matching ignores ASCII case and
    /// surrounding whitespace; anything else is not a tier.
    pub fn from_label(label: &str) -> Option<Self> {
        label.trim().parse().ok()
    }

    /// Canonical spelling used as map key in requests and breakdowns.
    ///
    /// Unknown labels are kept (trimmed) so they still show up in the
    /// breakdown, just without any operations cost.
    pub fn canonical_label(label: &str) -> String {
        match Self::from_label(label) {
            Some(tier) => tier.to_string(),
            None => label.trim().to_string(),
        }
    }
}

/// Compliance screening bundle detected from a tier's feature list.
///
/// Each bundle carries its own call volume and price factor (see
/// [`crate::tariffs::compliance_tariff`]); the two are tabulated
/// independently.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
    TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceProfile {
    #[strum(serialize = "Peps y Sips")]
    PepsSips,
    #[strum(serialize = "Medios Adversos")]
    AdverseMedia,
    #[strum(serialize = "Peps, Sips y Medios Adversos")]
    PepsSipsAdverseMedia,
    #[strum(serialize = "Stakeholders + Peps y Sips")]
    StakeholdersPepsSips,
    #[strum(serialize = "Stakeholders + Medios Adversos")]
    StakeholdersAdverseMedia,
    #[strum(serialize = "Stakeholders + Peps, Sips y Medios Adversos")]
    StakeholdersFull,
}

impl ComplianceProfile {
    /// Exact-match lookup of a feature label.
    pub fn from_feature(feature: &str) -> Option<Self> {
        feature.trim().parse().ok()
    }
}

/// Client segment keying the onboarding fee table
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
    TS,
)]
#[ts(export)]
#[strum(ascii_case_insensitive)]
pub enum ClientType {
    Pyme,
    Corporativo,
    Multinacional,
    Partner,
}

impl ClientType {
    pub fn from_label(label: &str) -> Option<Self> {
        label.trim().parse().ok()
    }
}

/// How a margin turns cost into price
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    ToSchema,
    TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum MarginConvention {
    /// `price = cost / (1 - margin)`: the margin is a share of the sale price.
    #[default]
    #[strum(to_string = "on_price", serialize = "on-price")]
    OnPrice,
    /// `price = cost * (1 + margin)`: the margin is a share of the cost.
    #[strum(to_string = "markup")]
    Markup,
}

/// Input of a quote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct QuoteRequest {
    /// Declared supplier total. When present it must match the distribution.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub total_suppliers: Option<u64>,
    /// Supplier count per tier label
    #[serde(default)]
    #[validate(custom(function = "validate_labels"))]
    #[ts(type = "Record<string, number>")]
    pub supplier_distribution: BTreeMap<String, u64>,
    /// Percentage of enriched suppliers sourced from each region
    #[serde(default)]
    #[validate(custom(function = "validate_labels"))]
    pub region_distribution: Option<BTreeMap<String, f64>>,
    /// Target margin as a fraction (0.25 = 25%)
    #[serde(default)]
    pub margin: Option<f64>,
    /// Feature labels detected per tier
    #[serde(default)]
    #[validate(custom(function = "validate_labels"))]
    pub feature_flags: Option<BTreeMap<String, Vec<String>>>,
    /// Client segment for onboarding fees
    #[serde(default)]
    #[validate(length(max = 64))]
    pub client_type: Option<String>,
    /// Charge the integrations fee of the client segment
    #[serde(default)]
    pub include_integrations: bool,
}

fn validate_labels<V>(map: &BTreeMap<String, V>) -> Result<(), ValidationError> {
    if map.keys().any(|k| k.trim().is_empty()) {
        let mut err = ValidationError::new("blank_label");
        err.message = Some("labels must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Cost lines of one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct TierBreakdown {
    pub tier: String,
    #[ts(type = "number")]
    pub suppliers: u64,
    pub operations_cost: f64,
    pub third_party_cost: f64,
    pub compliance_cost: f64,
    /// Variable cost of the tier: operations + third party + compliance
    pub total_cost: f64,
    pub enriched: bool,
    pub compliance_profile: Option<ComplianceProfile>,
}

/// Onboarding fees charged once per project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct FixedCostDetail {
    /// Recognized client segment, if any
    pub client_type: Option<ClientType>,
    pub setup: f64,
    pub license: f64,
    pub integrations: f64,
}

impl FixedCostDetail {
    pub fn total(&self) -> f64 {
        self.setup + self.license + self.integrations
    }
}

/// Inputs and outcome of the compliance call model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ComplianceSummary {
    /// Expected calls across all tiers
    pub pooled_calls: f64,
    /// Cost of one call on the volume curve
    pub unit_cost_per_call: f64,
    /// Suppliers whose tier carries a compliance profile
    #[ts(type = "number")]
    pub contributing_suppliers: u64,
    /// Whether the compliance total was raised to the revenue floor
    pub revenue_floor_applied: bool,
}

/// Result of a quote. Amounts are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct CostBreakdown {
    pub tiers: Vec<TierBreakdown>,
    pub operations_cost: f64,
    pub third_party_cost: f64,
    pub compliance_cost: f64,
    /// operations + third party + compliance
    pub variable_cost: f64,
    pub fixed_cost: f64,
    pub fixed_cost_detail: FixedCostDetail,
    /// variable + fixed
    pub total_cost: f64,
    /// Minimum project price: total cost with margin applied
    pub suggested_price: f64,
    /// Variable cost with margin applied, divided by the supplier total
    pub price_per_supplier: f64,
    /// Per-supplier minimum price of each tier with suppliers
    pub price_per_tier: BTreeMap<String, f64>,
    #[ts(type = "number")]
    pub total_suppliers: u64,
    pub margin: Option<f64>,
    pub margin_convention: MarginConvention,
    pub compliance: ComplianceSummary,
}
