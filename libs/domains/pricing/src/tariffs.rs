//! Tariff tables
//!
//! Business constants for screening quotes, in euros. They are compiled in:
//! a tariff change ships as a new build, never as runtime configuration.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::models::{ClientType, ComplianceProfile, Tier};

/// Coefficient of the per-call compliance cost curve
pub const CALL_COST_COEFFICIENT: f64 = 1661.9;
/// Exponent of the per-call compliance cost curve
pub const CALL_COST_EXPONENT: f64 = -0.738;
/// Minimum compliance revenue of a project that uses compliance at all
pub const COMPLIANCE_REVENUE_FLOOR: f64 = 5000.0;

/// Feature labels that switch on third-party enrichment. The "documento"
/// capitalization differs between workbook generations; both are live.
pub const ENRICHMENT_MARKERS: [&str; 4] = [
    "Modelo Completo Enriquecido (Con Documento)",
    "Modelo Completo Enriquecido (Con documento)",
    "Modelo Reducido Enriquecido (Con Documento)",
    "Modelo Reducido Enriquecido (Con documento)",
];

/// Operations cost per supplier
pub const fn operations_unit_cost(tier: Tier) -> f64 {
    match tier {
        Tier::Full360 => 25.97,
        Tier::Partial180 => 11.41,
        Tier::Basic => 2.32,
        Tier::Elementary => 0.54,
        Tier::Digital => 0.27,
    }
}

/// Third-party sourcing cost of one supplier in a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionTariff {
    pub region: &'static str,
    pub unit_cost: f64,
}

pub const REGION_TARIFFS: &[RegionTariff] = &[
    RegionTariff { region: "España", unit_cost: 4.85 },
    RegionTariff { region: "Portugal", unit_cost: 6.10 },
    RegionTariff { region: "Europa (All Countries less ESP and PRT)", unit_cost: 35.26 },
    RegionTariff { region: "Africa", unit_cost: 41.30 },
    RegionTariff { region: "LATAM", unit_cost: 27.45 },
    RegionTariff { region: "Asia", unit_cost: 38.90 },
    RegionTariff { region: "Oceania", unit_cost: 36.15 },
    RegionTariff { region: "Norte America", unit_cost: 30.80 },
    RegionTariff { region: "Centro America", unit_cost: 29.10 },
    RegionTariff { region: "Oriente Medio", unit_cost: 43.75 },
    RegionTariff { region: "ROW", unit_cost: 45.00 },
    // Flat-rate contracts: sourcing is already paid for.
    RegionTariff { region: "Tarifa Plana", unit_cost: 0.0 },
];

/// Short labels accepted for a tariff row
pub const REGION_ALIASES: &[(&str, &str)] =
    &[("Europa", "Europa (All Countries less ESP and PRT)")];

/// Unit cost of a region label or alias, ignoring case and surrounding
/// whitespace.
pub fn region_unit_cost(label: &str) -> Option<f64> {
    let label = label.trim();
    let label = REGION_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(label))
        .map_or(label, |(_, region)| *region);
    REGION_TARIFFS
        .iter()
        .find(|t| t.region.eq_ignore_ascii_case(label))
        .map(|t| t.unit_cost)
}

pub fn is_enrichment_marker(feature: &str) -> bool {
    let feature = feature.trim();
    ENRICHMENT_MARKERS.contains(&feature)
}

/// Call volume and price weight of a compliance profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceTariff {
    pub avg_calls_per_supplier: f64,
    pub price_factor: f64,
}

pub const fn compliance_tariff(profile: ComplianceProfile) -> ComplianceTariff {
    let (avg_calls_per_supplier, price_factor) = match profile {
        ComplianceProfile::PepsSips => (1.0, 1.00),
        ComplianceProfile::AdverseMedia => (1.5, 1.20),
        ComplianceProfile::PepsSipsAdverseMedia => (2.5, 1.65),
        ComplianceProfile::StakeholdersPepsSips => (4.0, 2.10),
        ComplianceProfile::StakeholdersAdverseMedia => (5.0, 2.35),
        ComplianceProfile::StakeholdersFull => (7.5, 3.00),
    };
    ComplianceTariff {
        avg_calls_per_supplier,
        price_factor,
    }
}

/// Onboarding fees of a client segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFees {
    pub setup: f64,
    pub license: f64,
    pub integrations: f64,
}

pub const fn fixed_fees(client: ClientType) -> FixedFees {
    let (setup, license, integrations) = match client {
        ClientType::Pyme => (1500.0, 2400.0, 1800.0),
        ClientType::Corporativo => (3500.0, 6000.0, 4200.0),
        ClientType::Multinacional => (6000.0, 12000.0, 7500.0),
        ClientType::Partner => (0.0, 3600.0, 2500.0),
    };
    FixedFees {
        setup,
        license,
        integrations,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TierRate {
    pub tier: Tier,
    pub unit_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegionRate {
    pub region: String,
    pub unit_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComplianceRate {
    pub profile: ComplianceProfile,
    /// Feature label that selects this profile
    pub feature: String,
    pub avg_calls_per_supplier: f64,
    pub price_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClientFees {
    pub client_type: ClientType,
    pub setup: f64,
    pub license: f64,
    pub integrations: f64,
}

/// Every tariff in one document, for display and audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TariffSheet {
    pub tiers: Vec<TierRate>,
    pub regions: Vec<RegionRate>,
    pub compliance_profiles: Vec<ComplianceRate>,
    pub client_types: Vec<ClientFees>,
    pub enrichment_markers: Vec<String>,
    pub compliance_revenue_floor: f64,
    pub call_cost_coefficient: f64,
    pub call_cost_exponent: f64,
}

impl TariffSheet {
    pub fn current() -> Self {
        Self {
            tiers: Tier::iter()
                .map(|tier| TierRate {
                    tier,
                    unit_cost: operations_unit_cost(tier),
                })
                .collect(),
            regions: REGION_TARIFFS
                .iter()
                .map(|t| RegionRate {
                    region: t.region.to_string(),
                    unit_cost: t.unit_cost,
                })
                .collect(),
            compliance_profiles: ComplianceProfile::iter()
                .map(|profile| {
                    let tariff = compliance_tariff(profile);
                    ComplianceRate {
                        profile,
                        feature: profile.to_string(),
                        avg_calls_per_supplier: tariff.avg_calls_per_supplier,
                        price_factor: tariff.price_factor,
                    }
                })
                .collect(),
            client_types: ClientType::iter()
                .map(|client_type| {
                    let fees = fixed_fees(client_type);
                    ClientFees {
                        client_type,
                        setup: fees.setup,
                        license: fees.license,
                        integrations: fees.integrations,
                    }
                })
                .collect(),
            enrichment_markers: ENRICHMENT_MARKERS.iter().map(|m| m.to_string()).collect(),
            compliance_revenue_floor: COMPLIANCE_REVENUE_FLOOR,
            call_cost_coefficient: CALL_COST_COEFFICIENT,
            call_cost_exponent: CALL_COST_EXPONENT,
        }
    }
}
