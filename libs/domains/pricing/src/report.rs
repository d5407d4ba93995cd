//! Tabular views of a breakdown
//!
//! The front end and the spreadsheet export both consume the same named
//! tables of string cells. The CLI prints them through `Display`.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::CostBreakdown;

pub const TIER_BREAKDOWN: &str = "Tier breakdown";
pub const TIER_PRICES: &str = "Minimum price per tier";
pub const FIXED_COSTS: &str = "Fixed costs";
pub const SUMMARY: &str = "Summary";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ReportTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Every table of one quote, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct QuoteReport {
    pub tables: Vec<ReportTable>,
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

impl QuoteReport {
    pub fn from_breakdown(breakdown: &CostBreakdown) -> Self {
        let mut tiers = ReportTable::new(
            TIER_BREAKDOWN,
            &[
                "Tier",
                "Suppliers",
                "Operations",
                "Third party",
                "Compliance",
                "Total",
            ],
        );
        for tier in &breakdown.tiers {
            tiers.push_row(vec![
                tier.tier.clone(),
                tier.suppliers.to_string(),
                money(tier.operations_cost),
                money(tier.third_party_cost),
                money(tier.compliance_cost),
                money(tier.total_cost),
            ]);
        }
        tiers.push_row(vec![
            "Total".to_string(),
            breakdown.total_suppliers.to_string(),
            money(breakdown.operations_cost),
            money(breakdown.third_party_cost),
            money(breakdown.compliance_cost),
            money(breakdown.variable_cost),
        ]);

        let mut prices = ReportTable::new(TIER_PRICES, &["Tier", "Price per supplier"]);
        for (tier, price) in &breakdown.price_per_tier {
            prices.push_row(vec![tier.clone(), money(*price)]);
        }

        let detail = &breakdown.fixed_cost_detail;
        let mut fixed = ReportTable::new(FIXED_COSTS, &["Concept", "Amount"]);
        fixed.push_row(vec!["Setup".to_string(), money(detail.setup)]);
        fixed.push_row(vec!["License".to_string(), money(detail.license)]);
        fixed.push_row(vec!["Integrations".to_string(), money(detail.integrations)]);
        fixed.push_row(vec!["Total".to_string(), money(breakdown.fixed_cost)]);

        let mut summary = ReportTable::new(SUMMARY, &["Concept", "Value"]);
        summary.push_row(vec!["Total cost".to_string(), money(breakdown.total_cost)]);
        summary.push_row(vec![
            "Suggested price".to_string(),
            money(breakdown.suggested_price),
        ]);
        summary.push_row(vec![
            "Price per supplier".to_string(),
            money(breakdown.price_per_supplier),
        ]);
        summary.push_row(vec![
            "Margin".to_string(),
            match breakdown.margin {
                Some(m) => format!("{:.2}% ({})", m * 100.0, breakdown.margin_convention),
                None => "-".to_string(),
            },
        ]);
        summary.push_row(vec![
            "Compliance cost per call".to_string(),
            format!("{:.8}", breakdown.compliance.unit_cost_per_call),
        ]);
        summary.push_row(vec![
            "Compliance revenue floor applied".to_string(),
            if breakdown.compliance.revenue_floor_applied { "yes" } else { "no" }.to_string(),
        ]);

        Self {
            tables: vec![tiers, prices, fixed, summary],
        }
    }

    pub fn table(&self, name: &str) -> Option<&ReportTable> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        writeln!(f, "{}", self.name)?;
        let write_row = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, width))| {
                    // First column is a label, the rest are figures.
                    if i == 0 {
                        format!("{cell:<width$}")
                    } else {
                        format!("{cell:>width$}")
                    }
                })
                .collect();
            writeln!(f, "  {}", line.join("  ").trim_end())
        };

        write_row(f, &self.columns)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "  {}", rule.join("  "))?;
        for row in &self.rows {
            write_row(f, row)?;
        }
        Ok(())
    }
}

impl fmt::Display for QuoteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{table}")?;
        }
        Ok(())
    }
}
