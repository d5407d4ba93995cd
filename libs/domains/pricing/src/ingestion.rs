//! Document ingestion interface
//!
//! Workbook reading happens outside this crate. A reader hands over one
//! [`ExtractedDocument`] per uploaded file and [`summarize_documents`] folds
//! them into the per-tier feature flags a quote needs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{QuoteRequest, Tier};

/// What a workbook reader extracted from one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct ExtractedDocument {
    /// File name, used when reporting failures
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Tier label found in the general information sheet
    #[serde(default)]
    pub tier: Option<String>,
    /// Feature labels from the service list sheet
    #[serde(default)]
    pub features: Vec<String>,
    /// Set by the reader when the document could not be parsed
    #[serde(default)]
    pub parse_error: Option<String>,
}

/// Feature flags and document counts per tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct DocumentSummary {
    /// Deduplicated features per tier, in first-seen order
    pub features_by_tier: BTreeMap<String, Vec<String>>,
    /// Documents read per tier. Does not set supplier counts.
    #[ts(type = "Record<string, number>")]
    pub documents_per_tier: BTreeMap<String, u64>,
    /// Names of documents that contributed nothing
    pub failed_documents: Vec<String>,
}

impl DocumentSummary {
    /// Add these feature flags to `request`, keeping the flags it already has.
    pub fn merge_into(&self, request: &mut QuoteRequest) {
        if self.features_by_tier.is_empty() {
            return;
        }
        let flags = request.feature_flags.get_or_insert_with(BTreeMap::new);
        for (tier, features) in &self.features_by_tier {
            let entry = flags.entry(tier.clone()).or_default();
            for feature in features {
                if !entry.contains(feature) {
                    entry.push(feature.clone());
                }
            }
        }
    }

    pub fn accepted_documents(&self) -> u64 {
        self.documents_per_tier.values().sum()
    }
}

/// Fold extracted documents into per-tier feature flags.
///
/// Each document only contributes to its own tier. A document with a parse
/// error or without a tier label is listed in `failed_documents` and skipped;
/// processing continues with the next one.
pub fn summarize_documents(documents: &[ExtractedDocument]) -> DocumentSummary {
    let mut summary = DocumentSummary::default();

    for document in documents {
        if let Some(reason) = &document.parse_error {
            warn!(document = %document.name, %reason, "Skipping unreadable document");
            summary.failed_documents.push(document.name.clone());
            continue;
        }

        let Some(tier) = document
            .tier
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            warn!(document = %document.name, "Skipping document without a tier label");
            summary.failed_documents.push(document.name.clone());
            continue;
        };

        let tier = Tier::canonical_label(tier);
        *summary.documents_per_tier.entry(tier.clone()).or_insert(0) += 1;

        let features = summary.features_by_tier.entry(tier).or_default();
        for feature in &document.features {
            let feature = feature.trim();
            if !feature.is_empty() && !features.iter().any(|f| f == feature) {
                features.push(feature.to_string());
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: &str, tier: Option<&str>, features: &[&str]) -> ExtractedDocument {
        ExtractedDocument {
            name: name.to_string(),
            tier: tier.map(str::to_string),
            features: features.iter().map(|f| f.to_string()).collect(),
            parse_error: None,
        }
    }

    #[test]
    fn test_features_are_deduplicated_per_tier() {
        let summary = summarize_documents(&[
            document("a.xlsx", Some("360"), &["Peps y Sips", "Medios Adversos"]),
            document("b.xlsx", Some("360"), &["Medios Adversos", "Peps y Sips", "Stakeholders + Peps y Sips"]),
            document("c.xlsx", Some("Basic"), &["Peps y Sips"]),
        ]);

        assert_eq!(
            summary.features_by_tier["360"],
            vec!["Peps y Sips", "Medios Adversos", "Stakeholders + Peps y Sips"]
        );
        assert_eq!(summary.features_by_tier["Basic"], vec!["Peps y Sips"]);
        assert_eq!(summary.documents_per_tier["360"], 2);
        assert_eq!(summary.accepted_documents(), 3);
        assert!(summary.failed_documents.is_empty());
    }

    #[test]
    fn test_document_without_tier_does_not_leak_into_previous_tier() {
        let summary = summarize_documents(&[
            document("a.xlsx", Some("180"), &["Peps y Sips"]),
            document("b.xlsx", None, &["Stakeholders + Peps, Sips y Medios Adversos"]),
            document("c.xlsx", Some("  "), &["Medios Adversos"]),
        ]);

        assert_eq!(summary.features_by_tier["180"], vec!["Peps y Sips"]);
        assert_eq!(summary.failed_documents, vec!["b.xlsx", "c.xlsx"]);
        assert_eq!(summary.accepted_documents(), 1);
    }

    #[test]
    fn test_parse_failures_do_not_stop_processing() {
        let mut broken = document("broken.xlsx", Some("360"), &["Peps y Sips"]);
        broken.parse_error = Some("missing sheet".to_string());

        let summary = summarize_documents(&[broken, document("ok.xlsx", Some("digital"), &[])]);

        assert_eq!(summary.failed_documents, vec!["broken.xlsx"]);
        assert!(!summary.features_by_tier.contains_key("360"));
        assert_eq!(summary.documents_per_tier["Digital"], 1);
        assert_eq!(summary.features_by_tier["Digital"], Vec::<String>::new());
    }

    #[test]
    fn test_empty_summary_leaves_request_untouched() {
        let mut request = QuoteRequest::default();
        summarize_documents(&[]).merge_into(&mut request);
        assert_eq!(request.feature_flags, None);
    }

    #[test]
    fn test_merge_into_keeps_existing_flags() {
        let mut request = QuoteRequest {
            feature_flags: Some(BTreeMap::from([(
                "360".to_string(),
                vec!["Peps y Sips".to_string()],
            )])),
            ..Default::default()
        };
        let summary = summarize_documents(&[
            document("a.xlsx", Some("360"), &["Peps y Sips", "Medios Adversos"]),
            document("b.xlsx", Some("basic"), &["Medios Adversos"]),
        ]);

        summary.merge_into(&mut request);

        let flags = request.feature_flags.unwrap();
        assert_eq!(flags["360"], vec!["Peps y Sips", "Medios Adversos"]);
        assert_eq!(flags["Basic"], vec!["Medios Adversos"]);
    }
}
