// src/aggregation/aggregator.rs - Builds borrower → document type → cleaned documents
use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{json_type_name, CleanupError, CleanupResult};
use crate::extraction::borrower_field::extract_document_borrower;
use crate::extraction::label_tree::{extract_document, CleanedDocument};
use crate::extraction::noise::{strip_noise, strip_noise_value};
use crate::matching::consolidate::{consolidate_borrowers, BorrowerGroup};
use crate::matching::name::NameMatcher;
use crate::matching::resolve::{resolve_borrower, split_borrower_names};
use crate::utils::config::PipelineConfig;
use crate::utils::constants::{BORROWER_NAME_KEY, UNIDENTIFIED_BORROWER};
use crate::utils::progress_bars::logging::{PipelineLogger, PipelineStage};

/// Document type to cleaned documents, for one borrower.
pub type BorrowerDocuments = IndexMap<String, Vec<CleanedDocument>>;

/// Primary borrower name to that borrower's documents.
pub type AggregatedResult = IndexMap<String, BorrowerDocuments>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationStats {
    pub items: usize,
    pub borrower_groups: usize,
    pub documents_seen: usize,
    pub documents_stored: usize,
    pub documents_unresolved: usize,
    pub documents_malformed: usize,
    pub documents_empty: usize,
}

impl AggregationStats {
    pub fn documents_skipped(&self) -> usize {
        self.documents_unresolved + self.documents_malformed + self.documents_empty
    }
}

/// Unwraps a raw batch into its items.
///
/// A mapping is searched for the first non-empty list whose first element is a
/// mapping with a `BorrowerName`; failing that, a mapping with its own
/// `BorrowerName` is a single item. A list is used as-is.
pub fn normalize_batch(raw: &Value) -> CleanupResult<Vec<&Value>> {
    match raw {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(fields) => {
            let item_list = fields.values().find_map(|value| {
                let items = value.as_array()?;
                let first = items.first()?.as_object()?;
                first.contains_key(BORROWER_NAME_KEY).then_some(items)
            });
            if let Some(items) = item_list {
                return Ok(items.iter().collect());
            }
            if fields.contains_key(BORROWER_NAME_KEY) {
                return Ok(vec![raw]);
            }
            Err(CleanupError::InvalidStructure {
                found: "mapping without borrower items",
            })
        }
        other => Err(CleanupError::InvalidStructure {
            found: json_type_name(other),
        }),
    }
}

/// Distinct individual borrower names across all items, in first-seen order.
/// Multi-borrower strings are split; blanks and the unidentified placeholder are
/// left out.
pub fn collect_borrower_names(items: &[&Value]) -> Vec<String> {
    let mut names: IndexSet<String> = IndexSet::new();
    for item in items {
        let Some(raw_name) = top_level_borrower(item) else {
            continue;
        };
        let raw_name = raw_name.trim();
        if raw_name.is_empty() || raw_name == UNIDENTIFIED_BORROWER {
            continue;
        }
        for name in split_borrower_names(raw_name) {
            if name != UNIDENTIFIED_BORROWER {
                names.insert(name);
            }
        }
    }
    names.into_iter().collect()
}

fn top_level_borrower(item: &Value) -> Option<&str> {
    item.as_object()?.get(BORROWER_NAME_KEY)?.as_str()
}

/// Resolves every document in a batch to a consolidated borrower and stores its
/// cleaned form under that borrower and its document type.
#[derive(Debug, Clone, Default)]
pub struct DocumentAggregator {
    config: PipelineConfig,
    matcher: NameMatcher,
}

impl DocumentAggregator {
    pub fn new(config: PipelineConfig) -> Self {
        let matcher = NameMatcher::new(config.thresholds.clone());
        Self { config, matcher }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn aggregate(&self, raw: &Value) -> CleanupResult<AggregatedResult> {
        self.aggregate_with_stats(raw).map(|(result, _)| result)
    }

    pub fn aggregate_with_stats(
        &self,
        raw: &Value,
    ) -> CleanupResult<(AggregatedResult, AggregationStats)> {
        let logger = PipelineLogger::new(PipelineStage::Aggregation);
        let items = normalize_batch(raw)?;
        logger.log_start(&format!("{} items", items.len()));

        let mut stats = AggregationStats {
            items: items.len(),
            ..AggregationStats::default()
        };

        let groups = self.consolidate(&items);
        stats.borrower_groups = groups.len();
        if groups.is_empty() && !items.is_empty() {
            logger.log_warning("No usable borrower names in batch; nothing can be attributed");
        }

        let mut result: AggregatedResult = groups
            .iter()
            .map(|group| (group.primary_name.clone(), BorrowerDocuments::new()))
            .collect();

        logger.log_phase("Resolving documents", None);
        for item in &items {
            self.aggregate_item(item, &groups, &mut result, &mut stats);
        }

        if !self.config.preserve_empty_borrowers {
            result.retain(|borrower, documents| {
                if documents.is_empty() {
                    debug!("Dropping borrower '{}' with no stored documents", borrower);
                }
                !documents.is_empty()
            });
        }

        logger.log_completion(result.len(), stats.documents_stored, stats.documents_skipped());
        Ok((result, stats))
    }

    fn consolidate(&self, items: &[&Value]) -> Vec<BorrowerGroup> {
        let logger = PipelineLogger::new(PipelineStage::Consolidation);
        let names = collect_borrower_names(items);
        let groups = consolidate_borrowers(&names, &self.matcher);
        logger.log_consolidation(names.len(), groups.len());
        for group in groups.iter().filter(|g| g.variations.len() > 1) {
            logger.log_debug(&format!(
                "'{}' absorbs variants {:?}",
                group.primary_name,
                &group.variations[1..]
            ));
        }
        groups
    }

    fn aggregate_item(
        &self,
        item: &Value,
        groups: &[BorrowerGroup],
        result: &mut AggregatedResult,
        stats: &mut AggregationStats,
    ) {
        let Some(fields) = item.as_object() else {
            debug!("Skipping batch item of type {}", json_type_name(item));
            return;
        };
        if !fields.contains_key(BORROWER_NAME_KEY) {
            debug!("Skipping batch item without {}", BORROWER_NAME_KEY);
            return;
        }
        let top_level = top_level_borrower(item).unwrap_or_default();

        for (document_type, value) in fields {
            if document_type == BORROWER_NAME_KEY {
                continue;
            }
            let documents = match value {
                Value::Array(documents) => documents.iter().collect::<Vec<_>>(),
                single => vec![single],
            };
            for document in documents {
                stats.documents_seen += 1;
                if !document.is_object() {
                    stats.documents_malformed += 1;
                    debug!("Skipping non-mapping entry under '{}'", document_type);
                    continue;
                }

                let Some(borrower) = self.resolve_document(document, top_level, groups) else {
                    stats.documents_unresolved += 1;
                    PipelineLogger::new(PipelineStage::Resolution).log_debug(&format!(
                        "No borrower group for a '{}' document of '{}'",
                        document_type, top_level
                    ));
                    continue;
                };

                let cleaned = self.clean_document(document);
                if cleaned.is_empty() {
                    stats.documents_empty += 1;
                    PipelineLogger::new(PipelineStage::Extraction).log_debug(&format!(
                        "'{}' document for '{}' has no content left",
                        document_type, borrower
                    ));
                    continue;
                }

                result
                    .entry(borrower)
                    .or_default()
                    .entry(document_type.clone())
                    .or_default()
                    .push(cleaned);
                stats.documents_stored += 1;
            }
        }
    }

    /// The borrower named inside the document wins; the item's `BorrowerName`
    /// is the fallback when the document names nobody.
    fn resolve_document(
        &self,
        document: &Value,
        top_level: &str,
        groups: &[BorrowerGroup],
    ) -> Option<String> {
        match extract_document_borrower(document, &self.config.indicators) {
            Some(document_name) => resolve_borrower(&document_name, groups, &self.matcher),
            None => {
                let top_level = top_level.trim();
                if top_level.is_empty() || top_level == UNIDENTIFIED_BORROWER {
                    return None;
                }
                resolve_borrower(top_level, groups, &self.matcher)
            }
        }
    }

    // Noise is stripped from the raw tree too, so documents flattened into path
    // keys lose nested noise as well.
    fn clean_document(&self, document: &Value) -> CleanedDocument {
        if self.config.strip_noise {
            strip_noise(&extract_document(&strip_noise_value(document)))
        } else {
            extract_document(document)
        }
    }
}

/// Aggregates a batch with the default configuration.
pub fn aggregate_documents(raw: &Value) -> CleanupResult<AggregatedResult> {
    DocumentAggregator::default().aggregate(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::name::MatchThresholds;
    use serde_json::json;

    fn paystub(net_pay: &str) -> Value {
        json!({
            "Title": "paystub.pdf",
            "Summary": [{"Labels": [
                {"LabelName": "Net Pay", "Values": [{"Value": net_pay, "ConfidenceScore": 0.98}]}
            ]}]
        })
    }

    fn named_paystub(employee: &str, net_pay: &str) -> Value {
        json!({
            "Summary": [{"Labels": [
                {"LabelName": "Employee Name", "Values": [{"Value": employee}]},
                {"LabelName": "Net Pay", "Values": [{"Value": net_pay}]}
            ]}]
        })
    }

    #[test]
    fn test_multi_borrower_batch() {
        let batch = json!([
            {"BorrowerName": "John Smith, Jane Smith", "Paystub": [paystub("1800")]},
            {"BorrowerName": "Jane Smith", "Paystub": [paystub("2100")]}
        ]);
        let result = aggregate_documents(&batch).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(
            serde_json::to_value(&result["John Smith"]).unwrap(),
            json!({"Paystub": [{"Net Pay": "1800"}]})
        );
        assert_eq!(
            serde_json::to_value(&result["Jane Smith"]).unwrap(),
            json!({"Paystub": [{"Net Pay": "2100"}]})
        );
    }

    #[test]
    fn test_document_borrower_overrides_item_borrower() {
        let batch = json!([
            {"BorrowerName": "John Smith, Jane Smith", "Paystub": [
                named_paystub("JANE SMITH", "2100"),
                named_paystub("Jon Smith", "1800")
            ]}
        ]);
        let result = aggregate_documents(&batch).unwrap();
        assert_eq!(result["Jane Smith"]["Paystub"].len(), 1);
        assert_eq!(result["John Smith"]["Paystub"].len(), 1);
    }

    #[test]
    fn test_unresolvable_document_borrower_is_dropped() {
        let batch = json!([
            {"BorrowerName": "John Smith", "Paystub": [named_paystub("Peter Parker", "900")], "W2": paystub("5")}
        ]);
        let (result, stats) = DocumentAggregator::default().aggregate_with_stats(&batch).unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"John Smith": {"W2": [{"Net Pay": "5"}]}})
        );
        assert_eq!(stats.documents_unresolved, 1);
        assert_eq!(stats.documents_stored, 1);
    }

    #[test]
    fn test_variants_consolidate_under_first_seen_name() {
        let batch = json!({"loan": [
            {"BorrowerName": "John A Smith", "W2": [paystub("1")]},
            {"BorrowerName": "Jon Smith", "Paystub": [paystub("2")]},
            {"BorrowerName": "Unidentified Borrower", "Paystub": [paystub("3")]}
        ]});
        let result = aggregate_documents(&batch).unwrap();
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["John A Smith"]);
        assert_eq!(result["John A Smith"].keys().collect::<Vec<_>>(), vec!["W2", "Paystub"]);
    }

    #[test]
    fn test_single_item_mapping() {
        let batch = json!({"BorrowerName": "Mary Lee", "VOE": paystub("10"), "LoanNumber": "123"});
        let (result, stats) = DocumentAggregator::default().aggregate_with_stats(&batch).unwrap();
        assert_eq!(result["Mary Lee"]["VOE"].len(), 1);
        assert_eq!(stats.documents_malformed, 1);
    }

    #[test]
    fn test_no_valid_borrower_names_yields_empty_result() {
        let batch = json!([
            {"BorrowerName": "", "Paystub": [paystub("1")]},
            {"BorrowerName": "Unidentified Borrower", "Paystub": [paystub("2")]},
            {"Paystub": [paystub("3")]},
            "junk"
        ]);
        assert!(aggregate_documents(&batch).unwrap().is_empty());
        assert!(aggregate_documents(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_structure_is_an_error() {
        assert!(matches!(
            aggregate_documents(&json!("text")),
            Err(CleanupError::InvalidStructure { found: "string" })
        ));
        assert!(matches!(
            aggregate_documents(&json!({"loan": [1, 2], "meta": {}})),
            Err(CleanupError::InvalidStructure { .. })
        ));
    }

    #[test]
    fn test_preserve_empty_borrowers() {
        let batch = json!([
            {"BorrowerName": "John Smith", "Paystub": [paystub("1")]},
            {"BorrowerName": "Jane Doe", "Paystub": [{"Title": "only metadata"}]}
        ]);
        let dropped = aggregate_documents(&batch).unwrap();
        assert_eq!(dropped.keys().collect::<Vec<_>>(), vec!["John Smith"]);

        let aggregator = DocumentAggregator::new(PipelineConfig {
            preserve_empty_borrowers: true,
            ..PipelineConfig::default()
        });
        let kept = aggregator.aggregate(&batch).unwrap();
        assert_eq!(kept.keys().collect::<Vec<_>>(), vec!["John Smith", "Jane Doe"]);
        assert!(kept["Jane Doe"].is_empty());
    }

    #[test]
    fn test_noise_stripping_can_be_disabled() {
        let batch = json!([{"BorrowerName": "John Smith", "Paystub": [paystub("1")]}]);
        let aggregator = DocumentAggregator::new(PipelineConfig {
            strip_noise: false,
            ..PipelineConfig::default()
        });
        let result = aggregator.aggregate(&batch).unwrap();
        assert_eq!(
            serde_json::to_value(&result["John Smith"]["Paystub"][0]).unwrap(),
            json!({"Net Pay": "1", "Title": "paystub.pdf"})
        );
    }

    #[test]
    fn test_nested_noise_is_stripped_from_flattened_documents() {
        let batch = json!([{"BorrowerName": "John Smith", "VOE": [
            {"Meta": {"Url": "x", "PageNumber": 3, "Employer": "Acme"}, "Net Pay": "1"}
        ]}]);
        let result = aggregate_documents(&batch).unwrap();
        assert_eq!(
            serde_json::to_value(&result["John Smith"]["VOE"][0]).unwrap(),
            json!({"Meta.Employer": "Acme", "Net Pay": "1"})
        );
    }

    #[test]
    fn test_matcher_follows_configured_thresholds() {
        let config = PipelineConfig {
            thresholds: MatchThresholds {
                allow_single_token: true,
                ..MatchThresholds::default()
            },
            ..PipelineConfig::default()
        };
        let aggregator = DocumentAggregator::new(config);
        assert_eq!(aggregator.matcher.thresholds(), &aggregator.config().thresholds);
        assert!(aggregator.config().thresholds.allow_single_token);
    }

    #[test]
    fn test_collect_borrower_names_keeps_first_seen_order() {
        let batch = json!([
            {"BorrowerName": " Jane Doe , John Smith"},
            {"BorrowerName": "John Smith"},
            {"BorrowerName": 42},
            {"BorrowerName": "Amy Wu"}
        ]);
        let items = normalize_batch(&batch).unwrap();
        assert_eq!(
            collect_borrower_names(&items),
            vec!["Jane Doe", "John Smith", "Amy Wu"]
        );
    }
}
