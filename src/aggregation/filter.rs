// src/aggregation/filter.rs - Document-type projections of an aggregated result
use serde::Serialize;

use crate::aggregation::aggregator::{AggregatedResult, BorrowerDocuments};
use crate::utils::constants::{
    BANK_STATEMENT_SECTIONS, INCOME_SECTIONS, INCOME_SECTIONS_WITH_BANK_STATEMENT,
};
use crate::utils::progress_bars::logging::{PipelineLogger, PipelineStage};

/// Keeps only the document types named in `allowed_types` (case-insensitive).
/// Borrowers left with no document type are dropped.
pub fn filter_by_type<S: AsRef<str>>(
    aggregated: &AggregatedResult,
    allowed_types: &[S],
) -> AggregatedResult {
    let allowed: Vec<String> = allowed_types
        .iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect();

    let filtered: AggregatedResult = aggregated
        .iter()
        .filter_map(|(borrower, documents)| {
            let kept: BorrowerDocuments = documents
                .iter()
                .filter(|(doc_type, _)| allowed.contains(&doc_type.to_lowercase()))
                .map(|(doc_type, docs)| (doc_type.clone(), docs.clone()))
                .collect();
            (!kept.is_empty()).then(|| (borrower.clone(), kept))
        })
        .collect();

    PipelineLogger::new(PipelineStage::Filtering).log_debug(&format!(
        "{:?}: {} of {} borrowers kept",
        allowed,
        filtered.len(),
        aggregated.len()
    ));
    filtered
}

/// The projections stored next to a loan's cleaned data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredViews {
    pub filtered_data: AggregatedResult,
    pub filtered_data_with_bs: AggregatedResult,
    pub only_bs: AggregatedResult,
}

impl FilteredViews {
    pub fn from_aggregated(aggregated: &AggregatedResult) -> Self {
        Self {
            filtered_data: filter_by_type(aggregated, &INCOME_SECTIONS),
            filtered_data_with_bs: filter_by_type(aggregated, &INCOME_SECTIONS_WITH_BANK_STATEMENT),
            only_bs: filter_by_type(aggregated, &BANK_STATEMENT_SECTIONS),
        }
    }
}
