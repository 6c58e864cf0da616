// src/extraction/borrower_field.rs - Finds the person a document is about
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::extraction::label_tree::{parse_summary, LabelNode};
use crate::utils::constants::{DEFAULT_BORROWER_INDICATORS, DEFAULT_EMPLOYER_INDICATORS};

static COMPANY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b(LLC|INC|CORP|LTD|CO|COMPANY|BANK|ASSOCIATION|CHASE|JPMORGAN)\b",
        r"\b(LENDING|FINANCIAL|SERVICES|SOLUTIONS|GROUP)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid company pattern"))
    .collect()
});
static NUMERIC_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid numeric pattern"));

/// Label-name fragments deciding which labels may hold the borrower's name.
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowerFieldIndicators {
    pub borrower: Vec<String>,
    pub employer: Vec<String>,
}

impl Default for BorrowerFieldIndicators {
    fn default() -> Self {
        Self {
            borrower: DEFAULT_BORROWER_INDICATORS.iter().map(|s| s.to_string()).collect(),
            employer: DEFAULT_EMPLOYER_INDICATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BorrowerFieldIndicators {
    /// A label names the borrower when it contains a borrower indicator and no
    /// employer indicator (case-insensitive).
    pub fn is_borrower_label(&self, label_name: &str) -> bool {
        let lowered = label_name.to_lowercase();
        let contains_any = |indicators: &[String]| {
            indicators
                .iter()
                .any(|indicator| lowered.contains(&indicator.to_lowercase()))
        };
        contains_any(&self.borrower) && !contains_any(&self.employer)
    }
}

/// True for values that cannot be a person's name: company-like, digits only,
/// or two characters or fewer.
pub fn is_implausible_person_name(value: &str) -> bool {
    let upper = value.to_uppercase();
    COMPANY_PATTERNS.iter().any(|re| re.is_match(&upper))
        || NUMERIC_ONLY.is_match(value)
        || value.chars().count() <= 2
}

/// Longest plausible person name found under a borrower-style label in the
/// document's `Summary`, if any.
pub fn extract_document_borrower(
    document: &Value,
    indicators: &BorrowerFieldIndicators,
) -> Option<String> {
    let summary = document.as_object()?.get("Summary")?;
    let mut borrower_name: Option<String> = None;

    for section in parse_summary(summary) {
        for label in &section.labels {
            let LabelNode::Values { name, values } = label else {
                continue;
            };
            if !indicators.is_borrower_label(name) {
                continue;
            }
            for value in values.iter().filter_map(Value::as_str) {
                let value = value.trim();
                if value.is_empty() || is_implausible_person_name(value) {
                    continue;
                }
                let longer = borrower_name
                    .as_ref()
                    .map_or(true, |current| value.chars().count() > current.chars().count());
                if longer {
                    borrower_name = Some(value.to_string());
                }
            }
        }
    }

    if let Some(name) = &borrower_name {
        debug!("Document names borrower '{}'", name);
    }
    borrower_name
}
