// src/aggregation/summary.rs - Grouping of single-document Summary sections
use indexmap::IndexMap;
use serde_json::Value;

use crate::utils::constants::UNKNOWN_BORROWER;

/// Borrower to document type to raw sections.
pub type SectionsByBorrower = IndexMap<String, IndexMap<String, Vec<Value>>>;

/// Canonical document type for an extraction skill name.
pub fn normalize_doc_type(skill_name: &str) -> String {
    let lowered = skill_name.to_lowercase();
    if lowered.contains("w2") {
        return "W-2".to_string();
    }
    if lowered.contains("paystub") {
        return "Paystub".to_string();
    }
    if lowered.contains("bank") {
        return "Bank Statement".to_string();
    }
    title_case(&lowered)
}

// Upper-cases the first letter of every alphabetic run.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() && !previous_alpha {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        previous_alpha = c.is_alphabetic();
    }
    out
}

/// Name from the first `Label`/`Value` pair that looks like a borrower field.
pub fn section_borrower(section: &Value) -> String {
    let labels = section
        .get("Labels")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for label in labels {
        let name = label
            .get("Label")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();
        if name.contains("employee name") || name.contains("borrower") || name == "name" {
            if let Some(value) = label.get("Value").and_then(Value::as_str) {
                if !value.is_empty() {
                    return value.trim().to_string();
                }
            }
        }
    }
    UNKNOWN_BORROWER.to_string()
}

/// Groups the sections of one document's `Summary` list by borrower and
/// normalized document type. Sections are kept as they are.
pub fn aggregate_summary_sections(raw: &Value) -> SectionsByBorrower {
    let mut aggregated = SectionsByBorrower::new();
    let Some(sections) = raw.get("Summary").and_then(Value::as_array) else {
        return aggregated;
    };

    for section in sections {
        let borrower = section_borrower(section);
        let skill_name = section
            .get("SkillName")
            .and_then(Value::as_str)
            .unwrap_or("Unknown");
        aggregated
            .entry(borrower)
            .or_default()
            .entry(normalize_doc_type(skill_name))
            .or_default()
            .push(section.clone());
    }
    aggregated
}
