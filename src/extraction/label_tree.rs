// src/extraction/label_tree.rs - Summary/Labels/Groups tree parsing and flattening
//
// Grammar of the extraction output handled here:
//
//   document := { "Summary": section | [section, ...], ...metadata }
//   section  := { "Labels": [label, ...] }
//   label    := { "LabelName": string, "Values": [{ "Value": scalar }, ...] }
//             | { "LabelName": string, "Groups": [group, ...] }
//   group    := { "GroupName"?: string, "RecordLabels" | "Labels": [label, ...] }
//
// Anything that does not fit is skipped where it occurs.
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extraction::nested::extract_any_nested;
use crate::utils::constants::METADATA_KEYS;

const SUMMARY_KEY: &str = "Summary";
const LABELS_KEY: &str = "Labels";
const LABEL_NAME_KEY: &str = "LabelName";
const VALUES_KEY: &str = "Values";
const VALUE_KEY: &str = "Value";
const GROUPS_KEY: &str = "Groups";
const GROUP_NAME_KEY: &str = "GroupName";
const RECORD_LABELS_KEY: &str = "RecordLabels";
const GROUP_KEY: &str = "Group";
const DEFAULT_GROUP_NAME: &str = "Record";

/// Label name to cleaned value, in source order.
pub type CleanedDocument = IndexMap<String, CleanedValue>;

/// Value stored under one label of a cleaned document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CleanedValue {
    /// One record per surviving group, each starting with its `Group` name.
    Records(Vec<CleanedDocument>),
    /// Several values extracted for one label.
    List(Vec<Value>),
    /// A single extracted value, or copied metadata.
    Scalar(Value),
}

/// One `Labels` entry of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelNode {
    Values { name: String, values: Vec<Value> },
    Groups { name: String, groups: Vec<GroupNode> },
    /// A named label carrying neither values nor groups.
    Bare { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub name: Value,
    pub labels: Vec<LabelNode>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub labels: Vec<LabelNode>,
}

/// Parses a `Summary` value, wrapping a bare section in a list.
pub fn parse_summary(summary: &Value) -> Vec<Section> {
    match summary {
        Value::Array(sections) => sections.iter().filter_map(parse_section).collect(),
        Value::Object(_) => parse_section(summary).into_iter().collect(),
        other => {
            debug!("Ignoring Summary of unexpected shape: {}", other);
            Vec::new()
        }
    }
}

pub fn parse_section(section: &Value) -> Option<Section> {
    let section = section.as_object()?;
    let labels = section.get(LABELS_KEY).map(parse_labels).unwrap_or_default();
    Some(Section { labels })
}

pub fn parse_labels(labels: &Value) -> Vec<LabelNode> {
    match labels.as_array() {
        Some(entries) => entries.iter().filter_map(parse_label).collect(),
        None => Vec::new(),
    }
}

pub fn parse_label(label: &Value) -> Option<LabelNode> {
    let label = label.as_object()?;
    let name = match label.get(LABEL_NAME_KEY).and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            debug!("Skipping label without a LabelName");
            return None;
        }
    };

    // A non-empty Values list decides the label even when no entry holds a Value.
    if let Some(entries) = label.get(VALUES_KEY).and_then(Value::as_array) {
        if !entries.is_empty() {
            let values: Vec<Value> = entries
                .iter()
                .filter_map(|entry| entry.as_object()?.get(VALUE_KEY).cloned())
                .collect();
            if values.is_empty() {
                return Some(LabelNode::Bare { name });
            }
            return Some(LabelNode::Values { name, values });
        }
    }

    if let Some(groups) = label.get(GROUPS_KEY).and_then(Value::as_array) {
        if !groups.is_empty() {
            let groups = groups.iter().filter_map(parse_group).collect();
            return Some(LabelNode::Groups { name, groups });
        }
    }

    Some(LabelNode::Bare { name })
}

pub fn parse_group(group: &Value) -> Option<GroupNode> {
    let group = group.as_object()?;
    let name = match group.get(GROUP_NAME_KEY) {
        Some(name) if !is_blank(name) => name.clone(),
        _ => Value::String(DEFAULT_GROUP_NAME.to_string()),
    };
    let labels = group
        .get(RECORD_LABELS_KEY)
        .or_else(|| group.get(LABELS_KEY))
        .map(parse_labels)
        .unwrap_or_default();
    Some(GroupNode { name, labels })
}

// Null, false, zero and empty strings or containers.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Flattens one extracted document into label name → value.
///
/// Documents with a `Summary` go through the label tree; anything else is
/// flattened into dotted key paths. Top-level metadata is copied across in both
/// cases.
pub fn extract_document(document: &Value) -> CleanedDocument {
    let Some(fields) = document.as_object() else {
        return CleanedDocument::new();
    };

    let mut cleaned = match fields.get(SUMMARY_KEY) {
        Some(summary) => {
            let mut out = CleanedDocument::new();
            for section in parse_summary(summary) {
                collect_labels(&section.labels, &mut out);
            }
            out
        }
        None => extract_any_nested(document)
            .into_iter()
            .map(|(key, value)| (key, CleanedValue::Scalar(value)))
            .collect(),
    };

    for key in METADATA_KEYS {
        if let Some(value) = fields.get(key) {
            cleaned.insert(key.to_string(), CleanedValue::Scalar(value.clone()));
        }
    }
    cleaned
}

fn collect_labels(labels: &[LabelNode], out: &mut CleanedDocument) {
    for label in labels {
        match label {
            LabelNode::Values { name, values } => {
                let value = match values.as_slice() {
                    [single] => CleanedValue::Scalar(single.clone()),
                    many => CleanedValue::List(many.to_vec()),
                };
                out.insert(name.clone(), value);
            }
            LabelNode::Groups { name, groups } => {
                let records: Vec<CleanedDocument> = groups.iter().filter_map(build_record).collect();
                if !records.is_empty() {
                    out.insert(name.clone(), CleanedValue::Records(records));
                }
            }
            LabelNode::Bare { .. } => {}
        }
    }
}

fn build_record(group: &GroupNode) -> Option<CleanedDocument> {
    let mut record = CleanedDocument::new();
    record.insert(GROUP_KEY.to_string(), CleanedValue::Scalar(group.name.clone()));
    collect_labels(&group.labels, &mut record);
    (record.len() > 1).then_some(record)
}
