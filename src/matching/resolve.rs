// src/matching/resolve.rs - Picks the canonical borrower for a document-level name
use log::debug;

use crate::matching::consolidate::BorrowerGroup;
use crate::matching::name::NameMatcher;

/// Splits a comma-joined multi-borrower string into trimmed, non-empty names.
pub fn split_borrower_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves a document-level name, possibly naming several borrowers, to the
/// primary name of one consolidated group.
///
/// With several comma-separated names, the first one that resolves wins.
pub fn resolve_borrower(
    document_name: &str,
    groups: &[BorrowerGroup],
    matcher: &NameMatcher,
) -> Option<String> {
    if document_name.is_empty() || groups.is_empty() {
        return None;
    }
    let individuals = split_borrower_names(document_name);
    if individuals.len() > 1 {
        let resolved = individuals
            .iter()
            .find_map(|name| resolve_single_borrower(name, groups, matcher));
        debug!("Multi-borrower name '{}' resolved to {:?}", document_name, resolved);
        return resolved;
    }
    resolve_single_borrower(document_name, groups, matcher)
}

/// Highest-scoring group among the variations that match `name`. Ties keep the
/// group seen first.
pub fn resolve_single_borrower(
    name: &str,
    groups: &[BorrowerGroup],
    matcher: &NameMatcher,
) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    let mut best_match: Option<&str> = None;
    let mut best_score = 0.0;

    for group in groups {
        for variation in &group.variations {
            if !matcher.matches(name, variation) {
                continue;
            }
            let score = matcher.similarity(name, variation);
            if score > best_score {
                best_score = score;
                best_match = Some(group.primary_name.as_str());
            }
        }
    }

    best_match.map(str::to_string)
}
