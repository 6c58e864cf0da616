// src/matching/consolidate.rs - Greedy grouping of borrower name variants
use log::debug;
use serde::{Deserialize, Serialize};

use crate::matching::name::NameMatcher;

/// One borrower and every spelling of their name seen in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerGroup {
    /// First variant encountered; used as the output key.
    pub primary_name: String,
    /// All variants in the group, `primary_name` first.
    pub variations: Vec<String>,
}

/// Partitions `names` into borrower groups.
///
/// Each unassigned name opens a group and absorbs every later unassigned name
/// that matches it. Members are compared against the primary only, never
/// against each other, so the grouping is not a transitive closure.
pub fn consolidate_borrowers(names: &[String], matcher: &NameMatcher) -> Vec<BorrowerGroup> {
    let mut groups = Vec::new();
    let mut assigned = vec![false; names.len()];

    for (i, primary) in names.iter().enumerate() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut variations = vec![primary.clone()];

        for (j, candidate) in names.iter().enumerate().skip(i + 1) {
            if assigned[j] {
                continue;
            }
            if matcher.matches(primary, candidate) {
                debug!("Grouping '{}' under '{}'", candidate, primary);
                variations.push(candidate.clone());
                assigned[j] = true;
            }
        }

        groups.push(BorrowerGroup {
            primary_name: primary.clone(),
            variations,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_seen_name_is_primary() {
        let groups = consolidate_borrowers(
            &names(&["John A Smith", "Jon Smith", "Jane Doe"]),
            &NameMatcher::default(),
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].primary_name, "John A Smith");
        assert_eq!(groups[0].variations, vec!["John A Smith", "Jon Smith"]);
        assert_eq!(groups[1].primary_name, "Jane Doe");
        assert_eq!(groups[1].variations, vec!["Jane Doe"]);
    }

    #[test]
    fn test_input_order_decides_primary() {
        let groups = consolidate_borrowers(
            &names(&["Jon Smith", "John A Smith"]),
            &NameMatcher::default(),
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].primary_name, "Jon Smith");
    }

    #[test]
    fn test_empty_input() {
        assert!(consolidate_borrowers(&[], &NameMatcher::default()).is_empty());
    }

    #[test]
    fn test_every_group_contains_its_primary() {
        let groups = consolidate_borrowers(
            &names(&["Mary Lee", "M Lee", "Mary Leigh", "Bob Stone", "Robert Stone"]),
            &NameMatcher::default(),
        );
        let total: usize = groups.iter().map(|g| g.variations.len()).sum();
        assert_eq!(total, 5);
        for group in &groups {
            assert_eq!(group.variations.first(), Some(&group.primary_name));
        }
    }

    // Known-ambiguous: grouping checks members against the primary only.
    // "John A Smith" and "John B Smith" do not match each other, but both match
    // the primary "John Smith" and so share a group. Conversely, when the primary
    // is "John A Smith", "John B Smith" is left out even though "John Smith"
    // (already in the group) would have matched it.
    #[test]
    fn test_grouping_is_not_transitive() {
        let matcher = NameMatcher::default();
        assert!(!matcher.matches("John A Smith", "John B Smith"));

        let groups = consolidate_borrowers(
            &names(&["John Smith", "John A Smith", "John B Smith"]),
            &matcher,
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].variations.len(), 3);

        let groups = consolidate_borrowers(
            &names(&["John A Smith", "John Smith", "John B Smith"]),
            &matcher,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].variations, vec!["John A Smith", "John Smith"]);
        assert_eq!(groups[1].primary_name, "John B Smith");
    }
}
