// src/matching/name.rs - Borrower name normalization and fuzzy person matching
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use strsim::levenshtein;

/// Generational and payable-on-death suffixes dropped before comparison.
static SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(POD|JR|SR|III|II|IV)\b").expect("valid suffix pattern"));
static PUNCTUATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation pattern"));

/// `threshold` value callers historically pass; cutoffs come from [`MatchThresholds`].
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.6;

/// Tuned cutoffs for component-wise name matching.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchThresholds {
    /// First names match when their sequence ratio is strictly above this.
    pub first_name_ratio: f64,
    /// Last names match when their sequence ratio is strictly above this.
    pub last_name_ratio: f64,
    /// Last names match when their edit distance is at most this.
    pub last_name_max_edits: usize,
    /// Middle tokens are compatible when their sequence ratio is strictly above this.
    pub middle_name_ratio: f64,
    /// Let single-token names take part in component matching.
    pub allow_single_token: bool,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            first_name_ratio: 0.8,
            last_name_ratio: 0.75,
            last_name_max_edits: 2,
            middle_name_ratio: 0.75,
            allow_single_token: false,
        }
    }
}

/// First/middle/last decomposition of a cleaned name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameComponents {
    pub first: String,
    pub middle: Vec<String>,
    pub last: String,
    pub all_parts: HashSet<String>,
}

impl NameComponents {
    pub fn is_empty(&self) -> bool {
        self.all_parts.is_empty()
    }
}

/// Canonical form of a raw name: upper case, suffixes and punctuation removed,
/// whitespace collapsed. Idempotent.
pub fn clean_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let upper = name.to_uppercase();
    let without_suffixes = SUFFIX_REGEX.replace_all(&upper, "");
    let without_punctuation = PUNCTUATION_REGEX.replace_all(&without_suffixes, " ");
    without_punctuation
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a name into first/middle/last tokens after cleaning it.
pub fn decompose_name(name: &str) -> NameComponents {
    let cleaned = clean_name(name);
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    components_from_parts(&parts)
}

fn components_from_parts(parts: &[&str]) -> NameComponents {
    let all_parts: HashSet<String> = parts.iter().map(|p| p.to_string()).collect();
    match parts {
        [] => NameComponents::default(),
        [only] => NameComponents {
            first: only.to_string(),
            middle: Vec::new(),
            last: String::new(),
            all_parts,
        },
        [first, middle @ .., last] => NameComponents {
            first: first.to_string(),
            middle: middle.iter().map(|m| m.to_string()).collect(),
            last: last.to_string(),
            all_parts,
        },
    }
}

/// Ratcliff/Obershelp similarity: twice the matched characters over the total
/// length. Inputs are put in a fixed order first so the score is symmetric.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_characters(&a, &b);
    2.0 * matched as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_common_block(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

// Earliest longest block in a[alo..ahi] / b[blo..bhi]; ties keep the smallest i, then j.
fn longest_common_block(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    let mut previous = vec![0usize; b.len() + 1];
    for i in alo..ahi {
        let mut current = vec![0usize; b.len() + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = previous[j] + 1;
                current[j + 1] = k;
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        previous = current;
    }
    (best_i, best_j, best_size)
}

/// Decides whether two raw names plausibly denote the same person.
#[derive(Debug, Clone, Default)]
pub struct NameMatcher {
    thresholds: MatchThresholds,
}

impl NameMatcher {
    pub fn new(thresholds: MatchThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    /// Same as [`NameMatcher::matches`]; `threshold` is accepted for callers that
    /// still pass one and does not move any cutoff.
    pub fn matches_with_threshold(&self, name1: &str, name2: &str, _threshold: f64) -> bool {
        self.matches(name1, name2)
    }

    pub fn matches(&self, name1: &str, name2: &str) -> bool {
        if name1.is_empty() || name2.is_empty() {
            return false;
        }
        let clean1 = clean_name(name1);
        let clean2 = clean_name(name2);
        if clean1 == clean2 {
            return true;
        }

        let parts1: Vec<&str> = clean1.split_whitespace().collect();
        let parts2: Vec<&str> = clean2.split_whitespace().collect();
        let min_parts = if self.thresholds.allow_single_token { 1 } else { 2 };
        if parts1.len() < min_parts || parts2.len() < min_parts {
            return false;
        }

        let (first1, last1) = (parts1[0], parts1[parts1.len() - 1]);
        let (first2, last2) = (parts2[0], parts2[parts2.len() - 1]);

        if !self.first_names_match(first1, first2) {
            return false;
        }
        if !self.last_names_match(last1, last2) {
            return false;
        }

        let middle1 = middle_tokens(&parts1);
        let middle2 = middle_tokens(&parts2);
        self.middle_names_compatible(middle1, middle2)
            && self.middle_names_compatible(middle2, middle1)
    }

    /// 1.0 for names that match, otherwise the better of the whole-string ratio
    /// and the token overlap (Jaccard) of the two names.
    pub fn similarity(&self, name1: &str, name2: &str) -> f64 {
        if self.matches(name1, name2) {
            return 1.0;
        }
        let direct = sequence_ratio(&clean_name(name1), &clean_name(name2));
        let components1 = decompose_name(name1);
        let components2 = decompose_name(name2);
        if components1.is_empty() || components2.is_empty() {
            return direct;
        }
        let (parts1, parts2) = (&components1.all_parts, &components2.all_parts);
        let intersection = parts1.intersection(parts2).count();
        let union = parts1.union(parts2).count();
        let overlap = intersection as f64 / union as f64;
        direct.max(overlap)
    }

    fn first_names_match(&self, first1: &str, first2: &str) -> bool {
        first1 == first2
            || is_initial_of(first1, first2)
            || is_initial_of(first2, first1)
            || sequence_ratio(first1, first2) > self.thresholds.first_name_ratio
    }

    fn last_names_match(&self, last1: &str, last2: &str) -> bool {
        last1 == last2
            || levenshtein(last1, last2) <= self.thresholds.last_name_max_edits
            || sequence_ratio(last1, last2) > self.thresholds.last_name_ratio
    }

    // Every token on the left needs a counterpart on the right.
    fn middle_names_compatible(&self, left: &[&str], right: &[&str]) -> bool {
        if left.is_empty() || right.is_empty() {
            return true;
        }
        left.iter().all(|m1| {
            right.iter().any(|m2| {
                m1 == m2
                    || is_initial_of(m1, m2)
                    || is_initial_of(m2, m1)
                    || sequence_ratio(m1, m2) > self.thresholds.middle_name_ratio
            })
        })
    }
}

fn middle_tokens<'a>(parts: &'a [&'a str]) -> &'a [&'a str] {
    if parts.len() > 2 {
        &parts[1..parts.len() - 1]
    } else {
        &[]
    }
}

// A one-letter token that equals the leading letter of `full`.
fn is_initial_of(initial: &str, full: &str) -> bool {
    let mut chars = initial.chars();
    match (chars.next(), chars.next(), full.chars().next()) {
        (Some(letter), None, Some(lead)) => letter == lead,
        _ => false,
    }
}

/// Convenience wrapper with the default thresholds.
pub fn names_match(name1: &str, name2: &str) -> bool {
    NameMatcher::default().matches(name1, name2)
}

/// Convenience wrapper with the default thresholds.
pub fn name_similarity(name1: &str, name2: &str) -> f64 {
    NameMatcher::default().similarity(name1, name2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name_strips_suffixes_and_punctuation() {
        assert_eq!(clean_name("john SMITH jr."), "JOHN SMITH");
        assert_eq!(clean_name("john SMITH jr."), clean_name("JOHN SMITH"));
        assert_eq!(clean_name("O'Brien,  Mary-Kate  III"), "O BRIEN MARY KATE");
        assert_eq!(clean_name("Robert Smith POD"), "ROBERT SMITH");
        assert_eq!(clean_name(""), "");
        assert_eq!(clean_name("   "), "");
    }

    #[test]
    fn test_clean_name_keeps_suffix_letters_inside_words() {
        assert_eq!(clean_name("Ivan Srinivasan"), "IVAN SRINIVASAN");
        assert_eq!(clean_name("Podesta Jrue"), "PODESTA JRUE");
    }

    #[test]
    fn test_clean_name_is_idempotent() {
        for raw in ["john SMITH jr.", "  Mary  o'neil ", "A.B. Carter, Sr", "José  Núñez II"] {
            let once = clean_name(raw);
            assert_eq!(clean_name(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_decompose_name() {
        assert_eq!(decompose_name(""), NameComponents::default());
        assert!(decompose_name(" ,. ").is_empty());

        let single = decompose_name("madonna");
        assert_eq!(single.first, "MADONNA");
        assert_eq!(single.last, "");
        assert!(single.middle.is_empty());

        let two = decompose_name("John Smith");
        assert_eq!((two.first.as_str(), two.last.as_str()), ("JOHN", "SMITH"));
        assert!(two.middle.is_empty());

        let many = decompose_name("John Paul George Smith");
        assert_eq!(many.first, "JOHN");
        assert_eq!(many.middle, vec!["PAUL", "GEORGE"]);
        assert_eq!(many.last, "SMITH");
        assert_eq!(many.all_parts.len(), 4);
    }

    #[test]
    fn test_sequence_ratio() {
        assert_eq!(sequence_ratio("", ""), 1.0);
        assert_eq!(sequence_ratio("SMITH", "SMITH"), 1.0);
        assert!((sequence_ratio("JOHN", "JON") - 6.0 / 7.0).abs() < 1e-9);
        assert!((sequence_ratio("JANE", "JOHN") - 0.5).abs() < 1e-9);
        assert_eq!(sequence_ratio("ABC", "XYZ"), 0.0);
    }

    #[test]
    fn test_initial_and_exact_matches() {
        assert!(names_match("J Smith", "John Smith"));
        assert!(names_match("John Smith", "J. Smith"));
        assert!(names_match("JOHN SMITH JR", "john smith"));
        assert!(!names_match("John Smith", "John Jones"));
    }

    #[test]
    fn test_empty_and_single_token_names() {
        assert!(!names_match("", "John Smith"));
        assert!(!names_match("John Smith", ""));
        assert!(!names_match("Smith", "John Smith"));
        assert!(names_match("Smith", "smith"));

        let relaxed = NameMatcher::new(MatchThresholds {
            allow_single_token: true,
            ..MatchThresholds::default()
        });
        assert!(!names_match("Jonathan", "Jonathon"));
        assert!(relaxed.matches("Jonathan", "Jonathon"));
        assert!(!relaxed.matches("Smith", "Jones"));
    }

    #[test]
    fn test_last_name_edit_distance() {
        assert!(names_match("Maria Gonzales", "Maria Gonzalez"));
        assert!(names_match("Jon Smith", "John Smith"));
        assert!(!names_match("Maria Gonzalez", "Maria Fernandez"));
    }

    #[test]
    fn test_middle_name_compatibility() {
        assert!(names_match("John A Smith", "John Smith"));
        assert!(names_match("John A Smith", "John Allen Smith"));
        assert!(!names_match("John Allen Smith", "John Bert Smith"));
    }

    #[test]
    fn test_matches_is_symmetric() {
        let names = [
            "John A Smith",
            "John Allen B Smith",
            "J Smith",
            "Jon Smith",
            "Jane Doe",
            "Maria Gonzalez",
            "Maria L Gonzales",
            "Smith",
        ];
        for a in names {
            for b in names {
                assert_eq!(names_match(a, b), names_match(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_threshold_argument_does_not_move_cutoffs() {
        let matcher = NameMatcher::default();
        assert_eq!(
            matcher.matches_with_threshold("Jon Smith", "John Smith", 0.99),
            matcher.matches_with_threshold("Jon Smith", "John Smith", DEFAULT_MATCH_THRESHOLD)
        );
    }

    #[test]
    fn test_similarity() {
        assert_eq!(name_similarity("J Smith", "John Smith"), 1.0);

        let score = name_similarity("John Smith", "Jane Doe");
        assert!(score < 1.0 && score >= 0.0);

        // token overlap beats the character ratio here
        let overlap = name_similarity("Mary Ann Lee", "Lee Mary");
        assert!(overlap >= 2.0 / 3.0 - 1e-9);

        assert_eq!(name_similarity("", ""), 1.0);
        assert_eq!(name_similarity("", "Bob Ray"), 0.0);
    }
}
