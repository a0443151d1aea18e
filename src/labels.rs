//! Label normalisation.
//!
//! Labels arrive as the user typed them, sometimes with the `@` sigil the filter
//! language uses and stray whitespace. Every label comparison goes through
//! `normalise_label` so that `@goal`, `goal` and ` @@goal ` are the same label.

use std::collections::HashSet;

/// Strip surrounding whitespace and any number of leading `@` characters.
pub fn normalise_label(s: &str) -> String {
    s.trim_start_matches(|c: char| c == '@' || c.is_whitespace())
        .trim_end()
        .to_string()
}

/// Two labels are equal when their normalised forms are.
pub fn labels_equal(a: &str, b: &str) -> bool {
    normalise_label(a) == normalise_label(b)
}

/// True when `labels` contains `label` after normalisation.
pub fn labels_contain(labels: &[String], label: &str) -> bool {
    labels.iter().any(|l| labels_equal(l, label))
}

/// Normalise a list of labels into a set, dropping entries that normalise to nothing.
pub fn normalised_label_set<S: AsRef<str>>(labels: &[S]) -> HashSet<String> {
    labels
        .iter()
        .map(|l| normalise_label(l.as_ref()))
        .filter(|l| !l.is_empty())
        .collect()
}
