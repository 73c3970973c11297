//! Fuzzy filtering of field-picker entries using nucleo-matcher.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// A label that matched a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMatch {
    /// Index of the label in the searched list.
    pub index: usize,
    /// Match score, higher is better.
    pub score: u32,
}

/// Match labels against a fuzzy query, best first.
///
/// An empty query keeps every label in its original order with score 0.
/// Equal scores keep their original relative order.
pub fn fuzzy_filter<S: AsRef<str>>(query: &str, labels: &[S]) -> Vec<FieldMatch> {
    let query = query.trim();
    if query.is_empty() {
        return (0..labels.len())
            .map(|index| FieldMatch { index, score: 0 })
            .collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );

    let mut buf = Vec::new();
    let mut matches: Vec<FieldMatch> = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let haystack = Utf32Str::new(label.as_ref(), &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| FieldMatch { index, score })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}
