//! Query filtering strategies for locally supplied option lists.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use super::SuggestionItem;

/// How a query is matched against option labels in sync mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    /// Case-insensitive substring containment, original order preserved.
    #[default]
    Substring,
    /// Fuzzy matching, results ordered by score (best first).
    Fuzzy,
}

impl Filter {
    /// Apply this strategy to an option list.
    ///
    /// An empty query matches everything in its original order.
    pub fn apply(&self, query: &str, options: &[SuggestionItem]) -> Vec<SuggestionItem> {
        if query.is_empty() {
            return options.to_vec();
        }
        match self {
            Filter::Substring => substring_filter(query, options),
            Filter::Fuzzy => fuzzy_filter(query, options),
        }
    }
}

fn substring_filter(query: &str, options: &[SuggestionItem]) -> Vec<SuggestionItem> {
    let needle = query.to_lowercase();
    options
        .iter()
        .filter(|option| option.label.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

fn fuzzy_filter(query: &str, options: &[SuggestionItem]) -> Vec<SuggestionItem> {
    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );

    let mut matches: Vec<(u32, &SuggestionItem)> = options
        .iter()
        .filter_map(|option| {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(&option.label, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| (score, option))
        })
        .collect();

    // Higher score = better match
    matches.sort_by(|a, b| b.0.cmp(&a.0));

    matches
        .into_iter()
        .map(|(_, option)| option.clone())
        .collect()
}
