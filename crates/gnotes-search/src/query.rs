//! Search query normalization.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Common English function words dropped from search queries.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "an", "and", "are", "as", "at", "be", "but", "by", "can", "do", "does",
        "for", "from", "how", "i", "in", "is", "it", "its", "me", "my", "of", "on", "or", "our",
        "so", "that", "the", "their", "them", "there", "these", "this", "to", "was", "we",
        "were", "what", "when", "where", "which", "who", "why", "will", "with", "you", "your",
    ]
    .into_iter()
    .collect()
});

/// Word tokens: letters, digits, apostrophes, and inner hyphens.
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['\-][\p{L}\p{N}]+)*").expect("valid regex"));

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Case-fold `query` and drop stop words.
///
/// If nothing is left, the case-folded query with collapsed whitespace is
/// returned instead, so a query made only of stop words still searches.
pub fn normalize_query(query: &str) -> String {
    let folded = query.to_lowercase();
    let kept: Vec<&str> = TOKEN
        .find_iter(&folded)
        .map(|m| m.as_str())
        .filter(|w| !is_stop_word(w))
        .collect();

    if kept.is_empty() {
        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        kept.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_stop_words_and_case() {
        assert_eq!(
            normalize_query("What are the Notes about Rust?"),
            "notes rust"
        );
    }

    #[test]
    fn test_stop_word_only_query_falls_back() {
        assert_eq!(normalize_query("  What IS  the "), "what is the");
    }

    #[test]
    fn test_keeps_hyphenated_and_numbers() {
        assert_eq!(
            normalize_query("follow-up for Q3 planning"),
            "follow-up q3 planning"
        );
    }

    #[test]
    fn test_punctuation_only_query() {
        assert_eq!(normalize_query("?!"), "?!");
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(normalize_query("   "), "");
    }
}
