use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+").expect("word pattern is valid"));

/// Splits a raw query into keywords, in the order they were typed.
///
/// Repeated terms are kept; resolving them again is a no-op.
pub fn split_keywords(query: &str) -> Vec<&str> {
    query.trim().split_whitespace().collect()
}

/// Extracts index keywords from free text (file names, sidecar text).
///
/// Runs of ASCII letters longer than two characters, lowercased, sorted and unique.
/// Digits, underscores and punctuation all separate words.
pub fn tokenize_text(text: &str) -> BTreeSet<String> {
    WORD.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|word| word.len() > 2)
        .collect()
}
