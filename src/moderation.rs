//! Banned-word filter for review comments.
//!
//! Matching is plain case-insensitive substring containment: no tokenizing,
//! no word boundaries, no stemming. "cu" therefore also matches "escuro".

use std::sync::LazyLock;

use regex::{Captures, Regex, RegexBuilder};

pub const BANNED_WORDS: &[&str] = &[
    "pinto", "coco", "penis", "puta", "caralho", "merda", "buceta", "cu", "foda", "porra",
    "viado", "bicha", "traveco", "arrombado", "fdp", "filho da puta", "bosta", "cacete", "piru",
    "xota", "vadia", "safada", "tesao", "tesão",
];

// One case-insensitive alternation over the escaped block-list
static BANNED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = BANNED_WORDS
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
        .expect("escaped literals always compile")
});

pub fn contains_banned_word(text: &str) -> bool {
    !text.is_empty() && BANNED_PATTERN.is_match(text)
}

/// Replaces every banned word with one `*` per character, ignoring case.
pub fn censor_text(text: &str) -> String {
    BANNED_PATTERN
        .replace_all(text, |caps: &Captures| "*".repeat(caps[0].chars().count()))
        .into_owned()
}
