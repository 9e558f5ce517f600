//! Keyword extraction for search queries
//!
//! Drops Korean particles and interrogatives so the fuzzy match clause only
//! sees content words. No stemming and no case folding.

/// Particles and question forms that carry no search signal
pub const STOP_WORDS: &[&str] = &[
    "은", "는", "이", "가", "을", "를", "에", "에서", "로", "으로",
    "언제", "어디서", "어떻게", "무엇을", "누가", "왜",
    "있나요", "있어요", "인가요", "했나요", "됐나요", "열렸어", "있어",
];

/// Punctuation stripped before splitting
const STRIPPED_MARKS: &[char] = &['?', '.'];

/// Extract ordered keywords from a raw query
pub fn extract_keywords(query: &str) -> Vec<String> {
    let cleaned: String = query
        .chars()
        .filter(|c| !STRIPPED_MARKS.contains(c))
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Keywords joined by single spaces, as sent to the fuzzy match clause
pub fn keyword_string(query: &str) -> String {
    extract_keywords(query).join(" ")
}
