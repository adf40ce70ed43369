use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Common English function words stripped before counting terms
    static ref STOP_WORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in",
            "is", "it", "its", "of", "on", "that", "the", "they", "this", "to", "was", "were",
            "with", "will", "his", "her", "have", "not", "or", "if", "into", "over", "after",
            "before", "also", "about", "them", "than", "then", "when", "while", "who", "whom",
            "which", "what", "why", "how", "their", "there", "been", "do", "does", "did",
            "doing", "up", "down", "out", "off", "again", "further", "more", "most", "other",
            "own", "same", "so", "too", "very", "can", "just", "should", "now", "we", "our",
            "ours", "you", "your", "yours", "she", "him", "himself", "herself", "itself",
            "themselves", "am", "being", "had", "having", "but", "because", "until", "below",
            "above", "between", "through", "during", "each", "few", "both", "any", "all",
            "some", "such", "only", "once", "here", "where", "these", "those", "against",
        ];
        words.iter().copied().collect()
    };
}

/// Splits free text into significant lowercase terms
///
/// Every character that is not a Unicode letter or whitespace becomes a
/// space, so punctuation never glues words together and accented or
/// non-Latin letters survive intact. Tokens of length <= 2 and stop words
/// are dropped. Empty input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphabetic() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() > 2 && !STOP_WORDS.contains(t))
        .map(str::to_owned)
        .collect()
}
