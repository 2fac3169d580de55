//! Shared word-level text helpers

/// Words too common to carry topical meaning
pub const STOPWORDS: &[&str] = &[
    "about", "after", "also", "because", "been", "before", "being", "could", "does", "from",
    "have", "into", "more", "most", "only", "other", "over", "said", "some", "such", "than",
    "that", "their", "them", "then", "there", "these", "they", "this", "those", "very", "were",
    "what", "when", "where", "which", "while", "with", "would", "your",
];

/// Lowercased words of at least four characters that are not stopwords, in order
pub fn significant_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() >= 4 && !STOPWORDS.contains(&w.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_words() {
        let words: Vec<String> = significant_words("The Rhine, which flows from the Alps, is long").collect();
        assert_eq!(words, vec!["rhine", "flows", "alps", "long"]);
    }
}
