//! Content quality heuristics for fetched sources

/// Characteristics of fetched source content
#[derive(Debug, Clone, Copy)]
pub struct ContentSample<'a> {
    /// Readable text extracted from the response body
    pub text: &'a str,
    /// Size of the raw body in bytes (markup included)
    pub raw_len: usize,
}

const CITATION_MARKERS: &[&str] = &[
    "doi.org",
    "doi:",
    "references",
    "bibliography",
    "et al",
    "cited",
    "[1]",
    "source:",
];

/// Score content quality in [0, 1]
///
/// | Component          | Weight |
/// |--------------------|--------|
/// | Length             | 0.35   |
/// | Sentence structure | 0.25   |
/// | Citations          | 0.20   |
/// | Dates              | 0.10   |
/// | Text-to-markup     | 0.10   |
pub fn assess_content_quality(sample: ContentSample<'_>) -> f64 {
    let text = sample.text.trim();
    if text.is_empty() {
        return 0.0;
    }

    let words = text.split_whitespace().count();
    let length_score = (words as f64 / 600.0).min(1.0);

    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1);
    let avg_sentence = words as f64 / sentences as f64;
    let structure_score = if (8.0..=30.0).contains(&avg_sentence) {
        1.0
    } else if (4.0..=45.0).contains(&avg_sentence) {
        0.5
    } else {
        0.1
    };

    let lower = text.to_lowercase();
    let citation_hits = CITATION_MARKERS
        .iter()
        .filter(|m| lower.contains(*m))
        .count();
    let citation_score = (citation_hits as f64 / 2.0).min(1.0);

    let date_score = if contains_year(text) { 1.0 } else { 0.0 };

    let markup_score = if sample.raw_len == 0 {
        1.0
    } else {
        let ratio = text.len() as f64 / sample.raw_len as f64;
        (ratio / 0.2).min(1.0)
    };

    (0.35 * length_score
        + 0.25 * structure_score
        + 0.20 * citation_score
        + 0.10 * date_score
        + 0.10 * markup_score)
        .clamp(0.0, 1.0)
}

/// True when the text contains a plausible year (1800..=2099)
pub fn contains_year(text: &str) -> bool {
    extract_years(text).next().is_some()
}

/// Iterate over plausible years (1800..=2099) appearing as standalone 4-digit tokens
pub fn extract_years(text: &str) -> impl Iterator<Item = u32> + '_ {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|token| token.len() == 4)
        .filter_map(|token| token.parse::<u32>().ok())
        .filter(|year| (1800..=2099).contains(year))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_scores_zero() {
        assert_eq!(
            assess_content_quality(ContentSample {
                text: "   ",
                raw_len: 100
            }),
            0.0
        );
    }

    #[test]
    fn test_rich_content_scores_higher_than_thin_content() {
        let sentence = "The survey of 2019 found that coastal erosion accelerated in the studied regions over a decade. ";
        let rich = format!("{} References: Smith et al, doi:10.1000/xyz", sentence.repeat(60));
        let thin = "Click here!!!";

        let rich_score = assess_content_quality(ContentSample {
            text: &rich,
            raw_len: rich.len() * 2,
        });
        let thin_score = assess_content_quality(ContentSample {
            text: thin,
            raw_len: 20_000,
        });

        assert!(rich_score > 0.9, "rich = {}", rich_score);
        assert!(thin_score < 0.3, "thin = {}", thin_score);
    }

    #[test]
    fn test_extract_years() {
        let years: Vec<u32> = extract_years("Founded in 1889, renovated 2024, code 12345 and 0042").collect();
        assert_eq!(years, vec![1889, 2024]);
        assert!(!contains_year("no dates here"));
    }
}
