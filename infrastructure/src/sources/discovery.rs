//! Candidate source discovery
//!
//! URLs quoted in the content are proposed first. When the content cites
//! nothing, the configured reference search templates are filled with the
//! content's key terms.

use crate::text::significant_words;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use verity_application::ports::source_discovery::{DiscoveryError, SourceDiscovery};

/// Placeholder replaced by the URL-encoded query in search templates
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Default reference search templates
pub const DEFAULT_SEARCH_TEMPLATES: &[&str] = &[
    "https://en.wikipedia.org/w/index.php?search={query}",
    "https://api.duckduckgo.com/?q={query}&format=json&no_html=1",
];

static URL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'`)\]}]+"#).ok());

/// Discovery from quoted URLs and search templates
#[derive(Debug, Clone)]
pub struct ContentSourceDiscovery {
    templates: Vec<String>,
    max_terms: usize,
}

impl ContentSourceDiscovery {
    pub fn new(templates: Vec<String>) -> Self {
        Self {
            templates,
            max_terms: 5,
        }
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms.max(1);
        self
    }

    /// Build search URIs for the content's key terms
    fn search_uris(&self, content: &str) -> Vec<String> {
        let terms = key_terms(content, self.max_terms);
        if terms.is_empty() {
            return Vec::new();
        }
        let query: String = url::form_urlencoded::byte_serialize(terms.join(" ").as_bytes()).collect();

        self.templates
            .iter()
            .filter(|t| t.contains(QUERY_PLACEHOLDER))
            .map(|t| t.replace(QUERY_PLACEHOLDER, &query))
            .collect()
    }
}

impl Default for ContentSourceDiscovery {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_TEMPLATES.iter().map(|t| t.to_string()).collect())
    }
}

#[async_trait]
impl SourceDiscovery for ContentSourceDiscovery {
    async fn discover(&self, content: &str, limit: usize) -> Result<Vec<String>, DiscoveryError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut found = quoted_urls(content)?;
        if found.is_empty() {
            found = self.search_uris(content);
        }
        found.truncate(limit);
        Ok(found)
    }
}

/// Absolute http(s) URLs appearing in the text, deduplicated in order
pub fn quoted_urls(content: &str) -> Result<Vec<String>, DiscoveryError> {
    let pattern = URL_PATTERN
        .as_ref()
        .ok_or_else(|| DiscoveryError::Failed("URL pattern failed to compile".to_string()))?;

    let mut urls: Vec<String> = Vec::new();
    for m in pattern.find_iter(content) {
        let candidate = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        if url::Url::parse(candidate).is_ok() && !urls.iter().any(|u| u == candidate) {
            urls.push(candidate.to_string());
        }
    }
    Ok(urls)
}

/// Distinct significant words, in order of first appearance
pub fn key_terms(content: &str, max_terms: usize) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for word in significant_words(content) {
        if terms.len() >= max_terms {
            break;
        }
        if !terms.contains(&word) {
            terms.push(word);
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_urls_trim_punctuation_and_dedup() {
        let urls = quoted_urls(
            "See https://nature.com/articles/x1. Also (https://nih.gov/report) and https://nature.com/articles/x1!",
        )
        .unwrap();
        assert_eq!(urls, vec!["https://nature.com/articles/x1", "https://nih.gov/report"]);
    }

    #[test]
    fn test_key_terms() {
        let terms = key_terms("The Eiffel Tower was completed in 1889 and the tower is in Paris", 4);
        assert_eq!(terms, vec!["eiffel", "tower", "completed", "1889"]);
    }

    #[tokio::test]
    async fn test_quoted_urls_take_precedence() {
        let discovery = ContentSourceDiscovery::default();
        let found = discovery
            .discover("According to https://who.int/facts the rate fell", 3)
            .await
            .unwrap();
        assert_eq!(found, vec!["https://who.int/facts"]);
    }

    #[tokio::test]
    async fn test_templates_filled_with_key_terms() {
        let discovery = ContentSourceDiscovery::new(vec![
            "https://search.example/?q={query}".to_string(),
            "https://no-placeholder.example/".to_string(),
        ])
        .with_max_terms(2);

        let found = discovery
            .discover("Photosynthesis converts sunlight into chemical energy", 3)
            .await
            .unwrap();
        assert_eq!(found, vec!["https://search.example/?q=photosynthesis+converts"]);
    }

    #[tokio::test]
    async fn test_limit_is_respected() {
        let discovery = ContentSourceDiscovery::default();
        let content = "https://a.example/1 https://b.example/2 https://c.example/3 https://d.example/4";
        assert_eq!(discovery.discover(content, 3).await.unwrap().len(), 3);
        assert!(discovery.discover(content, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nothing_to_search_for() {
        let discovery = ContentSourceDiscovery::default();
        assert!(discovery.discover("it is so", 3).await.unwrap().is_empty());
    }
}
