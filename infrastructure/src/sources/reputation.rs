//! Static domain reputation table

use std::collections::{BTreeMap, HashMap};
use verity_application::ports::reputation::ReputationTable;
use verity_domain::UNKNOWN_DOMAIN_REPUTATION;

/// Built-in reputation scores for well-known reference domains
const BUILTIN: &[(&str, f64)] = &[
    ("nature.com", 0.95),
    ("science.org", 0.95),
    ("nih.gov", 0.95),
    ("who.int", 0.95),
    ("arxiv.org", 0.85),
    ("britannica.com", 0.9),
    ("wikipedia.org", 0.85),
    ("reuters.com", 0.9),
    ("apnews.com", 0.9),
    ("bbc.co.uk", 0.85),
    ("nytimes.com", 0.8),
    ("theguardian.com", 0.8),
    ("stackoverflow.com", 0.7),
    ("github.com", 0.7),
    ("medium.com", 0.5),
    ("reddit.com", 0.4),
    ("quora.com", 0.35),
];

/// Scores applied by top-level suffix when no domain entry matches
const SUFFIX_RULES: &[(&str, f64)] = &[(".gov", 0.9), (".edu", 0.85), (".int", 0.85), (".mil", 0.85)];

/// In-memory reputation table
///
/// Lookup order: exact domain (without `www.`), then each parent domain, then
/// suffix rules, then the unknown-domain default.
#[derive(Debug, Clone)]
pub struct StaticReputationTable {
    scores: HashMap<String, f64>,
    default: f64,
}

impl StaticReputationTable {
    /// Empty table; every domain gets the unknown-domain default
    pub fn empty() -> Self {
        Self {
            scores: HashMap::new(),
            default: UNKNOWN_DOMAIN_REPUTATION,
        }
    }

    /// Table seeded with the built-in reference domains
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (domain, score) in BUILTIN {
            table.scores.insert((*domain).to_string(), *score);
        }
        table
    }

    /// Add or replace scores; out-of-range values are clamped into [0, 1]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, f64>) -> Self {
        for (domain, score) in overrides {
            self.scores
                .insert(normalize(domain).to_string(), score.clamp(0.0, 1.0));
        }
        self
    }

    pub fn with_default(mut self, default: f64) -> Self {
        self.default = default.clamp(0.0, 1.0);
        self
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    fn lookup(&self, domain: &str) -> Option<f64> {
        let mut candidate = normalize(domain);
        loop {
            if let Some(score) = self.scores.get(candidate) {
                return Some(*score);
            }
            match candidate.split_once('.') {
                Some((_, parent)) if parent.contains('.') => candidate = parent,
                _ => break,
            }
        }

        SUFFIX_RULES
            .iter()
            .find(|(suffix, _)| domain.ends_with(suffix))
            .map(|(_, score)| *score)
    }
}

impl Default for StaticReputationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReputationTable for StaticReputationTable {
    fn reputation(&self, domain: &str) -> f64 {
        self.lookup(&domain.to_ascii_lowercase())
            .unwrap_or(self.default)
    }
}

fn normalize(domain: &str) -> &str {
    let domain = domain.trim().trim_end_matches('.');
    domain.strip_prefix("www.").unwrap_or(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_domain() {
        let table = StaticReputationTable::builtin();
        assert_eq!(table.reputation("nature.com"), 0.95);
        assert_eq!(table.reputation("www.nature.com"), 0.95);
        assert_eq!(table.reputation("WWW.Reuters.com"), 0.9);
    }

    #[test]
    fn test_subdomain_inherits_parent() {
        let table = StaticReputationTable::builtin();
        assert_eq!(table.reputation("en.wikipedia.org"), 0.85);
        assert_eq!(table.reputation("a.b.arxiv.org"), 0.85);
    }

    #[test]
    fn test_suffix_rules() {
        let table = StaticReputationTable::builtin();
        assert_eq!(table.reputation("cdc.gov"), 0.9);
        assert_eq!(table.reputation("cs.stanford.edu"), 0.85);
    }

    #[test]
    fn test_unknown_domain_gets_default() {
        let table = StaticReputationTable::builtin();
        assert_eq!(table.reputation("some-blog.example"), UNKNOWN_DOMAIN_REPUTATION);
        assert_eq!(StaticReputationTable::empty().reputation("nature.com"), 0.6);
    }

    #[test]
    fn test_overrides() {
        let overrides = BTreeMap::from([
            ("www.reddit.com".to_string(), 0.1),
            ("internal.example".to_string(), 1.5),
        ]);
        let table = StaticReputationTable::builtin()
            .with_overrides(&overrides)
            .with_default(0.3);

        assert_eq!(table.reputation("reddit.com"), 0.1);
        assert_eq!(table.reputation("internal.example"), 1.0);
        assert_eq!(table.reputation("unknown.example"), 0.3);
    }
}
