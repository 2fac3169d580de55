//! Source verification configuration from TOML (`[sources]` and `[discovery]`)

use super::{positive_ms, unit_or_default};
use crate::sources::{DEFAULT_SEARCH_TEMPLATES, QUERY_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use verity_application::SourceParams;
use verity_domain::{ConfigIssue, ConfigIssueCode, SourceScoring, UNKNOWN_DOMAIN_REPUTATION};

/// Raw `[sources]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourcesConfig {
    pub accessibility_weight: f64,
    pub reputation_weight: f64,
    pub quality_weight: f64,
    pub verified_threshold: f64,
    pub disputed_threshold: f64,
    pub fetch_timeout_ms: u64,
    /// Reputation of domains missing from the table
    pub unknown_reputation: f64,
    /// User-Agent header sent when fetching sources
    pub user_agent: Option<String>,
}

impl Default for FileSourcesConfig {
    fn default() -> Self {
        let params = SourceParams::default();
        Self {
            accessibility_weight: params.scoring.accessibility_weight,
            reputation_weight: params.scoring.reputation_weight,
            quality_weight: params.scoring.quality_weight,
            verified_threshold: params.scoring.verified_threshold,
            disputed_threshold: params.scoring.disputed_threshold,
            fetch_timeout_ms: params.fetch_timeout.as_millis() as u64,
            unknown_reputation: UNKNOWN_DOMAIN_REPUTATION,
            user_agent: None,
        }
    }
}

impl FileSourcesConfig {
    pub fn to_params(&self) -> (SourceParams, Vec<ConfigIssue>) {
        let defaults = SourceParams::default();
        let fallback = defaults.scoring;
        let mut issues = Vec::new();

        let mut scoring = SourceScoring {
            accessibility_weight: unit_or_default(
                "sources.accessibility_weight",
                self.accessibility_weight,
                fallback.accessibility_weight,
                &mut issues,
            ),
            reputation_weight: unit_or_default(
                "sources.reputation_weight",
                self.reputation_weight,
                fallback.reputation_weight,
                &mut issues,
            ),
            quality_weight: unit_or_default(
                "sources.quality_weight",
                self.quality_weight,
                fallback.quality_weight,
                &mut issues,
            ),
            verified_threshold: unit_or_default(
                "sources.verified_threshold",
                self.verified_threshold,
                fallback.verified_threshold,
                &mut issues,
            ),
            disputed_threshold: unit_or_default(
                "sources.disputed_threshold",
                self.disputed_threshold,
                fallback.disputed_threshold,
                &mut issues,
            ),
        };

        issues.extend(ConfigIssue::check_weights(
            "sources",
            &[
                scoring.accessibility_weight,
                scoring.reputation_weight,
                scoring.quality_weight,
            ],
        ));

        if scoring.disputed_threshold >= scoring.verified_threshold {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ThresholdOrder {
                    lower: "sources.disputed_threshold".to_string(),
                    upper: "sources.verified_threshold".to_string(),
                },
                format!(
                    "sources.disputed_threshold ({}) must be below verified_threshold ({}), using defaults",
                    scoring.disputed_threshold, scoring.verified_threshold
                ),
            ));
            scoring.verified_threshold = fallback.verified_threshold;
            scoring.disputed_threshold = fallback.disputed_threshold;
        }

        let params = SourceParams {
            scoring,
            fetch_timeout: positive_ms(
                "sources.fetch_timeout_ms",
                self.fetch_timeout_ms,
                defaults.fetch_timeout,
                &mut issues,
            ),
        };
        (params, issues)
    }

    /// Reputation for unlisted domains, with any range issue
    pub fn unknown_reputation(&self) -> (f64, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let value = unit_or_default(
            "sources.unknown_reputation",
            self.unknown_reputation,
            UNKNOWN_DOMAIN_REPUTATION,
            &mut issues,
        );
        (value, issues)
    }
}

/// Raw `[discovery]` table
///
/// ```toml
/// [discovery]
/// limit = 3
/// templates = ["https://en.wikipedia.org/w/index.php?search={query}"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscoveryConfig {
    /// Search URI templates; `{query}` is replaced by the key terms
    pub templates: Vec<String>,
    /// Maximum candidate sources per request
    pub limit: usize,
    /// Key terms used to build a query
    pub max_terms: usize,
}

impl Default for FileDiscoveryConfig {
    fn default() -> Self {
        Self {
            templates: DEFAULT_SEARCH_TEMPLATES.iter().map(|t| t.to_string()).collect(),
            limit: 3,
            max_terms: 5,
        }
    }
}

impl FileDiscoveryConfig {
    /// Templates without a `{query}` placeholder are dropped with a warning
    pub fn templates(&self) -> (Vec<String>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let templates = self
            .templates
            .iter()
            .filter(|t| {
                let usable = t.contains(QUERY_PLACEHOLDER);
                if !usable {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::InvalidTemplate {
                            template: t.to_string(),
                        },
                        format!(
                            "discovery template '{}' has no {} placeholder, ignoring it",
                            t, QUERY_PLACEHOLDER
                        ),
                    ));
                }
                usable
            })
            .cloned()
            .collect();
        (templates, issues)
    }
}
