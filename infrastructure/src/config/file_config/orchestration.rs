//! Orchestrator configuration from TOML (`[batch]`, `[cache]`, `[metrics]`)

use super::{nonzero_count, unit_or_default};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use verity_application::{BatchParams, CacheParams, MetricsParams};
use verity_domain::{ConfigIssue, ConfigIssueCode, TargetAccuracy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    /// Concurrency cap for batches that do not set `maxConcurrency`
    pub max_concurrency: usize,
}

impl Default for FileBatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: BatchParams::default().max_concurrency,
        }
    }
}

impl FileBatchConfig {
    pub fn to_params(&self) -> (BatchParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let max_concurrency = nonzero_count(
            "batch.max_concurrency",
            self.max_concurrency,
            BatchParams::default().max_concurrency,
            &mut issues,
        );
        (BatchParams { max_concurrency }, issues)
    }
}

/// Raw `[cache]` table
///
/// ```toml
/// [cache]
/// ttl_secs = 3600
/// max_entries = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// Lifetime of cached results; unset keeps them for the process lifetime
    pub ttl_secs: Option<u64>,
    pub max_entries: usize,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: None,
            max_entries: 1024,
        }
    }
}

impl FileCacheConfig {
    pub fn to_params(&self) -> (CacheParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let ttl = match self.ttl_secs {
            Some(0) => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::ZeroValue {
                        field: "cache.ttl_secs".to_string(),
                    },
                    "cache.ttl_secs is 0, cached results never expire",
                ));
                None
            }
            other => other.map(Duration::from_secs),
        };
        (CacheParams { ttl }, issues)
    }

    pub fn max_entries(&self) -> (usize, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let value = nonzero_count(
            "cache.max_entries",
            self.max_entries,
            FileCacheConfig::default().max_entries,
            &mut issues,
        );
        (value, issues)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMetricsConfig {
    /// Publish a metrics snapshot after every request
    pub publish_after_request: bool,
    pub target_information: f64,
    pub target_hallucination: f64,
    pub target_sources: f64,
}

impl Default for FileMetricsConfig {
    fn default() -> Self {
        let target = TargetAccuracy::default();
        Self {
            publish_after_request: true,
            target_information: target.information_verification,
            target_hallucination: target.hallucination_detection,
            target_sources: target.source_verification,
        }
    }
}

impl FileMetricsConfig {
    pub fn to_params(&self) -> (MetricsParams, Vec<ConfigIssue>) {
        let defaults = TargetAccuracy::default();
        let mut issues = Vec::new();
        let target_accuracy = TargetAccuracy {
            information_verification: unit_or_default(
                "metrics.target_information",
                self.target_information,
                defaults.information_verification,
                &mut issues,
            ),
            hallucination_detection: unit_or_default(
                "metrics.target_hallucination",
                self.target_hallucination,
                defaults.hallucination_detection,
                &mut issues,
            ),
            source_verification: unit_or_default(
                "metrics.target_sources",
                self.target_sources,
                defaults.source_verification,
                &mut issues,
            ),
        };
        let params = MetricsParams {
            target_accuracy,
            publish_after_request: self.publish_after_request,
        };
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[batch]
max_concurrency = 2

[cache]
ttl_secs = 600

[metrics]
publish_after_request = false
"#,
        )
        .unwrap();
        assert_eq!(config.batch.to_params().0.max_concurrency, 2);
        assert_eq!(config.cache.to_params().0.ttl, Some(Duration::from_secs(600)));
        assert_eq!(config.cache.max_entries, 1024);
        let (metrics, issues) = config.metrics.to_params();
        assert!(issues.is_empty());
        assert!(!metrics.publish_after_request);
        assert_eq!(metrics.target_accuracy, TargetAccuracy::default());
    }

    #[test]
    fn test_zero_values_fall_back() {
        let (batch, issues) = FileBatchConfig { max_concurrency: 0 }.to_params();
        assert_eq!(batch.max_concurrency, 8);
        assert_eq!(issues.len(), 1);

        let cache = FileCacheConfig {
            ttl_secs: Some(0),
            max_entries: 0,
        };
        let (params, issues) = cache.to_params();
        assert!(params.ttl.is_none());
        assert_eq!(issues.len(), 1);
        assert_eq!(cache.max_entries().0, 1024);
    }

    #[test]
    fn test_target_out_of_range() {
        let config = FileMetricsConfig {
            target_sources: 90.0,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.target_accuracy.source_verification, 0.9);
        assert_eq!(issues.len(), 1);
    }
}
