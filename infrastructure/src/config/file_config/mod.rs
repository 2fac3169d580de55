//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section converts itself into application parameters, replacing
//! invalid values with defaults and reporting what it replaced.

mod detection;
mod information;
mod orchestration;
mod output;
mod providers;
mod sources;

pub use detection::FileDetectionConfig;
pub use information::FileInformationConfig;
pub use orchestration::{FileBatchConfig, FileCacheConfig, FileMetricsConfig};
pub use output::{FileOutputConfig, FileTelemetryConfig};
pub use providers::FileProvidersConfig;
pub use sources::{FileDiscoveryConfig, FileSourcesConfig};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use verity_application::EngineConfig;
use verity_domain::{ConfigIssue, ConfigIssueCode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub information: FileInformationConfig,
    pub detection: FileDetectionConfig,
    pub sources: FileSourcesConfig,
    pub discovery: FileDiscoveryConfig,
    pub batch: FileBatchConfig,
    pub cache: FileCacheConfig,
    pub metrics: FileMetricsConfig,
    pub output: FileOutputConfig,
    pub telemetry: FileTelemetryConfig,
    pub providers: FileProvidersConfig,
    /// Domain reputation overrides, e.g. `"example.org" = 0.8`
    pub reputation: BTreeMap<String, f64>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Every issue is recoverable: the offending value is replaced by its
    /// default when the configuration is converted.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.to_engine_config().1;
        issues.extend(self.sources.unknown_reputation().1);
        issues.extend(self.discovery.templates().1);
        issues.extend(self.cache.max_entries().1);
        issues.extend(self.providers.disabled().1);
        issues.extend(self.providers.external_endpoint().1);
        issues.extend(self.reputation_overrides().1);
        issues
    }

    /// Build the engine parameters
    pub fn to_engine_config(&self) -> (EngineConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (mut information, found) = self.information.to_params();
        issues.extend(found);
        information.discovery_limit = self.discovery.limit;

        let (detection, found) = self.detection.to_params();
        issues.extend(found);
        let (sources, found) = self.sources.to_params();
        issues.extend(found);
        let (batch, found) = self.batch.to_params();
        issues.extend(found);
        let (cache, found) = self.cache.to_params();
        issues.extend(found);
        let (metrics, found) = self.metrics.to_params();
        issues.extend(found);

        let config = EngineConfig {
            information,
            detection,
            sources,
            batch,
            cache,
            metrics,
        };
        (config, issues)
    }

    /// `[reputation]` entries with scores in [0, 1]
    pub fn reputation_overrides(&self) -> (BTreeMap<String, f64>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let overrides = self
            .reputation
            .iter()
            .filter_map(|(domain, score)| {
                let field = format!("reputation.\"{}\"", domain);
                match ConfigIssue::check_unit(&field, *score) {
                    None => Some((domain.clone(), *score)),
                    Some(issue) => {
                        issues.push(as_fallback(issue, "ignoring the entry"));
                        None
                    }
                }
            })
            .collect();
        (overrides, issues)
    }
}

fn as_fallback(issue: ConfigIssue, action: &str) -> ConfigIssue {
    ConfigIssue::warning(issue.code, format!("{}, {}", issue.message, action))
}

/// Keep `value` when it lies in [0, 1]; otherwise report it and use `default`
pub(crate) fn unit_or_default(
    field: &str,
    value: f64,
    default: f64,
    issues: &mut Vec<ConfigIssue>,
) -> f64 {
    match ConfigIssue::check_unit(field, value) {
        None => value,
        Some(issue) => {
            issues.push(as_fallback(issue, &format!("using {}", default)));
            default
        }
    }
}

/// Milliseconds as a duration; zero is reported and replaced by `default`
pub(crate) fn positive_ms(
    field: &str,
    ms: u64,
    default: Duration,
    issues: &mut Vec<ConfigIssue>,
) -> Duration {
    if ms > 0 {
        return Duration::from_millis(ms);
    }
    issues.push(zero_value(field, &format!("{}ms", default.as_millis())));
    default
}

pub(crate) fn nonzero_count(
    field: &str,
    value: usize,
    default: usize,
    issues: &mut Vec<ConfigIssue>,
) -> usize {
    if value > 0 {
        return value;
    }
    issues.push(zero_value(field, &default.to_string()));
    default
}

fn zero_value(field: &str, default: &str) -> ConfigIssue {
    ConfigIssue::warning(
        ConfigIssueCode::ZeroValue {
            field: field.to_string(),
        },
        format!("{} cannot be 0, using {}", field, default),
    )
}
