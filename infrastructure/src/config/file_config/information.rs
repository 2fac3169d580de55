//! Information verification configuration from TOML (`[information]` section)

use super::{positive_ms, unit_or_default};
use serde::{Deserialize, Serialize};
use verity_application::InformationParams;
use verity_domain::{ConfigIssue, ConfigIssueCode, InformationPolicy};

/// Raw `[information]` table
///
/// # Example
///
/// ```toml
/// [information]
/// semantic_weight = 0.3
/// factual_weight = 0.4
/// source_weight = 0.3
/// verify_threshold = 0.8
/// provider_timeout_ms = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInformationConfig {
    pub semantic_weight: f64,
    pub factual_weight: f64,
    pub source_weight: f64,
    pub consensus_threshold: f64,
    pub consensus_bonus: f64,
    pub verify_threshold: f64,
    /// Threshold applied to requests with `strictMode`
    pub strict_verify_threshold: f64,
    pub provider_timeout_ms: u64,
}

impl Default for FileInformationConfig {
    fn default() -> Self {
        let params = InformationParams::default();
        Self {
            semantic_weight: params.policy.semantic_weight,
            factual_weight: params.policy.factual_weight,
            source_weight: params.policy.source_weight,
            consensus_threshold: params.policy.consensus_threshold,
            consensus_bonus: params.policy.consensus_bonus,
            verify_threshold: params.policy.verify_threshold,
            strict_verify_threshold: params.policy.strict_verify_threshold,
            provider_timeout_ms: params.provider_timeout.as_millis() as u64,
        }
    }
}

impl FileInformationConfig {
    /// Convert to [`InformationParams`], replacing invalid values with defaults.
    pub fn to_params(&self) -> (InformationParams, Vec<ConfigIssue>) {
        let defaults = InformationParams::default();
        let fallback = defaults.policy;
        let mut issues = Vec::new();

        let mut policy = InformationPolicy {
            semantic_weight: unit_or_default(
                "information.semantic_weight",
                self.semantic_weight,
                fallback.semantic_weight,
                &mut issues,
            ),
            factual_weight: unit_or_default(
                "information.factual_weight",
                self.factual_weight,
                fallback.factual_weight,
                &mut issues,
            ),
            source_weight: unit_or_default(
                "information.source_weight",
                self.source_weight,
                fallback.source_weight,
                &mut issues,
            ),
            consensus_threshold: unit_or_default(
                "information.consensus_threshold",
                self.consensus_threshold,
                fallback.consensus_threshold,
                &mut issues,
            ),
            consensus_bonus: unit_or_default(
                "information.consensus_bonus",
                self.consensus_bonus,
                fallback.consensus_bonus,
                &mut issues,
            ),
            verify_threshold: unit_or_default(
                "information.verify_threshold",
                self.verify_threshold,
                fallback.verify_threshold,
                &mut issues,
            ),
            strict_verify_threshold: unit_or_default(
                "information.strict_verify_threshold",
                self.strict_verify_threshold,
                fallback.strict_verify_threshold,
                &mut issues,
            ),
        };

        issues.extend(ConfigIssue::check_weights(
            "information",
            &[policy.semantic_weight, policy.factual_weight, policy.source_weight],
        ));

        if policy.strict_verify_threshold < policy.verify_threshold {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ThresholdOrder {
                    lower: "information.verify_threshold".to_string(),
                    upper: "information.strict_verify_threshold".to_string(),
                },
                format!(
                    "information.strict_verify_threshold ({}) is below verify_threshold ({}), using defaults",
                    policy.strict_verify_threshold, policy.verify_threshold
                ),
            ));
            policy.verify_threshold = fallback.verify_threshold;
            policy.strict_verify_threshold = fallback.strict_verify_threshold;
        }

        let params = InformationParams {
            policy,
            provider_timeout: positive_ms(
                "information.provider_timeout_ms",
                self.provider_timeout_ms,
                defaults.provider_timeout,
                &mut issues,
            ),
            discovery_limit: defaults.discovery_limit,
        };
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_round_trip() {
        let (params, issues) = FileInformationConfig::default().to_params();
        assert!(issues.is_empty());
        assert_eq!(params.policy, InformationPolicy::default());
        assert_eq!(params.provider_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_deserialize_partial_table() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[information]
verify_threshold = 0.85
provider_timeout_ms = 2500
"#,
        )
        .unwrap();
        let (params, issues) = config.information.to_params();
        assert!(issues.is_empty());
        assert_eq!(params.policy.verify_threshold, 0.85);
        assert_eq!(params.policy.semantic_weight, 0.3);
        assert_eq!(params.provider_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_out_of_range_falls_back() {
        let config = FileInformationConfig {
            factual_weight: 1.4,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.policy.factual_weight, 0.4);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert!(matches!(issues[0].code, ConfigIssueCode::OutOfRange { .. }));
    }

    #[test]
    fn test_unnormalized_weights_warn_but_apply() {
        let config = FileInformationConfig {
            semantic_weight: 0.5,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.policy.semantic_weight, 0.5);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::WeightsNotNormalized { .. }
        ));
    }

    #[test]
    fn test_strict_threshold_below_verify() {
        let config = FileInformationConfig {
            verify_threshold: 0.9,
            strict_verify_threshold: 0.7,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.policy.verify_threshold, 0.8);
        assert_eq!(params.policy.strict_verify_threshold, 0.9);
        assert!(matches!(issues[0].code, ConfigIssueCode::ThresholdOrder { .. }));
    }

    #[test]
    fn test_zero_timeout_falls_back() {
        let config = FileInformationConfig {
            provider_timeout_ms: 0,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(params.provider_timeout, Duration::from_secs(10));
        assert!(matches!(issues[0].code, ConfigIssueCode::ZeroValue { .. }));
    }
}
