//! Hallucination detection configuration from TOML (`[detection]` section)

use super::{positive_ms, unit_or_default};
use serde::{Deserialize, Serialize};
use verity_application::DetectionParams;
use verity_domain::{ConfigIssue, ConfigIssueCode, HallucinationRule};

/// Raw `[detection]` table
///
/// The panel size is fixed at six providers; only the vote counts and the
/// strong-vote cutoff can be tuned.
///
/// ```toml
/// [detection]
/// flag_threshold = 4
/// contested_count = 3
/// strong_confidence = 0.8
/// strong_votes_required = 2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDetectionConfig {
    pub flag_threshold: usize,
    pub contested_count: usize,
    pub strong_confidence: f64,
    pub strong_votes_required: usize,
    pub provider_timeout_ms: u64,
}

impl Default for FileDetectionConfig {
    fn default() -> Self {
        let params = DetectionParams::default();
        Self {
            flag_threshold: params.rule.flag_threshold,
            contested_count: params.rule.contested_count,
            strong_confidence: params.rule.strong_confidence,
            strong_votes_required: params.rule.strong_votes_required,
            provider_timeout_ms: params.provider_timeout.as_millis() as u64,
        }
    }
}

impl FileDetectionConfig {
    pub fn to_params(&self) -> (DetectionParams, Vec<ConfigIssue>) {
        let defaults = DetectionParams::default();
        let mut issues = Vec::new();

        let candidate = HallucinationRule {
            flag_threshold: self.flag_threshold,
            contested_count: self.contested_count,
            strong_confidence: unit_or_default(
                "detection.strong_confidence",
                self.strong_confidence,
                defaults.rule.strong_confidence,
                &mut issues,
            ),
            strong_votes_required: self.strong_votes_required,
            ..defaults.rule
        };

        let rule = if candidate.is_consistent()
            && candidate.strong_votes_required > 0
            && candidate.strong_votes_required <= candidate.contested_count
        {
            candidate
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InconsistentRule,
                format!(
                    "detection: flag_threshold={}, contested_count={}, strong_votes_required={} \
                     do not fit a panel of {}, using the default 4/3/2 rule",
                    self.flag_threshold,
                    self.contested_count,
                    self.strong_votes_required,
                    defaults.rule.panel_size
                ),
            ));
            defaults.rule
        };

        let params = DetectionParams {
            rule,
            thresholds: defaults.thresholds,
            provider_timeout: positive_ms(
                "detection.provider_timeout_ms",
                self.provider_timeout_ms,
                defaults.provider_timeout,
                &mut issues,
            ),
        };
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let (params, issues) = FileDetectionConfig::default().to_params();
        assert!(issues.is_empty());
        assert_eq!(params.rule, HallucinationRule::default());
    }

    #[test]
    fn test_stricter_rule_is_accepted() {
        let config: super::super::FileConfig = toml::from_str(
            r#"
[detection]
flag_threshold = 5
contested_count = 4
strong_votes_required = 3
"#,
        )
        .unwrap();
        let (params, issues) = config.detection.to_params();
        assert!(issues.is_empty());
        assert_eq!(params.rule.flag_threshold, 5);
        assert_eq!(params.rule.contested_count, 4);
        assert_eq!(params.rule.panel_size, 6);
    }

    #[test]
    fn test_inconsistent_rule_falls_back() {
        for config in [
            FileDetectionConfig {
                flag_threshold: 7,
                ..Default::default()
            },
            FileDetectionConfig {
                contested_count: 4,
                ..Default::default()
            },
            FileDetectionConfig {
                strong_votes_required: 4,
                ..Default::default()
            },
        ] {
            let (params, issues) = config.to_params();
            assert_eq!(params.rule, HallucinationRule::default());
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].code, ConfigIssueCode::InconsistentRule);
        }
    }
}
