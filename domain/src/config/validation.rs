//! Configuration validation issues
//!
//! Loaded configuration is checked before the engine starts. Problems are
//! reported as structured issues with severity levels so callers can decide
//! whether to abort or only warn.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssueCode {
    /// A probability-like value lies outside [0, 1].
    OutOfRange { field: String, value: f64 },
    /// Weights of a weighted sum do not add up to 1.
    WeightsNotNormalized { section: String, sum: f64 },
    /// A lower threshold is not below its upper counterpart.
    ThresholdOrder { lower: String, upper: String },
    /// A duration or capacity is zero.
    ZeroValue { field: String },
    /// The hallucination rule's counts are inconsistent with the panel size.
    InconsistentRule,
    /// A provider name is not part of any panel.
    UnknownProvider { name: String },
    /// A discovery search template lacks the query placeholder.
    InvalidTemplate { template: String },
    /// An endpoint is not an http(s) URL.
    InvalidEndpoint { endpoint: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Error issue when `value` is outside [0, 1]
    pub fn check_unit(field: &str, value: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&value) {
            None
        } else {
            Some(Self::error(
                ConfigIssueCode::OutOfRange {
                    field: field.to_string(),
                    value,
                },
                format!("{} must be within [0, 1], got {}", field, value),
            ))
        }
    }

    /// Warning issue when `weights` do not sum to 1
    pub fn check_weights(section: &str, weights: &[f64]) -> Option<Self> {
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() <= 1e-6 {
            None
        } else {
            Some(Self::warning(
                ConfigIssueCode::WeightsNotNormalized {
                    section: section.to_string(),
                    sum,
                },
                format!("{} weights sum to {:.3}, expected 1.0", section, sum),
            ))
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_values_in_range_pass() {
        assert!(ConfigIssue::check_unit("x", 0.0).is_none());
        assert!(ConfigIssue::check_unit("x", 1.0).is_none());
    }

    #[test]
    fn unit_value_out_of_range_is_error() {
        let issue = ConfigIssue::check_unit("source.verified_threshold", 1.2).unwrap();
        assert!(issue.is_error());
        assert!(matches!(
            issue.code,
            ConfigIssueCode::OutOfRange { ref field, .. } if field == "source.verified_threshold"
        ));
    }

    #[test]
    fn unnormalized_weights_warn() {
        assert!(ConfigIssue::check_weights("information", &[0.3, 0.4, 0.3]).is_none());
        let issue = ConfigIssue::check_weights("information", &[0.5, 0.4, 0.3]).unwrap();
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.to_string(), "[warning] information weights sum to 1.200, expected 1.0");
    }
}
