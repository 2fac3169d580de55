//! Hallucination detection reduction
//!
//! The decision itself comes from [`HallucinationRule`]; this module adds the
//! risk-factor breakdown, warnings and remediation suggestions.
//!
//! Substituted votes never change the decision, but the rule's confidence and
//! reliability are scaled by the share of the panel that actually voted. A
//! panel where every provider failed reports zero confidence.

use super::entities::{DomainVerdict, VerdictDomain, degraded_warnings, factor};
use crate::quorum::{HallucinationRule, ProviderVote, VoteTally};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scores computed by the dedicated risk sub-checks, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSignals {
    pub logical_consistency: f64,
    pub source_attribution: f64,
    pub temporal_accuracy: f64,
}

impl RiskSignals {
    pub fn new(logical_consistency: f64, source_attribution: f64, temporal_accuracy: f64) -> Self {
        Self {
            logical_consistency: logical_consistency.clamp(0.0, 1.0),
            source_attribution: source_attribution.clamp(0.0, 1.0),
            temporal_accuracy: temporal_accuracy.clamp(0.0, 1.0),
        }
    }
}

impl Default for RiskSignals {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Thresholds for warnings and suggestions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorThresholds {
    /// Flag count at which a warning is raised
    pub warn_flag_count: usize,
    pub warn_factual: f64,
    pub warn_logical: f64,
    pub warn_attribution: f64,
    pub suggest_factual: f64,
    pub suggest_temporal: f64,
    pub suggest_logical: f64,
    pub suggest_attribution: f64,
}

impl Default for FactorThresholds {
    fn default() -> Self {
        Self {
            warn_flag_count: 3,
            warn_factual: 0.7,
            warn_logical: 0.6,
            warn_attribution: 0.5,
            suggest_factual: 0.8,
            suggest_temporal: 0.8,
            suggest_logical: 0.7,
            suggest_attribution: 0.6,
        }
    }
}

/// Suggestion emitted when no factor breaches its threshold.
pub const RELIABLE_CONTENT_SUGGESTION: &str = "Content appears reliable; no remediation needed";

impl DomainVerdict {
    /// Reduce the hallucination panel's votes to a verdict
    pub fn hallucination(
        votes: Vec<ProviderVote>,
        rule: &HallucinationRule,
        signals: RiskSignals,
        thresholds: &FactorThresholds,
    ) -> Self {
        let outcome = rule.decide(&votes);
        let coverage = VoteTally::from_votes(&votes).coverage(rule.panel_size);
        let factual_accuracy = rule.factual_accuracy(outcome.flag_count);

        let mut factors = BTreeMap::new();
        factors.insert(factor::FACTUAL_ACCURACY.to_string(), factual_accuracy);
        factors.insert(
            factor::LOGICAL_CONSISTENCY.to_string(),
            signals.logical_consistency,
        );
        factors.insert(
            factor::SOURCE_ATTRIBUTION.to_string(),
            signals.source_attribution,
        );
        factors.insert(
            factor::TEMPORAL_ACCURACY.to_string(),
            signals.temporal_accuracy,
        );

        let mut warnings = Vec::new();
        if outcome.flag_count >= thresholds.warn_flag_count {
            warnings.push(format!(
                "{} of {} detectors flagged potential hallucination",
                outcome.flag_count, rule.panel_size
            ));
        }
        if factual_accuracy < thresholds.warn_factual {
            warnings.push(format!("Low factual accuracy ({:.2})", factual_accuracy));
        }
        if signals.logical_consistency < thresholds.warn_logical {
            warnings.push(format!(
                "Logical inconsistencies detected ({:.2})",
                signals.logical_consistency
            ));
        }
        if signals.source_attribution < thresholds.warn_attribution {
            warnings.push(format!(
                "Claims lack source attribution ({:.2})",
                signals.source_attribution
            ));
        }
        warnings.extend(degraded_warnings(&votes));

        let mut suggestions = Vec::new();
        if factual_accuracy < thresholds.suggest_factual {
            suggestions.push("Verify factual claims against authoritative sources".to_string());
        }
        if signals.temporal_accuracy < thresholds.suggest_temporal {
            suggestions.push("Check dates and time-sensitive statements".to_string());
        }
        if signals.logical_consistency < thresholds.suggest_logical {
            suggestions.push("Resolve contradictory statements within the content".to_string());
        }
        if signals.source_attribution < thresholds.suggest_attribution {
            suggestions.push("Attribute claims to specific, verifiable sources".to_string());
        }
        if suggestions.is_empty() {
            suggestions.push(RELIABLE_CONTENT_SUGGESTION.to_string());
        }

        Self {
            domain: VerdictDomain::HallucinationDetection,
            decision: outcome.is_hallucination,
            confidence: outcome.confidence * coverage,
            reliability: Some(outcome.reliability * coverage),
            votes,
            factors,
            warnings,
            suggestions,
            consensus: None,
            rule: Some(outcome),
            sources: None,
        }
    }
}
