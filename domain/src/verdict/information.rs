//! Information verification reduction
//!
//! Three signals feed the decision: semantic similarity, factual accuracy and
//! source reliability.
//!
//! ```text
//! confidence = 0.3·semantic + 0.4·factual + 0.3·source
//! consensus  = mean(semantic, factual, source)      (achieved at ≥ 0.75)
//! bonus      = +0.10 when consensus is strictly above the threshold
//! verified   = confidence ≥ 0.8  AND  consensus achieved
//! ```
//!
//! When no source could be evaluated the source signal is dropped: the
//! remaining weights are renormalized and consensus is taken over two signals.

use super::entities::{DomainVerdict, VerdictDomain, degraded_warnings, factor};
use crate::quorum::{ProviderVote, SignalConsensus};
use crate::quorum::consensus::DEFAULT_CONSENSUS_THRESHOLD;
use crate::source::SourceReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider name of the synthesized source-credibility vote.
pub const SOURCE_CREDIBILITY_PROVIDER: &str = "source_credibility";

/// Weights and thresholds for information verification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InformationPolicy {
    pub semantic_weight: f64,
    pub factual_weight: f64,
    pub source_weight: f64,
    pub consensus_threshold: f64,
    pub consensus_bonus: f64,
    pub verify_threshold: f64,
    /// Verify threshold applied when the request sets `strictMode`
    pub strict_verify_threshold: f64,
}

impl Default for InformationPolicy {
    fn default() -> Self {
        Self {
            semantic_weight: 0.3,
            factual_weight: 0.4,
            source_weight: 0.3,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
            consensus_bonus: 0.1,
            verify_threshold: 0.8,
            strict_verify_threshold: 0.9,
        }
    }
}

/// Signal values feeding the information decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InformationSignals {
    pub semantic: f64,
    pub factual: f64,
    /// `None` when no candidate source could be evaluated
    pub source: Option<f64>,
}

/// Numeric outcome of [`InformationPolicy::evaluate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InformationAssessment {
    /// Weighted combination before any bonus
    pub weighted: f64,
    /// Final confidence (bonus applied, capped at 1.0)
    pub confidence: f64,
    pub consensus: SignalConsensus,
    pub is_verified: bool,
}

impl InformationPolicy {
    /// Apply the weighting, consensus and verification rules
    pub fn evaluate(&self, signals: InformationSignals, strict: bool) -> InformationAssessment {
        let (weighted, consensus) = match signals.source {
            Some(source) => (
                self.semantic_weight * signals.semantic
                    + self.factual_weight * signals.factual
                    + self.source_weight * source,
                SignalConsensus::evaluate(
                    &[signals.semantic, signals.factual, source],
                    self.consensus_threshold,
                ),
            ),
            None => {
                let total = self.semantic_weight + self.factual_weight;
                let weighted = if total > 0.0 {
                    (self.semantic_weight * signals.semantic
                        + self.factual_weight * signals.factual)
                        / total
                } else {
                    0.0
                };
                (
                    weighted,
                    SignalConsensus::evaluate(
                        &[signals.semantic, signals.factual],
                        self.consensus_threshold,
                    ),
                )
            }
        };

        let weighted = weighted.clamp(0.0, 1.0);
        let confidence = if consensus.exceeds_threshold() {
            (weighted + self.consensus_bonus).min(1.0)
        } else {
            weighted
        };

        let threshold = if strict {
            self.strict_verify_threshold
        } else {
            self.verify_threshold
        };

        InformationAssessment {
            weighted,
            confidence,
            consensus,
            is_verified: confidence >= threshold && consensus.is_achieved(),
        }
    }

    /// Recover the signals from a verdict's vote set
    ///
    /// Expects the semantic vote first and the factual vote second; an
    /// optional `source_credibility` vote carries the source signal.
    pub fn signals_from_votes(votes: &[ProviderVote]) -> InformationSignals {
        let semantic = votes.first().map(|v| v.score()).unwrap_or(0.0);
        let factual = votes.get(1).map(|v| v.score()).unwrap_or(0.0);
        let source = votes
            .iter()
            .find(|v| v.provider == SOURCE_CREDIBILITY_PROVIDER)
            .map(|v| v.score());
        InformationSignals {
            semantic,
            factual,
            source,
        }
    }
}

impl DomainVerdict {
    /// Reduce semantic / factual votes and the source report to a verdict
    pub fn information(
        semantic: ProviderVote,
        factual: ProviderVote,
        sources: SourceReport,
        policy: &InformationPolicy,
        strict: bool,
    ) -> Self {
        let mut votes = vec![semantic, factual];
        if let Some(reliability) = sources.reliability {
            votes.push(ProviderVote::graded(
                SOURCE_CREDIBILITY_PROVIDER,
                reliability,
                sources.consensus_level,
                format!(
                    "{} source(s) checked, consensus level {:.2}",
                    sources.checks.len(),
                    sources.consensus_level
                ),
            ));
        }

        let signals = InformationPolicy::signals_from_votes(&votes);
        let assessment = policy.evaluate(signals, strict);

        let mut factors = BTreeMap::new();
        factors.insert(factor::SEMANTIC_SIMILARITY.to_string(), signals.semantic);
        factors.insert(factor::FACTUAL_ACCURACY.to_string(), signals.factual);
        factors.insert(
            factor::CONSENSUS_SCORE.to_string(),
            assessment.consensus.score,
        );
        if let Some(source) = signals.source {
            factors.insert(factor::SOURCE_RELIABILITY.to_string(), source);
            factors.insert(
                factor::SOURCE_CONSENSUS.to_string(),
                sources.consensus_level,
            );
        }

        let mut warnings = degraded_warnings(&votes);
        let mut suggestions = Vec::new();

        if signals.source.is_none() {
            warnings.push("No candidate source could be evaluated".to_string());
            suggestions.push("Supply authoritative sources that support the claim".to_string());
        } else if sources.consensus_level < 0.5 {
            warnings.push(format!(
                "Candidate sources disagree (consensus level {:.2})",
                sources.consensus_level
            ));
        }
        if !assessment.consensus.is_achieved() {
            warnings.push(format!(
                "Signal consensus not achieved ({:.2} < {:.2})",
                assessment.consensus.score, assessment.consensus.threshold
            ));
        }
        if signals.semantic < policy.consensus_threshold {
            suggestions.push("Add context that directly relates to the claim".to_string());
        }
        if signals.factual < policy.consensus_threshold {
            suggestions.push("Check the factual statements against reference material".to_string());
        }
        if let Some(source) = signals.source
            && source < policy.consensus_threshold
        {
            suggestions.push("Prefer sources with a stronger reputation".to_string());
        }

        Self {
            domain: VerdictDomain::InformationVerification,
            decision: assessment.is_verified,
            confidence: assessment.confidence,
            reliability: None,
            votes,
            factors,
            warnings,
            suggestions,
            consensus: Some(assessment.consensus),
            rule: None,
            sources: Some(sources),
        }
    }
}
