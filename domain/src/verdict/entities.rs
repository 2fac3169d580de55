//! Domain verdict entity

use crate::quorum::{ProviderVote, RuleOutcome, SignalConsensus, vote_summary};
use crate::source::SourceReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Verification domain a verdict belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictDomain {
    InformationVerification,
    HallucinationDetection,
    SourceVerification,
}

impl VerdictDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictDomain::InformationVerification => "information_verification",
            VerdictDomain::HallucinationDetection => "hallucination_detection",
            VerdictDomain::SourceVerification => "source_verification",
        }
    }

    /// Label for the positive decision in this domain
    pub fn decision_label(&self, decision: bool) -> &'static str {
        match (self, decision) {
            (VerdictDomain::InformationVerification, true) => "verified",
            (VerdictDomain::InformationVerification, false) => "not verified",
            (VerdictDomain::HallucinationDetection, true) => "hallucination detected",
            (VerdictDomain::HallucinationDetection, false) => "no hallucination detected",
            (VerdictDomain::SourceVerification, true) => "sources credible",
            (VerdictDomain::SourceVerification, false) => "sources not credible",
        }
    }
}

impl std::fmt::Display for VerdictDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Factor keys used in [`DomainVerdict::factors`]
pub mod factor {
    pub const FACTUAL_ACCURACY: &str = "factual_accuracy";
    pub const LOGICAL_CONSISTENCY: &str = "logical_consistency";
    pub const SOURCE_ATTRIBUTION: &str = "source_attribution";
    pub const TEMPORAL_ACCURACY: &str = "temporal_accuracy";
    pub const SEMANTIC_SIMILARITY: &str = "semantic_similarity";
    pub const SOURCE_RELIABILITY: &str = "source_reliability";
    pub const CONSENSUS_SCORE: &str = "consensus_score";
    pub const SOURCE_CONSENSUS: &str = "source_consensus";
}

/// The reduced decision of one agent for one verification domain
///
/// Only the reducers in this module construct verdicts, so the aggregate
/// confidence always follows from the vote set it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainVerdict {
    pub(crate) domain: VerdictDomain,
    pub(crate) decision: bool,
    pub(crate) confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reliability: Option<f64>,
    pub(crate) votes: Vec<ProviderVote>,
    pub(crate) factors: BTreeMap<String, f64>,
    pub(crate) warnings: Vec<String>,
    pub(crate) suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) consensus: Option<SignalConsensus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rule: Option<RuleOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sources: Option<SourceReport>,
}

impl DomainVerdict {
    pub fn domain(&self) -> VerdictDomain {
        self.domain
    }

    /// Final boolean decision (verified / is hallucination / sources credible)
    pub fn decision(&self) -> bool {
        self.decision
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reliability(&self) -> Option<f64> {
        self.reliability
    }

    pub fn votes(&self) -> &[ProviderVote] {
        &self.votes
    }

    pub fn factors(&self) -> &BTreeMap<String, f64> {
        &self.factors
    }

    pub fn factor(&self, key: &str) -> Option<f64> {
        self.factors.get(key).copied()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn consensus(&self) -> Option<&SignalConsensus> {
        self.consensus.as_ref()
    }

    pub fn rule_outcome(&self) -> Option<&RuleOutcome> {
        self.rule.as_ref()
    }

    pub fn source_report(&self) -> Option<&SourceReport> {
        self.sources.as_ref()
    }

    /// Whether this verdict speaks in favour of the content being trustworthy
    pub fn supports_trust(&self) -> bool {
        match self.domain {
            VerdictDomain::HallucinationDetection => !self.decision,
            VerdictDomain::InformationVerification | VerdictDomain::SourceVerification => {
                self.decision
            }
        }
    }

    /// Names of providers whose votes were substituted
    pub fn degraded_providers(&self) -> Vec<&str> {
        self.votes
            .iter()
            .filter(|v| v.degraded)
            .map(|v| v.provider.as_str())
            .collect()
    }

    /// Visual vote summary (e.g., "[●○○?○○]")
    pub fn vote_summary(&self) -> String {
        vote_summary(&self.votes)
    }

    pub fn label(&self) -> &'static str {
        self.domain.decision_label(self.decision)
    }
}

/// Warnings describing substituted votes
pub(crate) fn degraded_warnings(votes: &[ProviderVote]) -> Vec<String> {
    votes
        .iter()
        .filter(|v| v.degraded)
        .map(|v| format!("Degraded provider: {}", v.rationale))
        .collect()
}
