//! Verification result entity

use crate::core::request::RequestKind;
use crate::util::current_timestamp_ms;
use crate::verdict::{DomainVerdict, VerdictDomain};
use serde::{Deserialize, Serialize};

/// The unit returned to callers
///
/// Identity is the generated `request_id`, which is never part of the cache
/// key. A result served from cache is a copy of the cached entry with a fresh
/// request id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub request_id: String,
    pub kind: RequestKind,
    pub verdicts: Vec<DomainVerdict>,
    /// Minimum of the contributing verdict confidences
    pub unified_confidence: f64,
    /// True when every verdict speaks in favour of the content
    pub trustworthy: bool,
    pub processing_ms: u64,
    /// Creation time (milliseconds since epoch)
    pub created_at_ms: u64,
    /// Identifiers of the agents involved
    pub agents: Vec<String>,
}

impl VerificationResult {
    pub fn new(
        request_id: impl Into<String>,
        kind: RequestKind,
        verdicts: Vec<DomainVerdict>,
        agents: Vec<String>,
        processing_ms: u64,
    ) -> Self {
        let unified_confidence = unified_confidence(&verdicts);
        let trustworthy = !verdicts.is_empty() && verdicts.iter().all(|v| v.supports_trust());
        Self {
            request_id: request_id.into(),
            kind,
            verdicts,
            unified_confidence,
            trustworthy,
            processing_ms,
            created_at_ms: current_timestamp_ms(),
            agents,
        }
    }

    /// Copy of this result under a different request id
    pub fn reissued(&self, request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..self.clone()
        }
    }

    pub fn verdict(&self, domain: VerdictDomain) -> Option<&DomainVerdict> {
        self.verdicts.iter().find(|v| v.domain() == domain)
    }

    /// All warnings across verdicts
    pub fn warnings(&self) -> impl Iterator<Item = &String> {
        self.verdicts.iter().flat_map(|v| v.warnings().iter())
    }
}

/// Conservative merge: the minimum verdict confidence (0.0 when empty)
///
/// A verification is only as strong as its weakest domain, so merging never
/// inflates confidence.
pub fn unified_confidence(verdicts: &[DomainVerdict]) -> f64 {
    verdicts
        .iter()
        .map(|v| v.confidence())
        .reduce(f64::min)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::{HallucinationRule, ProviderVote};
    use crate::source::SourceScoring;
    use crate::verdict::{FactorThresholds, InformationPolicy, RiskSignals};

    fn information_verdict() -> DomainVerdict {
        DomainVerdict::information(
            ProviderVote::graded("semantic_similarity", 0.9, 0.9, ""),
            ProviderVote::graded("fact_validation", 0.9, 0.9, ""),
            SourceScoring::default().report(vec![], false),
            &InformationPolicy::default(),
            false,
        )
    }

    fn hallucination_verdict(flags: usize) -> DomainVerdict {
        let votes = (0..6)
            .map(|i| {
                if i < flags {
                    ProviderVote::positive(format!("p{}", i), 0.9, "")
                } else {
                    ProviderVote::negative(format!("p{}", i), 0.9, "")
                }
            })
            .collect();
        DomainVerdict::hallucination(
            votes,
            &HallucinationRule::default(),
            RiskSignals::default(),
            &FactorThresholds::default(),
        )
    }

    #[test]
    fn test_unified_confidence_is_minimum() {
        let info = information_verdict();
        let halluc = hallucination_verdict(3);
        let min = info.confidence().min(halluc.confidence());

        let result = VerificationResult::new(
            "req-1",
            RequestKind::Combined,
            vec![info, halluc],
            vec![],
            12,
        );
        assert_eq!(result.unified_confidence, min);
        for verdict in &result.verdicts {
            assert!(result.unified_confidence <= verdict.confidence());
        }
    }

    #[test]
    fn test_single_verdict_confidence() {
        let halluc = hallucination_verdict(0);
        let result = VerificationResult::new("r", RequestKind::Hallucination, vec![halluc], vec![], 1);
        assert_eq!(result.unified_confidence, 0.9);
        assert!(result.trustworthy);
    }

    #[test]
    fn test_trustworthy_requires_every_verdict() {
        let result = VerificationResult::new(
            "r",
            RequestKind::Combined,
            vec![information_verdict(), hallucination_verdict(5)],
            vec![],
            1,
        );
        assert!(!result.trustworthy);
        assert!(result.verdict(VerdictDomain::HallucinationDetection).is_some());
        assert!(result.verdict(VerdictDomain::SourceVerification).is_none());
    }

    #[test]
    fn test_reissued_changes_only_request_id() {
        let original =
            VerificationResult::new("r1", RequestKind::Hallucination, vec![hallucination_verdict(1)], vec!["hallucination_detector".into()], 5);
        let copy = original.reissued("r2");
        assert_eq!(copy.request_id, "r2");
        assert_eq!(copy, VerificationResult {
            request_id: "r2".to_string(),
            ..original
        });
    }

    #[test]
    fn test_empty_verdicts() {
        let result = VerificationResult::new("r", RequestKind::Sources, vec![], vec![], 0);
        assert_eq!(result.unified_confidence, 0.0);
        assert!(!result.trustworthy);
    }
}
