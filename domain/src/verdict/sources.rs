//! Source verification reduction

use super::entities::{DomainVerdict, VerdictDomain, degraded_warnings, factor};
use crate::quorum::ProviderVote;
use crate::source::{SourceReport, SourceScoring, SourceStatus};
use std::collections::BTreeMap;

impl DomainVerdict {
    /// Reduce a source report to a verdict
    ///
    /// Each source contributes one graded vote carrying its credibility;
    /// sources that could not be fetched contribute a substituted vote. The
    /// aggregate confidence is the mean credibility, and the sources count as
    /// credible when that mean reaches the verified threshold.
    pub fn sources(report: SourceReport, scoring: &SourceScoring) -> Self {
        let votes: Vec<ProviderVote> = report
            .checks
            .iter()
            .map(|check| match check.status {
                SourceStatus::Invalid => ProviderVote::missing(
                    check.uri.clone(),
                    check.error.as_deref().unwrap_or("unavailable"),
                ),
                status => ProviderVote::graded(
                    check.uri.clone(),
                    check.credibility,
                    1.0,
                    format!(
                        "{} (reputation {:.2}, quality {:.2})",
                        status, check.reputation, check.quality
                    ),
                ),
            })
            .collect();

        let confidence = report.reliability.unwrap_or(0.0);
        let decision = report.reliability.is_some() && confidence >= scoring.verified_threshold;

        let mut factors = BTreeMap::new();
        factors.insert(factor::SOURCE_RELIABILITY.to_string(), confidence);
        factors.insert(factor::SOURCE_CONSENSUS.to_string(), report.consensus_level);

        let mut warnings = degraded_warnings(&votes);
        let mut suggestions = Vec::new();
        if report.is_empty() {
            warnings.push("No candidate sources were supplied".to_string());
            suggestions.push("Supply one or more source URIs to verify".to_string());
        }
        if report.count(SourceStatus::Unverified) > 0 {
            suggestions.push("Replace unverified sources with reputable references".to_string());
        }
        if report.checks.len() >= 2 && report.consensus_level < 0.5 {
            warnings.push(format!(
                "Sources disagree in credibility (consensus level {:.2})",
                report.consensus_level
            ));
        }

        Self {
            domain: VerdictDomain::SourceVerification,
            decision,
            confidence,
            reliability: Some(report.consensus_level),
            votes,
            factors,
            warnings,
            suggestions,
            consensus: None,
            rule: None,
            sources: Some(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Accessibility, SourceCheck};

    #[test]
    fn test_credible_sources() {
        let scoring = SourceScoring::default();
        let ok = Accessibility::from_status(200, 50);
        let report = scoring.report(
            vec![
                scoring.check("https://a.example", None, ok, 0.9, 0.8),
                scoring.check("https://b.example", None, ok, 0.9, 0.8),
            ],
            false,
        );
        let verdict = DomainVerdict::sources(report, &scoring);

        assert!(verdict.decision());
        assert!((verdict.confidence() - 0.89).abs() < 1e-9);
        assert_eq!(verdict.reliability(), Some(1.0));
        assert_eq!(verdict.votes().len(), 2);
    }

    #[test]
    fn test_invalid_source_becomes_degraded_vote() {
        let scoring = SourceScoring::default();
        let report = scoring.report(
            vec![SourceCheck::invalid(
                "https://gone.example",
                None,
                "connection refused",
            )],
            false,
        );
        let verdict = DomainVerdict::sources(report, &scoring);

        assert!(!verdict.decision());
        assert_eq!(verdict.confidence(), 0.0);
        assert_eq!(verdict.degraded_providers(), vec!["https://gone.example"]);
    }

    #[test]
    fn test_no_sources() {
        let scoring = SourceScoring::default();
        let verdict = DomainVerdict::sources(scoring.report(vec![], false), &scoring);
        assert!(!verdict.decision());
        assert!(!verdict.warnings().is_empty());
    }
}
