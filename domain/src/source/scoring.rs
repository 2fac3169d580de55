//! Source credibility scoring

use super::entities::{Accessibility, SourceCheck, SourceReport, SourceStatus};
use crate::quorum::consensus::{mean, spread_consensus};
use serde::{Deserialize, Serialize};

/// Reputation assumed for domains missing from the reputation table.
pub const UNKNOWN_DOMAIN_REPUTATION: f64 = 0.6;

/// Weights and thresholds for source credibility
///
/// `credibility = 0.2·accessibility + 0.5·reputation + 0.3·quality`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceScoring {
    pub accessibility_weight: f64,
    pub reputation_weight: f64,
    pub quality_weight: f64,
    /// Credibility at or above which a source is verified
    pub verified_threshold: f64,
    /// Credibility at or above which a source is disputed (below: unverified)
    pub disputed_threshold: f64,
}

impl Default for SourceScoring {
    fn default() -> Self {
        Self {
            accessibility_weight: 0.2,
            reputation_weight: 0.5,
            quality_weight: 0.3,
            verified_threshold: 0.7,
            disputed_threshold: 0.4,
        }
    }
}

impl SourceScoring {
    /// Weighted credibility, clamped into [0, 1]
    pub fn credibility(&self, accessibility: &Accessibility, reputation: f64, quality: f64) -> f64 {
        (self.accessibility_weight * accessibility.score()
            + self.reputation_weight * reputation
            + self.quality_weight * quality)
            .clamp(0.0, 1.0)
    }

    /// Classify a credibility score
    pub fn classify(&self, credibility: f64) -> SourceStatus {
        if credibility >= self.verified_threshold {
            SourceStatus::Verified
        } else if credibility >= self.disputed_threshold {
            SourceStatus::Disputed
        } else {
            SourceStatus::Unverified
        }
    }

    /// Build a scored check for a source that was fetched
    pub fn check(
        &self,
        uri: impl Into<String>,
        domain: Option<String>,
        accessibility: Accessibility,
        reputation: f64,
        quality: f64,
    ) -> SourceCheck {
        let reputation = reputation.clamp(0.0, 1.0);
        let quality = quality.clamp(0.0, 1.0);
        let credibility = self.credibility(&accessibility, reputation, quality);
        SourceCheck {
            uri: uri.into(),
            domain,
            accessibility: Some(accessibility),
            reputation,
            quality,
            credibility,
            status: self.classify(credibility),
            error: None,
        }
    }

    /// Aggregate individual checks into a report
    pub fn report(&self, checks: Vec<SourceCheck>, discovered: bool) -> SourceReport {
        let credibilities: Vec<f64> = checks.iter().map(|c| c.credibility).collect();
        SourceReport {
            reliability: mean(&credibilities),
            consensus_level: spread_consensus(&credibilities),
            checks,
            discovered,
        }
    }

    pub fn weights_sum(&self) -> f64 {
        self.accessibility_weight + self.reputation_weight + self.quality_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reachable() -> Accessibility {
        Accessibility::from_status(200, 120)
    }

    #[test]
    fn test_credibility_weights() {
        let scoring = SourceScoring::default();
        let c = scoring.credibility(&reachable(), 0.9, 0.5);
        assert!((c - (0.2 + 0.45 + 0.15)).abs() < 1e-9);

        let unreachable = Accessibility::from_status(503, 0);
        let c = scoring.credibility(&unreachable, 0.9, 0.5);
        assert!((c - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_classification_thresholds() {
        let scoring = SourceScoring::default();
        assert_eq!(scoring.classify(0.7), SourceStatus::Verified);
        assert_eq!(scoring.classify(0.69), SourceStatus::Disputed);
        assert_eq!(scoring.classify(0.4), SourceStatus::Disputed);
        assert_eq!(scoring.classify(0.39), SourceStatus::Unverified);
    }

    #[test]
    fn test_unknown_domain_reachable_source() {
        let scoring = SourceScoring::default();
        let check = scoring.check(
            "https://unknown.example/post",
            Some("unknown.example".to_string()),
            reachable(),
            UNKNOWN_DOMAIN_REPUTATION,
            0.5,
        );
        // 0.2 + 0.3 + 0.15
        assert!((check.credibility - 0.65).abs() < 1e-9);
        assert_eq!(check.status, SourceStatus::Disputed);
    }

    #[test]
    fn test_report_single_source_consensus() {
        let scoring = SourceScoring::default();
        let check = scoring.check("https://a.example", None, reachable(), 0.9, 0.9);
        let report = scoring.report(vec![check], false);
        assert_eq!(report.consensus_level, 1.0);
        assert!(report.reliability.is_some());
    }

    #[test]
    fn test_report_with_invalid_source() {
        let scoring = SourceScoring::default();
        let good = scoring.check("https://a.example", None, reachable(), 1.0, 1.0);
        let bad = SourceCheck::invalid("https://b.example", None, "timeout");
        let report = scoring.report(vec![good, bad], true);

        assert_eq!(report.count(SourceStatus::Verified), 1);
        assert_eq!(report.count(SourceStatus::Invalid), 1);
        assert!((report.reliability.unwrap() - 0.5).abs() < 1e-9);
        assert!(report.consensus_level < 1e-9);
        assert!(report.discovered);
    }

    #[test]
    fn test_empty_report() {
        let report = SourceScoring::default().report(vec![], false);
        assert!(report.reliability.is_none());
        assert_eq!(report.consensus_level, 1.0);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((SourceScoring::default().weights_sum() - 1.0).abs() < 1e-12);
    }
}
