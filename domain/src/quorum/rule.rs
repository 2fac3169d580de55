//! Hallucination quorum rule
//!
//! Reduces the six hallucination-detection votes to a single decision.
//!
//! ```text
//! flag count ≥ 4          → hallucination   (0.90 / 0.95)
//! flag count = 3, ≥2 strong → hallucination (0.80 / 0.85)
//! flag count = 3, <2 strong → clean         (0.60 / 0.70)
//! flag count ≤ 2          → clean           (0.90 / 0.95)
//! ```
//!
//! A "strong" vote is a hallucination vote with confidence strictly above 0.8.

use super::vote::ProviderVote;
use serde::{Deserialize, Serialize};

/// Confidence and reliability reported for one branch of the rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceTier {
    pub confidence: f64,
    pub reliability: f64,
}

impl ConfidenceTier {
    pub const fn new(confidence: f64, reliability: f64) -> Self {
        Self {
            confidence,
            reliability,
        }
    }
}

/// Which branch of the rule produced the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleBranch {
    /// Clear majority flagged the content
    Flagged,
    /// Narrow split resolved by strong votes toward hallucination
    ContestedFlagged,
    /// Narrow split without enough strong votes
    ContestedCleared,
    /// Clear majority did not flag the content
    Cleared,
}

impl std::fmt::Display for RuleBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleBranch::Flagged => write!(f, "flagged"),
            RuleBranch::ContestedFlagged => write!(f, "contested (flagged)"),
            RuleBranch::ContestedCleared => write!(f, "contested (cleared)"),
            RuleBranch::Cleared => write!(f, "cleared"),
        }
    }
}

/// Outcome of applying [`HallucinationRule`] to a vote set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub is_hallucination: bool,
    pub confidence: f64,
    pub reliability: f64,
    pub branch: RuleBranch,
    /// Number of providers voting "is a hallucination"
    pub flag_count: usize,
    /// Number of those votes with confidence above the strong threshold
    pub strong_flag_count: usize,
}

/// Vote-count rule for hallucination detection
///
/// All thresholds are configuration defaults; see [`HallucinationRule::default`].
///
/// # Example
///
/// ```
/// use verity_domain::quorum::{HallucinationRule, ProviderVote};
///
/// let votes = vec![
///     ProviderVote::positive("semantic", 0.9, ""),
///     ProviderVote::positive("pattern", 0.85, ""),
///     ProviderVote::positive("contradiction", 0.6, ""),
///     ProviderVote::negative("factual", 0.7, ""),
///     ProviderVote::negative("ensemble", 0.7, ""),
///     ProviderVote::negative("external", 0.7, ""),
/// ];
///
/// let outcome = HallucinationRule::default().decide(&votes);
/// assert!(outcome.is_hallucination); // 3 of 6, two of them strong
/// assert_eq!(outcome.confidence, 0.8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HallucinationRule {
    /// Number of providers on the panel (denominator for factual accuracy)
    pub panel_size: usize,
    /// Flag count at or above which content is a hallucination
    pub flag_threshold: usize,
    /// Flag count that triggers confidence-weighted sub-voting
    pub contested_count: usize,
    /// Confidence strictly above which a flag vote counts as strong
    pub strong_confidence: f64,
    /// Strong votes needed to flag a contested split
    pub strong_votes_required: usize,
    pub flagged: ConfidenceTier,
    pub contested_flagged: ConfidenceTier,
    pub contested_cleared: ConfidenceTier,
    pub cleared: ConfidenceTier,
}

impl Default for HallucinationRule {
    fn default() -> Self {
        Self {
            panel_size: 6,
            flag_threshold: 4,
            contested_count: 3,
            strong_confidence: 0.8,
            strong_votes_required: 2,
            flagged: ConfidenceTier::new(0.9, 0.95),
            contested_flagged: ConfidenceTier::new(0.8, 0.85),
            contested_cleared: ConfidenceTier::new(0.6, 0.7),
            cleared: ConfidenceTier::new(0.9, 0.95),
        }
    }
}

impl HallucinationRule {
    /// Apply the rule to a set of votes
    pub fn decide(&self, votes: &[ProviderVote]) -> RuleOutcome {
        let flags: Vec<&ProviderVote> = votes.iter().filter(|v| v.is_positive()).collect();
        let flag_count = flags.len();
        let strong_flag_count = flags
            .iter()
            .filter(|v| v.confidence > self.strong_confidence)
            .count();

        let (branch, tier) = if flag_count >= self.flag_threshold {
            (RuleBranch::Flagged, self.flagged)
        } else if flag_count == self.contested_count {
            if strong_flag_count >= self.strong_votes_required {
                (RuleBranch::ContestedFlagged, self.contested_flagged)
            } else {
                (RuleBranch::ContestedCleared, self.contested_cleared)
            }
        } else {
            (RuleBranch::Cleared, self.cleared)
        };

        RuleOutcome {
            is_hallucination: matches!(branch, RuleBranch::Flagged | RuleBranch::ContestedFlagged),
            confidence: tier.confidence,
            reliability: tier.reliability,
            branch,
            flag_count,
            strong_flag_count,
        }
    }

    /// `1 − flag_count / panel_size`, clamped into [0, 1]
    pub fn factual_accuracy(&self, flag_count: usize) -> f64 {
        if self.panel_size == 0 {
            return 0.0;
        }
        (1.0 - flag_count as f64 / self.panel_size as f64).clamp(0.0, 1.0)
    }

    /// Check the rule's thresholds are internally consistent
    pub fn is_consistent(&self) -> bool {
        self.panel_size > 0
            && self.flag_threshold <= self.panel_size
            && self.contested_count < self.flag_threshold
            && (0.0..=1.0).contains(&self.strong_confidence)
    }
}
