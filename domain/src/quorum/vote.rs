//! Vote types for verification quorums
//!
//! This module defines the voting primitives produced by check providers.

use serde::{Deserialize, Serialize};

/// A provider's verdict: either a yes/no flag or a graded score in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "value")]
pub enum Verdict {
    Binary(bool),
    Graded(f64),
}

impl Verdict {
    /// Whether the verdict counts as a positive vote
    ///
    /// Graded verdicts count as positive at 0.5 and above.
    pub fn is_positive(&self) -> bool {
        match self {
            Verdict::Binary(flag) => *flag,
            Verdict::Graded(score) => *score >= 0.5,
        }
    }

    /// Numeric score of the verdict (binary maps to 0.0 / 1.0)
    pub fn score(&self) -> f64 {
        match self {
            Verdict::Binary(true) => 1.0,
            Verdict::Binary(false) => 0.0,
            Verdict::Graded(score) => *score,
        }
    }
}

/// A single vote from a check provider
///
/// Produced once per provider invocation and never mutated afterwards.
///
/// # Example
///
/// ```
/// use verity_domain::quorum::ProviderVote;
///
/// let flagged = ProviderVote::positive("pattern", 0.9, "Unattributed statistic");
/// assert!(flagged.is_positive());
///
/// let missing = ProviderVote::missing("external", "timed out after 10s");
/// assert!(!missing.is_positive());
/// assert_eq!(missing.confidence, 0.5);
/// assert!(missing.degraded);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderVote {
    /// Provider name (e.g., "semantic", "pattern")
    pub provider: String,
    /// Boolean or graded verdict
    pub verdict: Verdict,
    /// Confidence level (0.0 to 1.0)
    pub confidence: f64,
    /// Free-text rationale
    pub rationale: String,
    /// True when this is a substitute for a failed or timed-out provider
    #[serde(default)]
    pub degraded: bool,
}

/// Confidence assigned to a substituted vote.
pub const MISSING_VOTE_CONFIDENCE: f64 = 0.5;

impl ProviderVote {
    /// Create a new vote; confidence is clamped into [0, 1]
    pub fn new(
        provider: impl Into<String>,
        verdict: Verdict,
        confidence: f64,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            verdict,
            confidence: confidence.clamp(0.0, 1.0),
            rationale: rationale.into(),
            degraded: false,
        }
    }

    /// Create a positive binary vote
    pub fn positive(provider: impl Into<String>, confidence: f64, rationale: impl Into<String>) -> Self {
        Self::new(provider, Verdict::Binary(true), confidence, rationale)
    }

    /// Create a negative binary vote
    pub fn negative(provider: impl Into<String>, confidence: f64, rationale: impl Into<String>) -> Self {
        Self::new(provider, Verdict::Binary(false), confidence, rationale)
    }

    /// Create a graded vote; the score is clamped into [0, 1]
    pub fn graded(
        provider: impl Into<String>,
        score: f64,
        confidence: f64,
        rationale: impl Into<String>,
    ) -> Self {
        Self::new(provider, Verdict::Graded(score.clamp(0.0, 1.0)), confidence, rationale)
    }

    /// Substitute vote for a provider that failed, timed out or was skipped
    pub fn missing(provider: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let provider = provider.into();
        let rationale = format!("{} failed: {}", provider, reason);
        Self {
            provider,
            verdict: Verdict::Binary(false),
            confidence: MISSING_VOTE_CONFIDENCE,
            rationale,
            degraded: true,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.verdict.is_positive()
    }

    pub fn score(&self) -> f64 {
        self.verdict.score()
    }

    /// A vote is well-formed when its confidence and score are finite and in range
    pub fn is_well_formed(&self) -> bool {
        let score_ok = match self.verdict {
            Verdict::Binary(_) => true,
            Verdict::Graded(s) => s.is_finite() && (0.0..=1.0).contains(&s),
        };
        score_ok && self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence)
    }
}

/// Tally of a set of provider votes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteTally {
    /// Number of positive votes
    pub positive_count: usize,
    /// Number of negative votes
    pub negative_count: usize,
    /// Number of substituted (degraded) votes
    pub degraded_count: usize,
    /// Total number of votes
    pub total_votes: usize,
}

impl VoteTally {
    pub fn from_votes(votes: &[ProviderVote]) -> Self {
        let positive_count = votes.iter().filter(|v| v.is_positive()).count();
        Self {
            positive_count,
            negative_count: votes.len() - positive_count,
            degraded_count: votes.iter().filter(|v| v.degraded).count(),
            total_votes: votes.len(),
        }
    }

    /// Share of a panel of `panel_size` that answered with a real vote
    ///
    /// Substituted votes do not count; an empty panel has no coverage.
    pub fn coverage(&self, panel_size: usize) -> f64 {
        if panel_size == 0 {
            return 0.0;
        }
        panel_size.saturating_sub(self.degraded_count) as f64 / panel_size as f64
    }
}

/// Generate a visual vote summary (e.g., "[●●○?]"); `?` marks a degraded vote
pub fn vote_summary(votes: &[ProviderVote]) -> String {
    let mut summary = String::from("[");
    for vote in votes {
        summary.push(if vote.degraded {
            '?'
        } else if vote.is_positive() {
            '●'
        } else {
            '○'
        });
    }
    summary.push(']');
    summary
}
