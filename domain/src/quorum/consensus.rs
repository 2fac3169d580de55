//! Consensus measures across independent signals
//!
//! Two notions of agreement are used:
//!
//! - [`SignalConsensus`]: the mean of several signals compared against a
//!   required threshold (information verification).
//! - [`spread_consensus`]: one minus the normalized variance of a set of
//!   scores (agreement between candidate sources).

use serde::{Deserialize, Serialize};

/// Required mean agreement for information verification.
pub const DEFAULT_CONSENSUS_THRESHOLD: f64 = 0.75;

/// Largest population variance attainable by values in [0, 1].
const MAX_UNIT_VARIANCE: f64 = 0.25;

/// Outcome of a consensus check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusOutcome {
    /// Mean agreement met the threshold
    Achieved,
    /// Mean agreement fell short of the threshold
    NotAchieved,
}

impl ConsensusOutcome {
    pub fn is_achieved(&self) -> bool {
        matches!(self, ConsensusOutcome::Achieved)
    }
}

impl std::fmt::Display for ConsensusOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusOutcome::Achieved => write!(f, "Achieved"),
            ConsensusOutcome::NotAchieved => write!(f, "Not achieved"),
        }
    }
}

/// Mean-vs-threshold consensus over a set of signals
///
/// # Example
///
/// ```
/// use verity_domain::quorum::SignalConsensus;
///
/// let consensus = SignalConsensus::evaluate(&[0.75, 0.75, 0.75], 0.75);
/// assert!(consensus.is_achieved()); // exactly at threshold counts
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalConsensus {
    /// Straight average of the signals
    pub score: f64,
    /// Required threshold
    pub threshold: f64,
    pub outcome: ConsensusOutcome,
}

impl SignalConsensus {
    /// Evaluate consensus; an empty signal set never achieves consensus
    pub fn evaluate(signals: &[f64], threshold: f64) -> Self {
        let score = mean(signals).unwrap_or(0.0);
        let outcome = if !signals.is_empty() && score >= threshold {
            ConsensusOutcome::Achieved
        } else {
            ConsensusOutcome::NotAchieved
        };
        Self {
            score,
            threshold,
            outcome,
        }
    }

    pub fn is_achieved(&self) -> bool {
        self.outcome.is_achieved()
    }

    /// True when the score is strictly above the threshold
    pub fn exceeds_threshold(&self) -> bool {
        self.score > self.threshold
    }
}

/// Agreement between scores in [0, 1], measured as `1 − variance / 0.25`
///
/// The population variance is normalized by the largest variance values in
/// [0, 1] can reach, so identical scores give 1.0 and `{0.0, 1.0}` gives 0.0.
/// Fewer than two scores are trivially consistent.
pub fn spread_consensus(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 1.0;
    }
    let variance = population_variance(scores).unwrap_or(0.0);
    (1.0 - variance / MAX_UNIT_VARIANCE).clamp(0.0, 1.0)
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population variance, `None` for an empty slice
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64)
}
