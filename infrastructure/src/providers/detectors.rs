//! Built-in hallucination detectors
//!
//! Five of the six panel members are local text heuristics; the sixth
//! (`external`) lives in [`super::external`].
//!
//! | Detector | Flags content when |
//! |----------|--------------------|
//! | `semantic` | the content drifts away from the supplied context |
//! | `pattern` | it leans on unattributed figures, vague authority or absolutes |
//! | `contradiction` | two statements assert opposite things |
//! | `factual` | it describes future years as past or cites impossible figures |
//! | `ensemble` | the weighted blend of the checks above is high |

use super::analysis::{Finding, TextAnalyzer, context_text, coverage};
use super::risk_vote;
use async_trait::async_trait;
use std::sync::Arc;
use verity_application::ports::check_provider::{CheckInput, CheckProvider, ProviderError};
use verity_domain::ProviderVote;

/// Which heuristic a [`HeuristicDetector`] runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    Semantic,
    Pattern,
    Contradiction,
    Factual,
    Ensemble,
}

impl DetectorKind {
    pub const ALL: [DetectorKind; 5] = [
        DetectorKind::Semantic,
        DetectorKind::Pattern,
        DetectorKind::Contradiction,
        DetectorKind::Factual,
        DetectorKind::Ensemble,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DetectorKind::Semantic => "semantic",
            DetectorKind::Pattern => "pattern",
            DetectorKind::Contradiction => "contradiction",
            DetectorKind::Factual => "factual",
            DetectorKind::Ensemble => "ensemble",
        }
    }
}

pub struct HeuristicDetector {
    kind: DetectorKind,
    analyzer: Arc<TextAnalyzer>,
}

impl HeuristicDetector {
    pub fn new(kind: DetectorKind, analyzer: Arc<TextAnalyzer>) -> Self {
        Self { kind, analyzer }
    }

    fn assess(&self, input: &CheckInput) -> Finding {
        let content = input.content.as_ref();
        match self.kind {
            DetectorKind::Semantic => semantic_drift(content, input),
            DetectorKind::Pattern => self.analyzer.pattern_risk(content),
            DetectorKind::Contradiction => self.analyzer.contradiction_risk(content),
            DetectorKind::Factual => self.analyzer.factual_risk(content),
            DetectorKind::Ensemble => {
                let pattern = self.analyzer.pattern_risk(content);
                let contradiction = self.analyzer.contradiction_risk(content);
                let factual = self.analyzer.factual_risk(content);
                let score = 0.4 * pattern.score + 0.3 * contradiction.score + 0.3 * factual.score;
                Finding {
                    score,
                    notes: vec![format!(
                        "pattern {:.2}, contradiction {:.2}, factual {:.2}",
                        pattern.score, contradiction.score, factual.score
                    )],
                }
            }
        }
    }
}

#[async_trait]
impl CheckProvider for HeuristicDetector {
    fn name(&self) -> &str {
        self.kind.name()
    }

    async fn evaluate(&self, input: &CheckInput) -> Result<ProviderVote, ProviderError> {
        let finding = self.assess(input);
        Ok(risk_vote(
            self.kind.name(),
            finding.score,
            input.sensitivity,
            finding.summary("no issues found"),
        ))
    }
}

/// Share of content terms missing from the context
///
/// Without context there is nothing to drift from, so the risk stays low.
fn semantic_drift(content: &str, input: &CheckInput) -> Finding {
    let Some(context) = input.context() else {
        return Finding {
            score: 0.2,
            notes: vec!["no context to compare against".to_string()],
        };
    };

    match coverage(content, &context_text(context)) {
        Some(covered) => Finding {
            score: 1.0 - covered,
            notes: vec![format!("{:.0}% of key terms appear in context", covered * 100.0)],
        },
        None => Finding {
            score: 0.2,
            notes: vec!["content has no key terms".to_string()],
        },
    }
}
