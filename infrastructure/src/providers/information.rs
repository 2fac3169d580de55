//! Graded providers backing information verification

use super::analysis::{TextAnalyzer, context_text, coverage};
use async_trait::async_trait;
use std::sync::Arc;
use verity_application::ports::check_provider::{CheckInput, CheckProvider, ProviderError};
use verity_domain::ProviderVote;

pub const SEMANTIC_SIMILARITY: &str = "semantic_similarity";
pub const FACT_VALIDATION: &str = "fact_validation";

/// Score given when there is nothing to compare the content with.
const NEUTRAL_SCORE: f64 = 0.75;

/// How closely the content matches the caller's context
pub struct SemanticSimilarityProvider;

#[async_trait]
impl CheckProvider for SemanticSimilarityProvider {
    fn name(&self) -> &str {
        SEMANTIC_SIMILARITY
    }

    async fn evaluate(&self, input: &CheckInput) -> Result<ProviderVote, ProviderError> {
        let Some(context) = input.context() else {
            return Ok(ProviderVote::graded(
                SEMANTIC_SIMILARITY,
                NEUTRAL_SCORE,
                0.5,
                "no context to compare against",
            ));
        };

        let vote = match coverage(&input.content, &context_text(context)) {
            Some(covered) => ProviderVote::graded(
                SEMANTIC_SIMILARITY,
                covered,
                0.6 + 0.3 * (2.0 * covered - 1.0).abs(),
                format!("{:.0}% of key terms match the context", covered * 100.0),
            ),
            None => ProviderVote::graded(
                SEMANTIC_SIMILARITY,
                NEUTRAL_SCORE,
                0.5,
                "content has no key terms",
            ),
        };
        Ok(vote)
    }
}

/// Plausibility of the claims themselves
///
/// Starts from a plausible baseline, rewards attribution and subtracts the
/// fabrication, impossibility and contradiction risks.
pub struct FactValidationProvider {
    analyzer: Arc<TextAnalyzer>,
}

impl FactValidationProvider {
    pub fn new(analyzer: Arc<TextAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl CheckProvider for FactValidationProvider {
    fn name(&self) -> &str {
        FACT_VALIDATION
    }

    async fn evaluate(&self, input: &CheckInput) -> Result<ProviderVote, ProviderError> {
        let content = input.content.as_ref();
        let attribution = self.analyzer.attribution_score(content);
        let pattern = self.analyzer.pattern_risk(content);
        let factual = self.analyzer.factual_risk(content);
        let contradiction = self.analyzer.contradiction_risk(content);

        let bonus = if self.analyzer.has_attribution(content) {
            0.15 * attribution.score
        } else {
            0.0
        };
        let score = (0.8 + bonus
            - 0.5 * pattern.score
            - 0.4 * factual.score
            - 0.3 * contradiction.score)
            .clamp(0.0, 1.0);

        let mut notes: Vec<String> = Vec::new();
        notes.extend(pattern.notes);
        notes.extend(factual.notes);
        notes.extend(contradiction.notes);
        notes.extend(attribution.notes);
        let rationale = if notes.is_empty() {
            "no implausible claims found".to_string()
        } else {
            notes.join("; ")
        };

        Ok(ProviderVote::graded(FACT_VALIDATION, score, 0.8, rationale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn input(content: &str) -> CheckInput {
        CheckInput::new(content, 0.5, Duration::from_secs(1))
    }

    fn fact_validation() -> FactValidationProvider {
        FactValidationProvider::new(Arc::new(TextAnalyzer::new().unwrap().with_current_year(2025)))
    }

    #[tokio::test]
    async fn test_similarity_without_context_is_neutral() {
        let vote = SemanticSimilarityProvider
            .evaluate(&input("Water boils at 100 degrees"))
            .await
            .unwrap();
        assert_eq!(vote.score(), 0.75);
        assert_eq!(vote.confidence, 0.5);
    }

    #[tokio::test]
    async fn test_similarity_grades_coverage() {
        let ctx = json!({"summary": "Water boils at sea level when heated to 100 degrees Celsius"});
        let close = input("Water boils at 100 degrees").with_context(Some(ctx.clone()));
        let vote = SemanticSimilarityProvider.evaluate(&close).await.unwrap();
        assert_eq!(vote.score(), 1.0);
        assert!((vote.confidence - 0.9).abs() < 1e-9);

        let far = input("Mercury freezes below zero").with_context(Some(ctx));
        let vote = SemanticSimilarityProvider.evaluate(&far).await.unwrap();
        assert_eq!(vote.score(), 0.0);
    }

    #[tokio::test]
    async fn test_fact_validation_baseline() {
        let vote = fact_validation()
            .evaluate(&input("The harbor is busy in the summer months."))
            .await
            .unwrap();
        assert!((vote.score() - 0.8).abs() < 1e-9);
        assert_eq!(vote.rationale, "no implausible claims found");
    }

    #[tokio::test]
    async fn test_fact_validation_rewards_attribution() {
        let vote = fact_validation()
            .evaluate(&input("According to the port authority, traffic rose in 2023."))
            .await
            .unwrap();
        assert!((vote.score() - 0.95).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fact_validation_penalizes_fabrication() {
        let vote = fact_validation()
            .evaluate(&input(
                "Experts say 140% of sailors always return. The fleet was launched in 2040.",
            ))
            .await
            .unwrap();
        assert!(vote.score() < 0.3, "score = {}", vote.score());
        assert!(vote.rationale.contains("2040"));
    }
}
