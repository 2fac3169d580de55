//! Information Verifier Agent
//!
//! Decides whether a claim is adequately supported by evidence. The semantic
//! and factual providers run concurrently with source verification; the three
//! signals are then reduced by [`InformationPolicy`].

use crate::config::InformationParams;
use crate::ports::check_provider::CheckProvider;
use crate::ports::progress::VerificationProgress;
use crate::use_cases::agent_manager::{AgentError, VerificationAgent};
use crate::use_cases::run_checks::ProviderPanel;
use crate::use_cases::shared::readiness;
use crate::use_cases::verify_sources::SourceVerifier;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use verity_domain::{AgentKind, DomainVerdict, InformationPolicy, ProviderVote, VerificationRequest};

pub struct InformationVerifierAgent {
    panel: ProviderPanel,
    sources: Arc<SourceVerifier>,
    policy: InformationPolicy,
    discovery_limit: usize,
}

impl InformationVerifierAgent {
    /// Create the agent from its two providers
    ///
    /// Vote order matters: the semantic vote comes first, the factual second.
    pub fn new(
        semantic: Arc<dyn CheckProvider>,
        factual: Arc<dyn CheckProvider>,
        sources: Arc<SourceVerifier>,
        params: &InformationParams,
    ) -> Self {
        Self {
            panel: ProviderPanel::new(
                AgentKind::InformationVerifier,
                vec![semantic, factual],
                params.provider_timeout,
            ),
            sources,
            policy: params.policy,
            discovery_limit: params.discovery_limit,
        }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.panel.names()
    }

    /// Verify a claim
    pub async fn verify(
        &self,
        request: &VerificationRequest,
        progress: &dyn VerificationProgress,
    ) -> DomainVerdict {
        let (votes, report) = tokio::join!(
            self.panel.run(request, progress),
            self.sources.resolve_and_verify(request, self.discovery_limit)
        );

        let names = self.panel.names();
        let mut votes = votes.into_iter();
        let semantic = votes
            .next()
            .unwrap_or_else(|| ProviderVote::missing(names[0], "no vote"));
        let factual = votes
            .next()
            .unwrap_or_else(|| ProviderVote::missing(names[1], "no vote"));

        let verdict = DomainVerdict::information(
            semantic,
            factual,
            report,
            &self.policy,
            request.options().strict_mode,
        );

        info!(
            "Information verification: {} (confidence {:.2})",
            verdict.label(),
            verdict.confidence()
        );
        progress.on_agent_complete(AgentKind::InformationVerifier, &verdict);
        verdict
    }
}

#[async_trait]
impl VerificationAgent for InformationVerifierAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::InformationVerifier
    }

    async fn initialize(&self) -> Result<(), AgentError> {
        readiness(self.kind(), self.panel.initialize().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceParams;
    use crate::ports::check_provider::{CheckInput, ProviderError};
    use crate::ports::progress::NoProgress;
    use crate::ports::reputation::ReputationTable;
    use crate::ports::source_discovery::NoDiscovery;
    use crate::ports::source_fetcher::{FetchError, FetchedSource, SourceFetcher};
    use std::time::Duration;
    use verity_domain::{RequestOptions, factor};

    struct GradedProvider {
        name: &'static str,
        score: Option<f64>,
        delay: Duration,
    }

    impl GradedProvider {
        fn arc(name: &'static str, score: Option<f64>) -> Arc<dyn CheckProvider> {
            Arc::new(Self {
                name,
                score,
                delay: Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl CheckProvider for GradedProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn evaluate(&self, _input: &CheckInput) -> Result<ProviderVote, ProviderError> {
            tokio::time::sleep(self.delay).await;
            match self.score {
                Some(score) => Ok(ProviderVote::graded(self.name, score, 0.9, "scripted")),
                None => Err(ProviderError::Failed("backend down".to_string())),
            }
        }
    }

    struct OkFetcher;

    #[async_trait]
    impl SourceFetcher for OkFetcher {
        async fn fetch(&self, uri: &str) -> Result<FetchedSource, FetchError> {
            if uri.contains("down") {
                return Err(FetchError::Connection("refused".to_string()));
            }
            let text = "A measured and cited statement from 2020 with references and et al. ".repeat(60);
            Ok(FetchedSource {
                status_code: 200,
                response_time_ms: 5,
                raw_len: text.len(),
                text,
                content_type: None,
            })
        }
    }

    struct HighReputation;

    impl ReputationTable for HighReputation {
        fn reputation(&self, _domain: &str) -> f64 {
            0.9
        }
    }

    fn agent(semantic: Option<f64>, factual: Option<f64>) -> InformationVerifierAgent {
        let sources = Arc::new(SourceVerifier::new(
            Arc::new(OkFetcher),
            Arc::new(HighReputation),
            Arc::new(NoDiscovery),
            &SourceParams::default(),
        ));
        InformationVerifierAgent::new(
            GradedProvider::arc("semantic_similarity", semantic),
            GradedProvider::arc("fact_validation", factual),
            sources,
            &InformationParams::default(),
        )
    }

    #[tokio::test]
    async fn test_neutral_scores_without_sources_are_not_verified() {
        let request = VerificationRequest::new("An unremarkable claim").unwrap();
        let verdict = agent(Some(0.75), Some(0.75)).verify(&request, &NoProgress).await;

        assert!((verdict.confidence() - 0.75).abs() < 1e-9);
        let consensus = verdict.consensus().unwrap();
        assert_eq!(consensus.score, 0.75);
        assert!(consensus.is_achieved());
        assert!(!verdict.decision());
    }

    #[tokio::test]
    async fn test_supported_claim_is_verified() {
        let request = VerificationRequest::new("Water boils at 100C at sea level")
            .unwrap()
            .with_sources(["https://physics.example/boiling"]);
        let verdict = agent(Some(0.9), Some(0.9)).verify(&request, &NoProgress).await;

        assert!(verdict.decision());
        assert!(verdict.confidence() >= 0.8);
        assert_eq!(verdict.votes().len(), 3);
        assert!(verdict.factor(factor::SOURCE_RELIABILITY).unwrap() > 0.9);
    }

    #[tokio::test]
    async fn test_strict_mode() {
        let request = VerificationRequest::new("Claim")
            .unwrap()
            .with_sources(["https://a.example"])
            .with_options(RequestOptions::default().with_strict_mode());
        // weighted 0.3·0.8 + 0.4·0.8 + 0.3·~0.95 ≈ 0.85, +0.1 bonus ≈ 0.95
        let verdict = agent(Some(0.8), Some(0.8)).verify(&request, &NoProgress).await;
        assert!(verdict.confidence() >= 0.9);
        assert!(verdict.decision());

        let weak = agent(Some(0.78), Some(0.76))
            .verify(
                &VerificationRequest::new("Claim")
                    .unwrap()
                    .with_options(RequestOptions::default().with_strict_mode()),
                &NoProgress,
            )
            .await;
        // ≈0.768 + 0.1 bonus = 0.868: verified normally, not in strict mode
        assert!(weak.confidence() >= 0.8 && weak.confidence() < 0.9);
        assert!(!weak.decision());
    }

    #[tokio::test]
    async fn test_failed_provider_degrades_confidence() {
        let request = VerificationRequest::new("Claim")
            .unwrap()
            .with_sources(["https://a.example", "https://down.example"]);
        let verdict = agent(None, Some(0.9)).verify(&request, &NoProgress).await;

        assert!(!verdict.decision());
        assert_eq!(verdict.degraded_providers(), vec!["semantic_similarity"]);
        let report = verdict.source_report().unwrap();
        assert_eq!(report.checks.len(), 2);
        assert!(report.consensus_level < 0.5);
    }

    #[tokio::test]
    async fn test_initialize_succeeds_with_default_providers() {
        assert!(agent(Some(0.5), Some(0.5)).initialize().await.is_ok());
    }
}
