//! Hallucination Detector Agent
//!
//! Runs six independent check providers concurrently and reduces their votes
//! with [`HallucinationRule`]. Risk factors that do not depend on the vote
//! count come from a [`RiskAnalyzer`].

use crate::config::DetectionParams;
use crate::ports::check_provider::CheckProvider;
use crate::ports::progress::VerificationProgress;
use crate::ports::risk_analyzer::RiskAnalyzer;
use crate::use_cases::agent_manager::{AgentError, VerificationAgent};
use crate::use_cases::run_checks::ProviderPanel;
use crate::use_cases::shared::readiness;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use verity_domain::{
    AgentKind, DomainVerdict, FactorThresholds, HallucinationRule, ProviderVote,
    VerificationRequest,
};

pub struct HallucinationDetectorAgent {
    panel: ProviderPanel,
    risk: Arc<dyn RiskAnalyzer>,
    rule: HallucinationRule,
    thresholds: FactorThresholds,
}

impl HallucinationDetectorAgent {
    pub fn new(
        providers: Vec<Arc<dyn CheckProvider>>,
        risk: Arc<dyn RiskAnalyzer>,
        params: &DetectionParams,
    ) -> Self {
        if providers.len() != params.rule.panel_size {
            warn!(
                "Hallucination panel has {} providers, rule expects {}",
                providers.len(),
                params.rule.panel_size
            );
        }
        Self {
            panel: ProviderPanel::new(
                AgentKind::HallucinationDetector,
                providers,
                params.provider_timeout,
            ),
            risk,
            rule: params.rule,
            thresholds: params.thresholds,
        }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.panel.names()
    }

    /// Detect fabricated claims in the content
    pub async fn detect(
        &self,
        request: &VerificationRequest,
        progress: &dyn VerificationProgress,
    ) -> DomainVerdict {
        let mut votes = self.panel.run(request, progress).await;

        // The rule always reduces over the full panel size
        while votes.len() < self.rule.panel_size {
            let slot = votes.len() + 1;
            votes.push(ProviderVote::missing(
                format!("provider_{}", slot),
                "no provider configured",
            ));
        }

        let signals = self.risk.analyze(request.content(), request.context());
        let verdict = DomainVerdict::hallucination(votes, &self.rule, signals, &self.thresholds);

        info!(
            "Hallucination detection: {} {} (confidence {:.2})",
            verdict.label(),
            verdict.vote_summary(),
            verdict.confidence()
        );
        progress.on_agent_complete(AgentKind::HallucinationDetector, &verdict);
        verdict
    }
}

#[async_trait]
impl VerificationAgent for HallucinationDetectorAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::HallucinationDetector
    }

    async fn initialize(&self) -> Result<(), AgentError> {
        if self.panel.is_empty() {
            return Err(AgentError::NoProviders);
        }
        readiness(self.kind(), self.panel.initialize().await)
    }
}
