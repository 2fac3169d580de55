//! Built-in check providers
//!
//! [`HeuristicSuite`] compiles the shared text patterns once and hands out the
//! providers for both agents: the two graded information providers and the
//! six-member hallucination panel.

pub mod analysis;
pub mod detectors;
pub mod external;
pub mod information;
pub mod risk;

pub use analysis::{Finding, TextAnalyzer};
pub use detectors::{DetectorKind, HeuristicDetector};
pub use external::{EXTERNAL_DETECTOR, ExternalDetector};
pub use information::{
    FACT_VALIDATION, FactValidationProvider, SEMANTIC_SIMILARITY, SemanticSimilarityProvider,
};
pub use risk::HeuristicRiskAnalyzer;

use std::sync::Arc;
use verity_application::ports::check_provider::{CheckProvider, ProviderError};
use verity_application::ports::risk_analyzer::RiskAnalyzer;
use verity_domain::ProviderVote;

/// Hallucination panel members, in vote order
pub const DETECTOR_NAMES: [&str; 6] = [
    "semantic",
    "pattern",
    "contradiction",
    "factual",
    "ensemble",
    EXTERNAL_DETECTOR,
];

/// Every provider name accepted in `enabledProviders` and `[providers]`
pub const KNOWN_PROVIDERS: [&str; 8] = [
    SEMANTIC_SIMILARITY,
    FACT_VALIDATION,
    "semantic",
    "pattern",
    "contradiction",
    "factual",
    "ensemble",
    EXTERNAL_DETECTOR,
];

pub fn is_known_provider(name: &str) -> bool {
    KNOWN_PROVIDERS.contains(&name)
}

/// Risk level at which a detector flags the content
///
/// Higher sensitivity lowers the bar: 0.75 at sensitivity 0, 0.5 at the
/// default 0.5, never below 0.2 or above 0.8.
pub fn flag_threshold(sensitivity: f64) -> f64 {
    (0.75 - 0.5 * sensitivity).clamp(0.2, 0.8)
}

/// Binary vote from a risk score
///
/// Confidence grows with the distance between the risk and the threshold.
pub fn risk_vote(
    provider: &str,
    risk: f64,
    sensitivity: f64,
    rationale: impl Into<String>,
) -> ProviderVote {
    let threshold = flag_threshold(sensitivity);
    let confidence = (0.55 + (risk - threshold).abs()).min(0.95);
    if risk >= threshold {
        ProviderVote::positive(provider, confidence, rationale)
    } else {
        ProviderVote::negative(provider, confidence, rationale)
    }
}

/// Factory for the built-in providers sharing one [`TextAnalyzer`]
#[derive(Clone)]
pub struct HeuristicSuite {
    analyzer: Arc<TextAnalyzer>,
}

impl HeuristicSuite {
    pub fn new() -> Result<Self, ProviderError> {
        let analyzer = TextAnalyzer::new()
            .map_err(|e| ProviderError::Initialization(format!("text patterns: {}", e)))?;
        Ok(Self {
            analyzer: Arc::new(analyzer),
        })
    }

    pub fn analyzer(&self) -> Arc<TextAnalyzer> {
        Arc::clone(&self.analyzer)
    }

    pub fn semantic_similarity(&self) -> Arc<dyn CheckProvider> {
        Arc::new(SemanticSimilarityProvider)
    }

    pub fn fact_validation(&self) -> Arc<dyn CheckProvider> {
        Arc::new(FactValidationProvider::new(self.analyzer()))
    }

    /// The six hallucination detectors in [`DETECTOR_NAMES`] order
    pub fn detectors(&self, external_endpoint: Option<String>) -> Vec<Arc<dyn CheckProvider>> {
        let mut panel: Vec<Arc<dyn CheckProvider>> = DetectorKind::ALL
            .into_iter()
            .map(|kind| Arc::new(HeuristicDetector::new(kind, self.analyzer())) as Arc<dyn CheckProvider>)
            .collect();
        panel.push(Arc::new(
            ExternalDetector::new(self.analyzer()).with_endpoint(external_endpoint),
        ));
        panel
    }

    pub fn risk_analyzer(&self) -> Arc<dyn RiskAnalyzer> {
        Arc::new(HeuristicRiskAnalyzer::new(self.analyzer()))
    }
}
