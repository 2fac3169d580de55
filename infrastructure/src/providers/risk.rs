//! Risk factors reported alongside the hallucination verdict

use super::analysis::TextAnalyzer;
use serde_json::Value;
use std::sync::Arc;
use verity_application::ports::risk_analyzer::RiskAnalyzer;
use verity_domain::RiskSignals;

pub struct HeuristicRiskAnalyzer {
    analyzer: Arc<TextAnalyzer>,
}

impl HeuristicRiskAnalyzer {
    pub fn new(analyzer: Arc<TextAnalyzer>) -> Self {
        Self { analyzer }
    }
}

impl RiskAnalyzer for HeuristicRiskAnalyzer {
    fn analyze(&self, content: &str, _context: Option<&Value>) -> RiskSignals {
        RiskSignals::new(
            1.0 - self.analyzer.contradiction_risk(content).score,
            self.analyzer.attribution_score(content).score,
            1.0 - self.analyzer.temporal_risk(content).score,
        )
    }
}
