//! Risk analysis port
//!
//! Computes the hallucination risk factors that are independent of the
//! provider vote count.

use serde_json::Value;
use verity_domain::RiskSignals;

pub trait RiskAnalyzer: Send + Sync {
    fn analyze(&self, content: &str, context: Option<&Value>) -> RiskSignals;
}

/// Analyzer that reports every factor as fully satisfied
pub struct NeutralRiskAnalyzer;

impl RiskAnalyzer for NeutralRiskAnalyzer {
    fn analyze(&self, _content: &str, _context: Option<&Value>) -> RiskSignals {
        RiskSignals::default()
    }
}
