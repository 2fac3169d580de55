//! Progress reporting for verification runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use verity_application::VerificationProgress;
use verity_domain::{AgentKind, DomainVerdict};

/// Reports progress with one bar per agent
///
/// Agents of a combined request report concurrently, so each keeps its own
/// bar in a shared [`MultiProgress`].
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<AgentKind, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_multi(MultiProgress::new())
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self::with_multi(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()))
    }

    fn with_multi(multi: MultiProgress) -> Self {
        Self {
            multi,
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn agent_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn agent_display_name(agent: AgentKind) -> &'static str {
        match agent {
            AgentKind::InformationVerifier => "Information verifier",
            AgentKind::HallucinationDetector => "Hallucination detector",
        }
    }

    fn provider_status(provider: &str, degraded: bool) -> String {
        if degraded {
            format!("{} {}", "?".yellow(), provider)
        } else {
            format!("{} {}", "v".green(), provider)
        }
    }

    fn verdict_status(verdict: &DomainVerdict) -> String {
        let label = if verdict.supports_trust() {
            verdict.label().green()
        } else {
            verdict.label().red()
        };
        format!("{} ({:.2})", label, verdict.confidence())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationProgress for ProgressReporter {
    fn on_agent_start(&self, agent: AgentKind, total_providers: usize) {
        let pb = self.multi.add(ProgressBar::new(total_providers as u64));
        pb.set_style(Self::agent_style());
        pb.set_prefix(Self::agent_display_name(agent));
        pb.set_message("Starting...");

        if let Ok(mut bars) = self.bars.lock()
            && let Some(previous) = bars.insert(agent, pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_provider_complete(&self, agent: AgentKind, provider: &str, degraded: bool) {
        if let Ok(bars) = self.bars.lock()
            && let Some(pb) = bars.get(&agent)
        {
            pb.set_message(Self::provider_status(provider, degraded));
            pb.inc(1);
        }
    }

    fn on_agent_complete(&self, agent: AgentKind, verdict: &DomainVerdict) {
        if let Ok(mut bars) = self.bars.lock()
            && let Some(pb) = bars.remove(&agent)
        {
            pb.finish_with_message(Self::verdict_status(verdict));
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Writes to stderr so that piped stdout stays machine-readable.
pub struct SimpleProgress;

impl VerificationProgress for SimpleProgress {
    fn on_agent_start(&self, agent: AgentKind, total_providers: usize) {
        eprintln!(
            "{} {} ({} providers)",
            "->".cyan(),
            ProgressReporter::agent_display_name(agent).bold(),
            total_providers
        );
    }

    fn on_provider_complete(&self, _agent: AgentKind, provider: &str, degraded: bool) {
        if degraded {
            eprintln!("  {} {} (degraded)", "?".yellow(), provider);
        } else {
            eprintln!("  {} {}", "v".green(), provider);
        }
    }

    fn on_agent_complete(&self, _agent: AgentKind, verdict: &DomainVerdict) {
        eprintln!("  = {}", ProgressReporter::verdict_status(verdict));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::{FactorThresholds, HallucinationRule, ProviderVote, RiskSignals};

    fn clean_verdict() -> DomainVerdict {
        let votes = ["semantic", "pattern", "contradiction", "factual", "ensemble", "external"]
            .into_iter()
            .map(|name| ProviderVote::negative(name, 0.8, "no issues found"))
            .collect();
        DomainVerdict::hallucination(
            votes,
            &HallucinationRule::default(),
            RiskSignals::new(1.0, 1.0, 1.0),
            &FactorThresholds::default(),
        )
    }

    #[test]
    fn test_bar_lifecycle() {
        let reporter = ProgressReporter::hidden();
        reporter.on_agent_start(AgentKind::HallucinationDetector, 6);
        reporter.on_provider_complete(AgentKind::HallucinationDetector, "pattern", false);
        reporter.on_provider_complete(AgentKind::HallucinationDetector, "external", true);

        {
            let bars = reporter.bars.lock().unwrap();
            let pb = bars.get(&AgentKind::HallucinationDetector).unwrap();
            assert_eq!(pb.position(), 2);
            assert_eq!(pb.length(), Some(6));
        }

        reporter.on_agent_complete(AgentKind::HallucinationDetector, &clean_verdict());
        assert!(reporter.bars.lock().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_agents_keep_separate_bars() {
        let reporter = ProgressReporter::hidden();
        reporter.on_agent_start(AgentKind::InformationVerifier, 2);
        reporter.on_agent_start(AgentKind::HallucinationDetector, 6);
        reporter.on_provider_complete(AgentKind::InformationVerifier, "semantic_similarity", false);

        let bars = reporter.bars.lock().unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[&AgentKind::InformationVerifier].position(), 1);
        assert_eq!(bars[&AgentKind::HallucinationDetector].position(), 0);
    }

    #[test]
    fn test_completion_without_start_is_ignored() {
        let reporter = ProgressReporter::hidden();
        reporter.on_provider_complete(AgentKind::InformationVerifier, "fact_validation", false);
        reporter.on_agent_complete(AgentKind::InformationVerifier, &clean_verdict());
        assert!(reporter.bars.lock().unwrap().is_empty());
    }
}
