//! Progress notification port
//!
//! Defines the interface for reporting progress during verification.

use verity_domain::{AgentKind, DomainVerdict};

/// Callback for progress updates during verification
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.). Agents of a combined
/// request report concurrently.
pub trait VerificationProgress: Send + Sync {
    /// Called when an agent starts querying its providers
    fn on_agent_start(&self, agent: AgentKind, total_providers: usize);

    /// Called when one provider of an agent has voted (or been substituted)
    fn on_provider_complete(&self, agent: AgentKind, provider: &str, degraded: bool);

    /// Called when an agent has reduced its votes to a verdict
    fn on_agent_complete(&self, agent: AgentKind, verdict: &DomainVerdict);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl VerificationProgress for NoProgress {
    fn on_agent_start(&self, _agent: AgentKind, _total_providers: usize) {}
    fn on_provider_complete(&self, _agent: AgentKind, _provider: &str, _degraded: bool) {}
    fn on_agent_complete(&self, _agent: AgentKind, _verdict: &DomainVerdict) {}
}
