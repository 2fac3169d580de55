//! Shared helpers for use cases.

use crate::ports::check_provider::ProviderError;
use crate::use_cases::agent_manager::AgentError;
use std::time::Instant;
use tracing::warn;
use verity_domain::AgentKind;

/// Convert provider initialization failures into an agent readiness result.
///
/// Every failure is logged; the first one is reported.
pub(crate) fn readiness(
    agent: AgentKind,
    failures: Vec<(String, ProviderError)>,
) -> Result<(), AgentError> {
    for (provider, error) in &failures {
        warn!(agent = %agent, provider = %provider, "Provider initialization failed: {}", error);
    }
    match failures.into_iter().next() {
        Some((provider, error)) => Err(AgentError::ProviderInit {
            provider,
            reason: error.to_string(),
        }),
        None => Ok(()),
    }
}

/// Milliseconds elapsed since `start`.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
