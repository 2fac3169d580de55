//! Provider panel execution
//!
//! Runs every provider of an agent concurrently and collects exactly one vote
//! per provider. Failures never propagate: a provider that errors, times out,
//! panics, returns malformed output or is disabled for the request is
//! replaced by a missing vote.

use crate::ports::check_provider::{CheckInput, CheckProvider, ProviderError};
use crate::ports::progress::VerificationProgress;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use verity_domain::{AgentKind, ProviderVote, VerificationRequest};

/// The check providers of one agent, in vote order
pub struct ProviderPanel {
    agent: AgentKind,
    providers: Vec<Arc<dyn CheckProvider>>,
    timeout: Duration,
}

impl ProviderPanel {
    pub fn new(agent: AgentKind, providers: Vec<Arc<dyn CheckProvider>>, timeout: Duration) -> Self {
        Self {
            agent,
            providers,
            timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Initialize every provider concurrently, returning the failures
    pub async fn initialize(&self) -> Vec<(String, ProviderError)> {
        let results = futures::future::join_all(self.providers.iter().map(|provider| async move {
            (provider.name().to_string(), provider.initialize().await)
        }))
        .await;

        results
            .into_iter()
            .filter_map(|(name, result)| result.err().map(|e| (name, e)))
            .collect()
    }

    /// Query all providers in parallel
    ///
    /// Returns one vote per provider, in panel order, regardless of completion
    /// order.
    pub async fn run(
        &self,
        request: &VerificationRequest,
        progress: &dyn VerificationProgress,
    ) -> Vec<ProviderVote> {
        let options = request.options();
        let input = CheckInput::new(request.content(), options.sensitivity(), self.timeout)
            .with_context(request.context().cloned());

        progress.on_agent_start(self.agent, self.providers.len());

        let mut slots: Vec<Option<ProviderVote>> = vec![None; self.providers.len()];
        let mut join_set = JoinSet::new();

        for (index, provider) in self.providers.iter().enumerate() {
            if !options.is_provider_enabled(provider.name()) {
                debug!(agent = %self.agent, provider = provider.name(), "Provider disabled for request");
                let vote = ProviderVote::missing(provider.name(), "not enabled for this request");
                progress.on_provider_complete(self.agent, provider.name(), true);
                slots[index] = Some(vote);
                continue;
            }

            let provider = Arc::clone(provider);
            let input = input.clone();
            let timeout = self.timeout;

            join_set.spawn(async move {
                let result = Self::evaluate(provider.as_ref(), &input, timeout).await;
                (index, provider.name().to_string(), result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, name, Ok(vote))) => {
                    debug!(agent = %self.agent, provider = %name, "Provider voted");
                    progress.on_provider_complete(self.agent, &name, false);
                    slots[index] = Some(vote);
                }
                Ok((index, name, Err(e))) => {
                    warn!(agent = %self.agent, provider = %name, "Degraded provider: {}", e);
                    progress.on_provider_complete(self.agent, &name, true);
                    slots[index] = Some(ProviderVote::missing(name, e));
                }
                Err(e) => {
                    warn!(agent = %self.agent, "Provider task join error: {}", e);
                }
            }
        }

        let votes: Vec<ProviderVote> = slots
            .into_iter()
            .zip(&self.providers)
            .map(|(slot, provider)| {
                slot.unwrap_or_else(|| {
                    warn!(agent = %self.agent, provider = provider.name(), "Degraded provider: task aborted");
                    progress.on_provider_complete(self.agent, provider.name(), true);
                    ProviderVote::missing(provider.name(), ProviderError::Aborted("task panicked".to_string()))
                })
            })
            .collect();

        let degraded = votes.iter().filter(|v| v.degraded).count();
        info!(
            agent = %self.agent,
            "Collected {} votes ({} degraded)",
            votes.len(),
            degraded
        );
        votes
    }

    /// Evaluate one provider under its deadline and check the output
    async fn evaluate(
        provider: &dyn CheckProvider,
        input: &CheckInput,
        timeout: Duration,
    ) -> Result<ProviderVote, ProviderError> {
        let mut vote = tokio::time::timeout(timeout, provider.evaluate(input))
            .await
            .map_err(|_| ProviderError::Timeout(timeout.as_millis() as u64))??;

        if !vote.is_well_formed() {
            return Err(ProviderError::Malformed(format!(
                "confidence {} out of range",
                vote.confidence
            )));
        }
        if vote.provider != provider.name() {
            vote.provider = provider.name().to_string();
        }
        Ok(vote)
    }
}
