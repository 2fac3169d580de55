//! Check Provider port
//!
//! A check provider is an independent scoring function that contributes one
//! vote to an agent's verdict.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use verity_domain::ProviderVote;

/// Errors a check provider can raise
///
/// None of these reach the caller: the agent substitutes a missing vote.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error("initialization failed: {0}")]
    Initialization(String),

    #[error("evaluation failed: {0}")]
    Failed(String),

    #[error("malformed output: {0}")]
    Malformed(String),

    #[error("task aborted: {0}")]
    Aborted(String),
}

/// Input handed to every provider of a panel
///
/// Cheap to clone so each concurrently running provider owns a copy.
#[derive(Debug, Clone)]
pub struct CheckInput {
    pub content: Arc<str>,
    /// Opaque caller context, passed through unmodified
    pub context: Option<Arc<Value>>,
    /// Provider sensitivity in [0, 1]
    pub sensitivity: f64,
    /// Time budget granted to each provider
    pub deadline: Duration,
}

impl CheckInput {
    pub fn new(content: impl Into<Arc<str>>, sensitivity: f64, deadline: Duration) -> Self {
        Self {
            content: content.into(),
            context: None,
            sensitivity,
            deadline,
        }
    }

    pub fn with_context(mut self, context: Option<Value>) -> Self {
        self.context = context.map(Arc::new);
        self
    }

    pub fn context(&self) -> Option<&Value> {
        self.context.as_deref()
    }
}

/// Independent scoring function contributing one vote
///
/// Implementations live in the infrastructure layer. They must be safe to call
/// concurrently from several requests.
#[async_trait]
pub trait CheckProvider: Send + Sync {
    /// Stable provider name used in votes and `enabledProviders`
    fn name(&self) -> &str;

    /// Load whatever the provider needs before serving requests
    async fn initialize(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Score the content
    async fn evaluate(&self, input: &CheckInput) -> Result<ProviderVote, ProviderError>;
}
