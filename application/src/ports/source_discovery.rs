//! Source discovery port
//!
//! Used when a request carries no candidate sources.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Discovery failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait SourceDiscovery: Send + Sync {
    /// Propose up to `limit` candidate source URIs for the content
    async fn discover(&self, content: &str, limit: usize) -> Result<Vec<String>, DiscoveryError>;
}

/// Discovery that never proposes anything
pub struct NoDiscovery;

#[async_trait]
impl SourceDiscovery for NoDiscovery {
    async fn discover(&self, _content: &str, _limit: usize) -> Result<Vec<String>, DiscoveryError> {
        Ok(Vec::new())
    }
}
