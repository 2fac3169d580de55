//! Result cache port

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use verity_domain::{Fingerprint, VerificationResult};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache entry could not be encoded: {0}")]
    Encoding(String),
}

/// Store of verification results keyed by request fingerprint
///
/// Only single-key atomicity is assumed. The orchestrator treats every error
/// as a cache miss.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &Fingerprint) -> Result<Option<VerificationResult>, CacheError>;

    /// Store a result; `ttl` is a hint the store may ignore
    async fn set(
        &self,
        key: &Fingerprint,
        result: &VerificationResult,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;
}

/// Cache that never stores anything
pub struct NoCache;

#[async_trait]
impl ResultCache for NoCache {
    async fn get(&self, _key: &Fingerprint) -> Result<Option<VerificationResult>, CacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &Fingerprint,
        _result: &VerificationResult,
        _ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        Ok(())
    }
}
