//! Source fetcher port

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Failed to read body: {0}")]
    Body(String),
}

/// What a fetch observed about a source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedSource {
    pub status_code: u16,
    pub response_time_ms: u64,
    /// Readable text extracted from the body
    pub text: String,
    /// Size of the raw body in bytes
    pub raw_len: usize,
    pub content_type: Option<String>,
}

/// Fetch a candidate source
///
/// A non-success HTTP status is not an error: it is reported through
/// `status_code`. Errors mean the source could not be reached at all.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<FetchedSource, FetchError>;
}
