//! HTTP source fetcher backed by `reqwest`

use super::html::{html_to_text, is_html};
use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;
use verity_application::ports::source_fetcher::{FetchError, FetchedSource, SourceFetcher};

/// Maximum response body size (5 MB)
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

const DEFAULT_USER_AGENT: &str = concat!("Verity/", env!("CARGO_PKG_VERSION"), " (Source Verifier)");

/// Fetches candidate sources over HTTP(S)
///
/// The caller applies the fetch deadline; this adapter only reports what it
/// observed. Non-success statuses are returned as data, not errors.
pub struct HttpSourceFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpSourceFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for HttpSourceFetcher {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch(&self, uri: &str) -> Result<FetchedSource, FetchError> {
        let url = parse_http_url(uri)?;
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if response
            .content_length()
            .is_some_and(|len| len > MAX_BODY_SIZE as u64)
        {
            return Err(FetchError::Body(format!(
                "response exceeds {} bytes",
                MAX_BODY_SIZE
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        let raw = String::from_utf8_lossy(&body[..body.len().min(MAX_BODY_SIZE)]);
        let text = if is_html(content_type.as_deref()) {
            html_to_text(&raw)
        } else {
            raw.trim().to_string()
        };

        debug!(
            uri,
            status_code,
            response_time_ms,
            "Fetched source ({} bytes, {} chars of text)",
            body.len(),
            text.len()
        );

        Ok(FetchedSource {
            status_code,
            response_time_ms,
            text,
            raw_len: body.len(),
            content_type,
        })
    }
}

/// Parse an absolute http(s) URL
fn parse_http_url(uri: &str) -> Result<url::Url, FetchError> {
    let url = url::Url::parse(uri.trim()).map_err(|e| FetchError::InvalidUri(format!("{}: {}", uri, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUri(format!(
            "{}: unsupported scheme '{}'",
            uri, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_url() {
        assert!(parse_http_url("https://example.org/page").is_ok());
        assert!(parse_http_url("  http://example.org  ").is_ok());
        assert!(matches!(
            parse_http_url("ftp://example.org/file"),
            Err(FetchError::InvalidUri(msg)) if msg.contains("unsupported scheme")
        ));
        assert!(matches!(
            parse_http_url("not a url"),
            Err(FetchError::InvalidUri(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_uri_fails_without_network() {
        let fetcher = HttpSourceFetcher::default();
        let err = fetcher.fetch("mailto:someone@example.org").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUri(_)));
    }

    #[test]
    fn test_default_user_agent() {
        let fetcher = HttpSourceFetcher::default().with_user_agent("custom/1.0");
        assert_eq!(fetcher.user_agent, "custom/1.0");
        assert!(DEFAULT_USER_AGENT.starts_with("Verity/"));
    }
}
