//! External evidence detector
//!
//! With an endpoint configured, the content is posted to a remote
//! fact-checking service and its verdict is taken as the vote. Without one,
//! the detector checks that the specific names and figures in the content
//! are backed by the caller's context.

use super::analysis::{TextAnalyzer, context_text, specifics};
use super::risk_vote;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use verity_application::ports::check_provider::{CheckInput, CheckProvider, ProviderError};
use verity_domain::ProviderVote;

pub const EXTERNAL_DETECTOR: &str = "external";

#[derive(Debug, Serialize)]
struct ExternalCheckRequest<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a Value>,
    sensitivity: f64,
}

/// Response body expected from the remote service
#[derive(Debug, Deserialize)]
struct ExternalCheckResponse {
    is_hallucination: bool,
    confidence: f64,
    #[serde(default)]
    rationale: Option<String>,
}

pub struct ExternalDetector {
    client: reqwest::Client,
    endpoint: Option<String>,
    analyzer: Arc<TextAnalyzer>,
}

impl ExternalDetector {
    pub fn new(analyzer: Arc<TextAnalyzer>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: None,
            analyzer,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn ask_service(
        &self,
        endpoint: &str,
        input: &CheckInput,
    ) -> Result<ProviderVote, ProviderError> {
        let body = ExternalCheckRequest {
            content: &input.content,
            context: input.context(),
            sensitivity: input.sensitivity,
        };

        debug!(endpoint, "Requesting external check");
        let response = self
            .client
            .post(endpoint)
            .timeout(input.deadline)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(input.deadline.as_millis() as u64)
                } else {
                    ProviderError::Failed(format!("request to {} failed: {}", endpoint, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Failed(format!(
                "{} returned HTTP {}",
                endpoint,
                status.as_u16()
            )));
        }

        let parsed: ExternalCheckResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        if !parsed.confidence.is_finite() {
            return Err(ProviderError::Malformed(
                "confidence is not a number".to_string(),
            ));
        }

        let rationale = parsed
            .rationale
            .unwrap_or_else(|| "external service verdict".to_string());
        Ok(if parsed.is_hallucination {
            ProviderVote::positive(EXTERNAL_DETECTOR, parsed.confidence, rationale)
        } else {
            ProviderVote::negative(EXTERNAL_DETECTOR, parsed.confidence, rationale)
        })
    }

    /// Check specific names and figures against the context
    fn check_evidence(&self, input: &CheckInput) -> ProviderVote {
        let Some(context) = input.context() else {
            return ProviderVote::negative(
                EXTERNAL_DETECTOR,
                0.5,
                "no external evidence available",
            );
        };

        let claimed = specifics(&input.content);
        if claimed.is_empty() {
            let rationale = if self.analyzer.has_attribution(&input.content) {
                "content cites its sources"
            } else {
                "no specific claims to check"
            };
            return ProviderVote::negative(EXTERNAL_DETECTOR, 0.6, rationale);
        }

        let evidence = specifics(&context_text(context));
        let unsupported: Vec<&String> = claimed.iter().filter(|s| !evidence.contains(*s)).collect();
        let risk = unsupported.len() as f64 / claimed.len() as f64;

        let rationale = if unsupported.is_empty() {
            "all specific claims appear in context".to_string()
        } else {
            let listed: Vec<&str> = unsupported.iter().take(5).map(|s| s.as_str()).collect();
            format!("unsupported by context: {}", listed.join(", "))
        };
        risk_vote(EXTERNAL_DETECTOR, risk, input.sensitivity, rationale)
    }
}

#[async_trait]
impl CheckProvider for ExternalDetector {
    fn name(&self) -> &str {
        EXTERNAL_DETECTOR
    }

    async fn initialize(&self) -> Result<(), ProviderError> {
        if let Some(endpoint) = &self.endpoint {
            let url = url::Url::parse(endpoint).map_err(|e| {
                ProviderError::Initialization(format!("invalid endpoint '{}': {}", endpoint, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ProviderError::Initialization(format!(
                    "endpoint '{}' must use http or https",
                    endpoint
                )));
            }
        }
        Ok(())
    }

    async fn evaluate(&self, input: &CheckInput) -> Result<ProviderVote, ProviderError> {
        match &self.endpoint {
            Some(endpoint) => self.ask_service(endpoint, input).await,
            None => Ok(self.check_evidence(input)),
        }
    }
}
