//! Verification request value objects

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Default sensitivity used by check providers when the caller sets none.
pub const DEFAULT_SENSITIVITY: f64 = 0.5;

/// The kind of verification a caller asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Is the claim adequately supported by evidence?
    Information,
    /// Does the content contain fabricated claims?
    Hallucination,
    /// How credible are the candidate sources?
    Sources,
    /// Information and hallucination checks on the same content
    Combined,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Information => "information",
            RequestKind::Hallucination => "hallucination",
            RequestKind::Sources => "sources",
            RequestKind::Combined => "combined",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "information" | "info" => Ok(RequestKind::Information),
            "hallucination" | "detect" => Ok(RequestKind::Hallucination),
            "sources" | "source" => Ok(RequestKind::Sources),
            "combined" | "both" => Ok(RequestKind::Combined),
            other => Err(DomainError::UnknownKind(other.to_string())),
        }
    }
}

/// Recognized request options
///
/// Field names follow the camelCase wire names (`cacheResults`, `timeoutMs`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptions {
    /// Consult and populate the result cache (information verification only;
    /// hallucination detection always caches)
    pub cache_results: bool,
    /// Require a stricter confidence before a claim counts as verified
    pub strict_mode: bool,
    /// Whole-request deadline in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Provider sensitivity in [0, 1]; higher flags more eagerly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<f64>,
    /// Restrict which check providers run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_providers: Option<BTreeSet<String>>,
    /// Batch concurrency cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    /// TTL hint forwarded to the cache store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,
}

impl RequestOptions {
    pub fn with_cache(mut self) -> Self {
        self.cache_results = true;
        self
    }

    pub fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }

    pub fn with_enabled_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_providers = Some(providers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = Some(max);
        self
    }

    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = Some(secs);
        self
    }

    /// Switch off `disabled` providers
    ///
    /// An explicit enabled set loses the disabled names. Without one, every
    /// name in `known` except the disabled ones becomes the enabled set.
    pub fn without_providers(mut self, known: &[&str], disabled: &[String]) -> Self {
        if disabled.is_empty() {
            return self;
        }
        let enabled = match self.enabled_providers.take() {
            Some(set) => set.into_iter().filter(|p| !disabled.contains(p)).collect(),
            None => known
                .iter()
                .filter(|p| !disabled.iter().any(|d| d == *p))
                .map(|p| p.to_string())
                .collect(),
        };
        self.enabled_providers = Some(enabled);
        self
    }

    /// Effective sensitivity (default when unset)
    pub fn sensitivity(&self) -> f64 {
        self.sensitivity.unwrap_or(DEFAULT_SENSITIVITY)
    }

    /// Whether the named provider should run for this request
    pub fn is_provider_enabled(&self, provider: &str) -> bool {
        self.enabled_providers
            .as_ref()
            .is_none_or(|set| set.contains(provider))
    }

    /// Validate option ranges
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(s) = self.sensitivity
            && !(0.0..=1.0).contains(&s)
        {
            return Err(DomainError::SensitivityOutOfRange(s));
        }
        if self.timeout_ms == Some(0) {
            return Err(DomainError::ZeroTimeout);
        }
        if self.max_concurrency == Some(0) {
            return Err(DomainError::ZeroConcurrency);
        }
        Ok(())
    }
}

/// A verification request (Value Object)
///
/// Immutable once created: all mutation happens through consuming builder
/// methods before the request is handed to the orchestrator.
///
/// # Example
///
/// ```
/// use verity_domain::core::request::{RequestOptions, VerificationRequest};
///
/// let request = VerificationRequest::new("The Eiffel Tower is in Paris.")
///     .unwrap()
///     .with_sources(["https://en.wikipedia.org/wiki/Eiffel_Tower"])
///     .with_options(RequestOptions::default().with_cache());
///
/// assert_eq!(request.sources().len(), 1);
/// assert!(request.options().cache_results);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sources: Vec<String>,
    #[serde(default = "default_requester")]
    requester: String,
    #[serde(default)]
    options: RequestOptions,
}

fn default_requester() -> String {
    "anonymous".to_string()
}

impl VerificationRequest {
    /// Create a new request, rejecting empty content
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyContent);
        }
        Ok(Self {
            content,
            context: None,
            sources: Vec::new(),
            requester: default_requester(),
            options: RequestOptions::default(),
        })
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = requester.into();
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply [`RequestOptions::without_providers`] to this request's options
    pub fn without_providers(mut self, known: &[&str], disabled: &[String]) -> Self {
        self.options = self.options.without_providers(known, disabled);
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn requester(&self) -> &str {
        &self.requester
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Re-check invariants.
    ///
    /// Deserialized requests bypass [`VerificationRequest::new`], so the
    /// orchestrator validates every request before dispatching it.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.content.trim().is_empty() {
            return Err(DomainError::EmptyContent);
        }
        self.options.validate()
    }
}
