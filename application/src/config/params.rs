//! Engine parameters, one group per concern.
//!
//! Every default reproduces the documented engine constants. These are
//! application-layer settings; the decision rules they parameterize live in
//! the domain layer.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use verity_domain::{
    FactorThresholds, HallucinationRule, InformationPolicy, SourceScoring, TargetAccuracy,
};

/// Default time budget for a single check provider.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Information verification parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InformationParams {
    pub policy: InformationPolicy,
    /// Time budget for the semantic and factual providers
    pub provider_timeout: Duration,
    /// Maximum sources proposed by discovery when none are supplied
    pub discovery_limit: usize,
}

impl Default for InformationParams {
    fn default() -> Self {
        Self {
            policy: InformationPolicy::default(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            discovery_limit: 3,
        }
    }
}

/// Hallucination detection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionParams {
    pub rule: HallucinationRule,
    pub thresholds: FactorThresholds,
    pub provider_timeout: Duration,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            rule: HallucinationRule::default(),
            thresholds: FactorThresholds::default(),
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// Source verification parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceParams {
    pub scoring: SourceScoring,
    /// Time budget for fetching one source
    pub fetch_timeout: Duration,
}

impl Default for SourceParams {
    fn default() -> Self {
        Self {
            scoring: SourceScoring::default(),
            fetch_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// Batch parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchParams {
    /// Concurrency cap used when a batch does not set `maxConcurrency`
    pub max_concurrency: usize,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self { max_concurrency: 8 }
    }
}

/// Result cache parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheParams {
    /// TTL hint for stored results; a request's `cacheTtlSecs` wins
    pub ttl: Option<Duration>,
}

/// Metrics parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsParams {
    pub target_accuracy: TargetAccuracy,
    /// Publish a metrics snapshot after every completed request
    pub publish_after_request: bool,
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            target_accuracy: TargetAccuracy::default(),
            publish_after_request: true,
        }
    }
}
