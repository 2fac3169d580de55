//! Engine configuration container.
//!
//! [`EngineConfig`] groups the per-concern parameter types. The orchestrator
//! holds the full container; each agent receives only the slice it needs.
//!
//! | Type | Information agent | Hallucination agent | Orchestrator |
//! |------|-------------------|---------------------|--------------|
//! | `InformationParams` | Yes | No | No |
//! | `DetectionParams` | No | Yes | No |
//! | `SourceParams` | Yes | No | Yes (sources) |
//! | `BatchParams` | No | No | Yes |
//! | `CacheParams` | No | No | Yes |
//! | `MetricsParams` | No | No | Yes |

use super::params::{
    BatchParams, CacheParams, DetectionParams, InformationParams, MetricsParams, SourceParams,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub information: InformationParams,
    pub detection: DetectionParams,
    pub sources: SourceParams,
    pub batch: BatchParams,
    pub cache: CacheParams,
    pub metrics: MetricsParams,
}

impl EngineConfig {
    // ==================== Builder Methods ====================

    pub fn with_information(mut self, params: InformationParams) -> Self {
        self.information = params;
        self
    }

    pub fn with_detection(mut self, params: DetectionParams) -> Self {
        self.detection = params;
        self
    }

    pub fn with_sources(mut self, params: SourceParams) -> Self {
        self.sources = params;
        self
    }

    pub fn with_batch_concurrency(mut self, max: usize) -> Self {
        self.batch.max_concurrency = max;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache.ttl = ttl;
        self
    }

    /// Apply one time budget to every provider and source fetch
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.information.provider_timeout = timeout;
        self.detection.provider_timeout = timeout;
        self.sources.fetch_timeout = timeout;
        self
    }

    pub fn with_metrics_publishing(mut self, enabled: bool) -> Self {
        self.metrics.publish_after_request = enabled;
        self
    }
}
