//! Verification Orchestrator
//!
//! Public entry point of the engine. Validates requests, dispatches them to
//! the relevant agent(s), merges verdicts, applies the result cache and keeps
//! the rolling system metrics.
//!
//! # Flow
//!
//! ```text
//! request ─→ validate ─→ cache lookup ──hit──→ copy with fresh request id
//!                             │ miss
//!                             ↓
//!                   dispatch under optional deadline
//!             ┌───────────────┼────────────────┐
//!        information     hallucination      sources
//!             └───────────────┼────────────────┘
//!                             ↓
//!            merge (min confidence) ─→ cache store ─→ metrics
//! ```
//!
//! Cache and telemetry are best-effort side channels: their failures are
//! logged and never change a verdict.

use crate::config::EngineConfig;
use crate::ports::progress::{NoProgress, VerificationProgress};
use crate::ports::result_cache::{NoCache, ResultCache};
use crate::ports::telemetry_sink::{NoTelemetry, TelemetrySink, TelemetrySnapshot};
use crate::use_cases::agent_manager::AgentManager;
use crate::use_cases::detect_hallucination::HallucinationDetectorAgent;
use crate::use_cases::metrics::MetricsTracker;
use crate::use_cases::shared::elapsed_ms;
use crate::use_cases::verify_information::InformationVerifierAgent;
use crate::use_cases::verify_sources::SourceVerifier;
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use verity_domain::{
    AgentKind, BatchItem, BatchItemResult, BatchRequest, BatchResult, DomainError, DomainVerdict,
    Fingerprint, RequestKind, SystemHealth, SystemMetrics, VerificationRequest,
    VerificationResult,
};

/// Errors surfaced to callers of the orchestrator
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    #[error("Agent '{agent}' unavailable: {reason}")]
    AgentUnavailable { agent: AgentKind, reason: String },

    #[error("Verification timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VerificationError {
    /// True when the caller sent something unusable
    pub fn is_client_error(&self) -> bool {
        matches!(self, VerificationError::InvalidRequest(_))
    }
}

/// Verdicts produced by a dispatch, with the agents involved
type Dispatched = (Vec<DomainVerdict>, Vec<String>);

pub struct VerificationOrchestrator {
    information: Arc<InformationVerifierAgent>,
    detector: Arc<HallucinationDetectorAgent>,
    sources: Arc<SourceVerifier>,
    manager: AgentManager,
    cache: Arc<dyn ResultCache>,
    telemetry: Arc<dyn TelemetrySink>,
    progress: Arc<dyn VerificationProgress>,
    metrics: MetricsTracker,
    config: EngineConfig,
}

impl VerificationOrchestrator {
    /// Create an orchestrator without cache, telemetry or progress reporting
    ///
    /// Both agents are registered with the agent manager but stay
    /// uninitialized until [`initialize`](Self::initialize) is called.
    pub fn new(
        information: Arc<InformationVerifierAgent>,
        detector: Arc<HallucinationDetectorAgent>,
        sources: Arc<SourceVerifier>,
        config: EngineConfig,
    ) -> Self {
        let mut manager = AgentManager::new();
        manager.register(information.clone());
        manager.register(detector.clone());

        Self {
            information,
            detector,
            sources,
            manager,
            cache: Arc::new(NoCache),
            telemetry: Arc::new(NoTelemetry),
            progress: Arc::new(NoProgress),
            metrics: MetricsTracker::new(config.metrics.target_accuracy),
            config,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn VerificationProgress>) -> Self {
        self.progress = progress;
        self
    }

    // ==================== Accessors ====================

    pub fn manager(&self) -> &AgentManager {
        &self.manager
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ==================== Lifecycle ====================

    /// Initialize every agent; agents that fail stay out of service
    pub async fn initialize(&self) -> SystemHealth {
        debug!(
            providers = ?self.information.provider_names(),
            "Information verifier panel"
        );
        debug!(
            providers = ?self.detector.provider_names(),
            "Hallucination detector panel"
        );
        let results = self.manager.initialize_all().await;
        let ready = results.iter().filter(|(_, r)| r.is_ok()).count();
        info!("Initialized {}/{} agents", ready, results.len());
        self.manager.aggregate_health()
    }

    // ==================== Verification ====================

    /// Verify a claim against evidence
    ///
    /// Consults the cache only when `cacheResults` is set.
    pub async fn verify_information(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationResult, VerificationError> {
        self.execute(RequestKind::Information, request).await
    }

    /// Detect fabricated claims; results are always cached
    pub async fn detect_hallucination(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationResult, VerificationError> {
        self.execute(RequestKind::Hallucination, request).await
    }

    /// Score the supplied sources only
    pub async fn verify_sources(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationResult, VerificationError> {
        self.execute(RequestKind::Sources, request).await
    }

    /// Run information verification and hallucination detection concurrently
    pub async fn verify_combined(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationResult, VerificationError> {
        self.execute(RequestKind::Combined, request).await
    }

    /// Dispatch by request kind
    pub async fn verify(
        &self,
        kind: RequestKind,
        request: VerificationRequest,
    ) -> Result<VerificationResult, VerificationError> {
        self.execute(kind, request).await
    }

    /// Verify a heterogeneous batch
    ///
    /// Items run concurrently up to the concurrency cap. Results come back in
    /// input order and a failing item never fails the batch.
    pub async fn batch_verify(&self, batch: BatchRequest) -> Result<BatchResult, VerificationError> {
        let cap = batch
            .options
            .max_concurrency
            .unwrap_or(self.config.batch.max_concurrency);
        if cap == 0 {
            return Err(DomainError::ZeroConcurrency.into());
        }

        let started = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(
            batch_id = %batch_id,
            "Starting batch of {} items (concurrency {})",
            batch.items.len(),
            cap
        );

        let items: Vec<BatchItemResult> = futures::stream::iter(batch.items.into_iter().enumerate())
            .map(|(index, item)| self.batch_item(index, item))
            .buffered(cap)
            .collect()
            .await;

        let result = BatchResult::new(batch_id, items, elapsed_ms(started));
        info!(
            batch_id = %result.batch_id,
            "Batch complete: {}/{} succeeded",
            result.summary.succeeded,
            result.summary.total
        );
        Ok(result)
    }

    // ==================== Health & Metrics ====================

    /// Aggregate agent health; never fails
    pub fn get_system_health(&self) -> SystemHealth {
        let health = self.manager.aggregate_health();
        self.publish(TelemetrySnapshot::Health(health.clone()));
        health
    }

    /// Re-run every agent's health check, then aggregate
    pub async fn check_health(&self) -> SystemHealth {
        let health = self.manager.run_health_checks().await;
        self.publish(TelemetrySnapshot::Health(health.clone()));
        health
    }

    pub fn get_system_metrics(&self) -> SystemMetrics {
        self.metrics.snapshot()
    }

    // ==================== Internals ====================

    async fn execute(
        &self,
        kind: RequestKind,
        request: VerificationRequest,
    ) -> Result<VerificationResult, VerificationError> {
        request.validate()?;

        let started = Instant::now();
        let request_id = Uuid::new_v4().to_string();
        let fingerprint = self
            .uses_cache(kind, &request)
            .then(|| Fingerprint::of(kind, &request));

        if let Some(key) = &fingerprint
            && let Some(cached) = self.cache_lookup(key).await
        {
            debug!(request_id = %request_id, fingerprint = %key, "Cache hit");
            self.metrics.record_cache_hit();
            self.complete(elapsed_ms(started), true);
            return Ok(cached.reissued(request_id));
        }

        let outcome = match request.options().timeout_ms {
            Some(after_ms) => {
                match tokio::time::timeout(
                    Duration::from_millis(after_ms),
                    self.dispatch(kind, &request),
                )
                .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(request_id = %request_id, "Request deadline exceeded after {}ms", after_ms);
                        for agent in agents_for(kind) {
                            self.manager.record_outcome(*agent, after_ms, false);
                        }
                        Err(VerificationError::Timeout { after_ms })
                    }
                }
            }
            None => self.dispatch(kind, &request).await,
        };

        let processing_ms = elapsed_ms(started);
        self.complete(processing_ms, outcome.is_ok());
        let (verdicts, agents) = outcome?;

        let result = VerificationResult::new(request_id, kind, verdicts, agents, processing_ms);
        info!(
            request_id = %result.request_id,
            "{} verification complete in {}ms (confidence {:.2})",
            kind,
            processing_ms,
            result.unified_confidence
        );

        if let Some(key) = &fingerprint {
            self.cache_store(key, &result, &request).await;
        }
        Ok(result)
    }

    async fn dispatch(
        &self,
        kind: RequestKind,
        request: &VerificationRequest,
    ) -> Result<Dispatched, VerificationError> {
        for agent in agents_for(kind) {
            self.ensure_ready(*agent)?;
        }
        let progress = self.progress.as_ref();

        let verdicts = match kind {
            RequestKind::Information => vec![
                self.timed(
                    AgentKind::InformationVerifier,
                    self.information.verify(request, progress),
                )
                .await,
            ],
            RequestKind::Hallucination => vec![
                self.timed(
                    AgentKind::HallucinationDetector,
                    self.detector.detect(request, progress),
                )
                .await,
            ],
            RequestKind::Sources => vec![
                self.timed(AgentKind::InformationVerifier, self.sources.verdict(request))
                    .await,
            ],
            RequestKind::Combined => {
                let (information, hallucination) = tokio::join!(
                    self.timed(
                        AgentKind::InformationVerifier,
                        self.information.verify(request, progress)
                    ),
                    self.timed(
                        AgentKind::HallucinationDetector,
                        self.detector.detect(request, progress)
                    )
                );
                vec![information, hallucination]
            }
        };

        let agents = agents_for(kind)
            .iter()
            .map(|a| a.id().to_string())
            .collect();
        Ok((verdicts, agents))
    }

    async fn batch_item(&self, index: usize, item: BatchItem) -> BatchItemResult {
        let kind = match item.kind.parse::<RequestKind>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(index, "Batch item rejected: {}", e);
                return BatchItemResult::failed(index, item.kind, e.to_string());
            }
        };

        match self.execute(kind, item.request).await {
            Ok(result) => BatchItemResult::succeeded(index, item.kind, result),
            Err(e) => {
                warn!(index, "Batch item failed: {}", e);
                BatchItemResult::failed(index, item.kind, e.to_string())
            }
        }
    }

    fn ensure_ready(&self, agent: AgentKind) -> Result<(), VerificationError> {
        self.manager
            .ensure_ready(agent)
            .map_err(|e| VerificationError::AgentUnavailable {
                agent,
                reason: e.to_string(),
            })
    }

    /// Await an agent and report the outcome to the agent manager
    async fn timed(&self, agent: AgentKind, work: impl Future<Output = DomainVerdict>) -> DomainVerdict {
        let started = Instant::now();
        let verdict = work.await;
        self.manager.record_outcome(agent, elapsed_ms(started), true);
        verdict
    }

    fn uses_cache(&self, kind: RequestKind, request: &VerificationRequest) -> bool {
        match kind {
            RequestKind::Hallucination => true,
            RequestKind::Information | RequestKind::Sources | RequestKind::Combined => {
                request.options().cache_results
            }
        }
    }

    async fn cache_lookup(&self, key: &Fingerprint) -> Option<VerificationResult> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(fingerprint = %key, "Cache lookup failed, treating as miss: {}", e);
                None
            }
        }
    }

    async fn cache_store(&self, key: &Fingerprint, result: &VerificationResult, request: &VerificationRequest) {
        let ttl = request
            .options()
            .cache_ttl_secs
            .map(Duration::from_secs)
            .or(self.config.cache.ttl);
        if let Err(e) = self.cache.set(key, result, ttl).await {
            warn!(fingerprint = %key, "Failed to store result in cache: {}", e);
        }
    }

    /// Fold a completed request into the metrics and publish them
    fn complete(&self, duration_ms: u64, success: bool) {
        let snapshot = self.metrics.record(duration_ms, success);
        if self.config.metrics.publish_after_request {
            self.publish(TelemetrySnapshot::Metrics(snapshot));
        }
    }

    fn publish(&self, snapshot: TelemetrySnapshot) {
        if let Err(e) = self.telemetry.publish(&snapshot) {
            warn!("Failed to publish {} telemetry: {}", snapshot.kind(), e);
        }
    }
}

/// Agents involved in a request kind
fn agents_for(kind: RequestKind) -> &'static [AgentKind] {
    match kind {
        RequestKind::Information | RequestKind::Sources => &[AgentKind::InformationVerifier],
        RequestKind::Hallucination => &[AgentKind::HallucinationDetector],
        RequestKind::Combined => &[
            AgentKind::InformationVerifier,
            AgentKind::HallucinationDetector,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DetectionParams, InformationParams, SourceParams};
    use crate::ports::check_provider::{CheckInput, CheckProvider, ProviderError};
    use crate::ports::reputation::ReputationTable;
    use crate::ports::result_cache::CacheError;
    use crate::ports::risk_analyzer::NeutralRiskAnalyzer;
    use crate::ports::source_discovery::NoDiscovery;
    use crate::ports::source_fetcher::{FetchError, FetchedSource, SourceFetcher};
    use crate::ports::telemetry_sink::SinkError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use verity_domain::{
        BatchOutcome, HealthStatus, ProviderVote, RequestOptions, VerdictDomain,
    };

    // ==================== Mocks ====================

    /// Provider returning a fixed vote and counting invocations
    struct CountingProvider {
        name: String,
        vote: Box<dyn Fn(&str) -> ProviderVote + Send + Sync>,
        calls: Arc<AtomicUsize>,
        delay: Duration,
        pacing: Pacing,
        init_ok: bool,
    }

    /// Per-content delays and the order in which contents finished
    #[derive(Clone, Default)]
    struct Pacing {
        delays: &'static [(&'static str, u64)],
        finished: Arc<Mutex<Vec<String>>>,
    }

    impl Pacing {
        fn delay_for(&self, content: &str, fallback: Duration) -> Duration {
            self.delays
                .iter()
                .find(|(c, _)| *c == content)
                .map_or(fallback, |(_, ms)| Duration::from_millis(*ms))
        }
    }

    #[async_trait]
    impl CheckProvider for CountingProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn initialize(&self) -> Result<(), ProviderError> {
            if self.init_ok {
                Ok(())
            } else {
                Err(ProviderError::Initialization("weights not found".to_string()))
            }
        }

        async fn evaluate(&self, input: &CheckInput) -> Result<ProviderVote, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.pacing.delay_for(&input.content, self.delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.pacing.finished.lock().unwrap().push(input.content.to_string());
            Ok((self.vote)(&self.name))
        }
    }

    struct StaticFetcher;

    #[async_trait]
    impl SourceFetcher for StaticFetcher {
        async fn fetch(&self, _uri: &str) -> Result<FetchedSource, FetchError> {
            let text = "Peer reviewed findings from 2019 are cited here with references. ".repeat(80);
            Ok(FetchedSource {
                status_code: 200,
                response_time_ms: 3,
                raw_len: text.len(),
                text,
                content_type: Some("text/html".to_string()),
            })
        }
    }

    struct FlatReputation;

    impl ReputationTable for FlatReputation {
        fn reputation(&self, _domain: &str) -> f64 {
            0.9
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        entries: Mutex<HashMap<String, VerificationResult>>,
        ttls: Mutex<Vec<Option<Duration>>>,
    }

    #[async_trait]
    impl ResultCache for MemoryCache {
        async fn get(&self, key: &Fingerprint) -> Result<Option<VerificationResult>, CacheError> {
            Ok(self.entries.lock().unwrap().get(key.as_str()).cloned())
        }

        async fn set(
            &self,
            key: &Fingerprint,
            result: &VerificationResult,
            ttl: Option<Duration>,
        ) -> Result<(), CacheError> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.as_str().to_string(), result.clone());
            self.ttls.lock().unwrap().push(ttl);
            Ok(())
        }
    }

    struct BrokenCache;

    #[async_trait]
    impl ResultCache for BrokenCache {
        async fn get(&self, _key: &Fingerprint) -> Result<Option<VerificationResult>, CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set(
            &self,
            _key: &Fingerprint,
            _result: &VerificationResult,
            _ttl: Option<Duration>,
        ) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        kinds: Mutex<Vec<&'static str>>,
        fail: bool,
    }

    impl TelemetrySink for RecordingSink {
        fn publish(&self, snapshot: &TelemetrySnapshot) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Unavailable("disk full".to_string()));
            }
            self.kinds.lock().unwrap().push(snapshot.kind());
            Ok(())
        }
    }

    // ==================== Fixture ====================

    struct Fixture {
        orchestrator: VerificationOrchestrator,
        info_calls: Arc<AtomicUsize>,
        detect_calls: Arc<AtomicUsize>,
        finished: Arc<Mutex<Vec<String>>>,
    }

    struct Setup {
        info_score: f64,
        flags: usize,
        detector_delay: Duration,
        detector_init_ok: bool,
        delays: &'static [(&'static str, u64)],
    }

    impl Default for Setup {
        fn default() -> Self {
            Self {
                info_score: 0.9,
                flags: 0,
                detector_delay: Duration::ZERO,
                detector_init_ok: true,
                delays: &[],
            }
        }
    }

    fn provider(
        name: &str,
        calls: &Arc<AtomicUsize>,
        delay: Duration,
        pacing: &Pacing,
        init_ok: bool,
        vote: impl Fn(&str) -> ProviderVote + Send + Sync + 'static,
    ) -> Arc<dyn CheckProvider> {
        Arc::new(CountingProvider {
            name: name.to_string(),
            vote: Box::new(vote),
            calls: Arc::clone(calls),
            delay,
            pacing: pacing.clone(),
            init_ok,
        })
    }

    fn fixture(setup: Setup) -> Fixture {
        let info_calls = Arc::new(AtomicUsize::new(0));
        let detect_calls = Arc::new(AtomicUsize::new(0));
        let config = EngineConfig::default();
        let pacing = Pacing {
            delays: setup.delays,
            ..Pacing::default()
        };

        let sources = Arc::new(SourceVerifier::new(
            Arc::new(StaticFetcher),
            Arc::new(FlatReputation),
            Arc::new(NoDiscovery),
            &SourceParams::default(),
        ));

        let score = setup.info_score;
        let information = Arc::new(InformationVerifierAgent::new(
            provider("semantic_similarity", &info_calls, Duration::ZERO, &pacing, true, move |n| {
                ProviderVote::graded(n, score, 0.9, "")
            }),
            provider("fact_validation", &info_calls, Duration::ZERO, &pacing, true, move |n| {
                ProviderVote::graded(n, score, 0.9, "")
            }),
            Arc::clone(&sources),
            &InformationParams::default(),
        ));

        let names = ["semantic", "pattern", "contradiction", "factual", "ensemble", "external"];
        let detectors = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let flag = i < setup.flags;
                provider(name, &detect_calls, setup.detector_delay, &pacing, setup.detector_init_ok, move |n| {
                    if flag {
                        ProviderVote::positive(n, 0.9, "flagged")
                    } else {
                        ProviderVote::negative(n, 0.9, "clean")
                    }
                })
            })
            .collect();
        let detector = Arc::new(HallucinationDetectorAgent::new(
            detectors,
            Arc::new(NeutralRiskAnalyzer),
            &DetectionParams::default(),
        ));

        Fixture {
            orchestrator: VerificationOrchestrator::new(information, detector, sources, config),
            info_calls,
            detect_calls,
            finished: pacing.finished,
        }
    }

    async fn ready(setup: Setup) -> Fixture {
        let fixture = fixture(setup);
        fixture.orchestrator.initialize().await;
        fixture
    }

    fn request(content: &str) -> VerificationRequest {
        VerificationRequest::new(content).unwrap()
    }

    // ==================== Caching ====================

    #[tokio::test]
    async fn test_information_cache_round_trip() {
        let mut fx = ready(Setup::default()).await;
        let cache = Arc::new(MemoryCache::default());
        fx.orchestrator = fx.orchestrator.with_cache(cache.clone());

        let build = |requester: &str| {
            request("The Rhine flows into the North Sea")
                .with_sources(["https://rivers.example/rhine"])
                .with_requester(requester)
                .with_options(RequestOptions::default().with_cache())
        };

        let first = fx.orchestrator.verify_information(build("alice")).await.unwrap();
        let second = fx.orchestrator.verify_information(build("bob")).await.unwrap();

        assert_ne!(first.request_id, second.request_id);
        assert_eq!(second, first.reissued(second.request_id.clone()));
        assert_eq!(fx.info_calls.load(Ordering::SeqCst), 2);
        assert_eq!(fx.orchestrator.get_system_metrics().cache_hits, 1);
    }

    #[tokio::test]
    async fn test_information_without_cache_option_is_not_cached() {
        let mut fx = ready(Setup::default()).await;
        let cache = Arc::new(MemoryCache::default());
        fx.orchestrator = fx.orchestrator.with_cache(cache.clone());

        fx.orchestrator.verify_information(request("claim")).await.unwrap();
        fx.orchestrator.verify_information(request("claim")).await.unwrap();

        assert_eq!(fx.info_calls.load(Ordering::SeqCst), 4);
        assert!(cache.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detection_always_caches() {
        let mut fx = ready(Setup::default()).await;
        let cache = Arc::new(MemoryCache::default());
        fx.orchestrator = fx.orchestrator.with_cache(cache.clone());

        let opts = RequestOptions::default().with_cache_ttl_secs(30);
        fx.orchestrator
            .detect_hallucination(request("Napoleon was tall").with_options(opts))
            .await
            .unwrap();
        fx.orchestrator
            .detect_hallucination(request("Napoleon was tall"))
            .await
            .unwrap();

        assert_eq!(fx.detect_calls.load(Ordering::SeqCst), 6);
        assert_eq!(*cache.ttls.lock().unwrap(), vec![Some(Duration::from_secs(30))]);
    }

    #[tokio::test]
    async fn test_broken_cache_still_verifies() {
        let mut fx = ready(Setup { flags: 5, ..Setup::default() }).await;
        fx.orchestrator = fx.orchestrator.with_cache(Arc::new(BrokenCache));

        let result = fx
            .orchestrator
            .detect_hallucination(request("Fabricated quote"))
            .await
            .unwrap();
        assert!(result.verdicts[0].decision());
        assert_eq!(fx.orchestrator.get_system_metrics().successful_requests, 1);
    }

    // ==================== Dispatch ====================

    #[tokio::test]
    async fn test_combined_merge_is_conservative() {
        let fx = ready(Setup {
            info_score: 0.95,
            flags: 3,
            ..Setup::default()
        })
        .await;

        let result = fx
            .orchestrator
            .verify_combined(request("Mixed content").with_sources(["https://a.example"]))
            .await
            .unwrap();

        assert_eq!(result.verdicts.len(), 2);
        let info = result.verdict(VerdictDomain::InformationVerification).unwrap();
        let halluc = result.verdict(VerdictDomain::HallucinationDetection).unwrap();
        assert!(result.unified_confidence <= info.confidence());
        assert!(result.unified_confidence <= halluc.confidence());
        assert_eq!(result.agents, vec!["information_verifier", "hallucination_detector"]);
        assert!(!result.trustworthy);
    }

    #[tokio::test]
    async fn test_sources_only_skips_providers() {
        let fx = ready(Setup::default()).await;
        let result = fx
            .orchestrator
            .verify_sources(request("x").with_sources(["https://a.example", "https://b.example"]))
            .await
            .unwrap();

        assert_eq!(fx.info_calls.load(Ordering::SeqCst), 0);
        let verdict = result.verdict(VerdictDomain::SourceVerification).unwrap();
        assert_eq!(verdict.votes().len(), 2);
        assert!(verdict.decision());
    }

    #[tokio::test]
    async fn test_invalid_request_rejected_before_agents() {
        let fx = ready(Setup::default()).await;
        let bad: VerificationRequest = serde_json::from_value(json!({"content": "   "})).unwrap();

        let err = fx.orchestrator.verify_information(bad).await.unwrap_err();
        assert!(matches!(err, VerificationError::InvalidRequest(DomainError::EmptyContent)));

        let err = fx
            .orchestrator
            .detect_hallucination(request("x").with_options(RequestOptions::default().with_sensitivity(2.0)))
            .await
            .unwrap_err();
        assert!(err.is_client_error());

        assert_eq!(fx.info_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.detect_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.orchestrator.get_system_metrics().total_requests, 0);
    }

    #[tokio::test]
    async fn test_uninitialized_agent_is_unavailable() {
        let fx = fixture(Setup::default());
        let err = fx
            .orchestrator
            .detect_hallucination(request("x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VerificationError::AgentUnavailable {
                agent: AgentKind::HallucinationDetector,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_request_deadline_fails_whole_request() {
        let fx = ready(Setup {
            detector_delay: Duration::from_millis(500),
            ..Setup::default()
        })
        .await;

        let err = fx
            .orchestrator
            .detect_hallucination(request("slow").with_options(RequestOptions::default().with_timeout_ms(20)))
            .await
            .unwrap_err();
        assert!(matches!(err, VerificationError::Timeout { after_ms: 20 }));

        let metrics = fx.orchestrator.get_system_metrics();
        assert_eq!(metrics.failed_requests, 1);
        let record = fx
            .orchestrator
            .manager()
            .record(AgentKind::HallucinationDetector)
            .unwrap();
        assert_eq!(record.error_count, 1);
    }

    // ==================== Batch ====================

    #[tokio::test]
    async fn test_batch_isolates_failures_and_keeps_order() {
        let fx = ready(Setup {
            delays: &[("Claim one", 60), ("Claim three", 20), ("Claim five", 40)],
            ..Setup::default()
        })
        .await;
        fx.finished.lock().unwrap().clear();
        let batch: BatchRequest = serde_json::from_value(json!({
            "items": [
                {"kind": "information", "content": "Claim one"},
                {"kind": "telepathy", "content": "Claim two"},
                {"kind": "hallucination", "content": "Claim three"},
                {"kind": "sources", "content": "Claim four", "sources": ["https://a.example"]},
                {"kind": "hallucination", "content": ""},
                {"kind": "information", "content": "Claim five"}
            ],
            "options": {"maxConcurrency": 6}
        }))
        .unwrap();

        let result = fx.orchestrator.batch_verify(batch).await.unwrap();

        // slower items finished last yet results stay in submission order
        let finished = fx.finished.lock().unwrap().clone();
        let first_done = |content: &str| finished.iter().position(|c| c == content).unwrap();
        assert!(first_done("Claim three") < first_done("Claim five"));
        assert!(first_done("Claim five") < first_done("Claim one"));

        assert_eq!(result.items.len(), 6);
        for (i, item) in result.items.iter().enumerate() {
            assert_eq!(item.index, i);
        }
        assert!(matches!(
            &result.items[0].outcome,
            BatchOutcome::Succeeded { result } if result.kind == RequestKind::Information
        ));
        assert!(matches!(
            &result.items[2].outcome,
            BatchOutcome::Succeeded { result } if result.kind == RequestKind::Hallucination
        ));
        assert!(result.items[0].is_success());
        assert!(!result.items[1].is_success());
        assert_eq!(result.items[1].error(), Some("Unknown request kind: telepathy"));
        assert!(result.items[2].is_success());
        assert!(result.items[3].is_success());
        assert!(matches!(result.items[4].outcome, BatchOutcome::Failed { .. }));
        assert!(result.items[5].is_success());
        assert_eq!(result.summary.total, 6);
        assert_eq!(result.summary.succeeded, 4);
        assert_eq!(result.summary.failed, 2);
    }

    #[tokio::test]
    async fn test_batch_zero_concurrency_rejected() {
        let fx = ready(Setup::default()).await;
        let batch = BatchRequest::new(vec![]).with_max_concurrency(0);
        let err = fx.orchestrator.batch_verify(batch).await.unwrap_err();
        assert!(matches!(err, VerificationError::InvalidRequest(DomainError::ZeroConcurrency)));
    }

    // ==================== Health & Metrics ====================

    #[tokio::test]
    async fn test_health_reflects_failed_agent() {
        let fx = fixture(Setup {
            detector_init_ok: false,
            ..Setup::default()
        });
        let sink = Arc::new(RecordingSink::default());
        let orchestrator = fx.orchestrator.with_telemetry(sink.clone());

        let health = orchestrator.initialize().await;
        assert_eq!(health.status, HealthStatus::Degraded);

        let health = orchestrator.get_system_health();
        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(health.recommendations[0].contains("hallucination_detector"));
        assert_eq!(*sink.kinds.lock().unwrap(), vec!["health"]);

        // the working agent still serves requests
        assert!(orchestrator.verify_information(request("x")).await.is_ok());
        assert!(orchestrator.detect_hallucination(request("x")).await.is_err());
    }

    #[tokio::test]
    async fn test_metrics_published_after_each_request() {
        let fx = ready(Setup::default()).await;
        let sink = Arc::new(RecordingSink::default());
        let orchestrator = fx.orchestrator.with_telemetry(sink.clone());

        orchestrator.verify_information(request("a")).await.unwrap();
        orchestrator.detect_hallucination(request("b")).await.unwrap();

        let metrics = orchestrator.get_system_metrics();
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.success_rate, 1.0);
        assert_eq!(metrics.error_rate, 0.0);
        assert_eq!(*sink.kinds.lock().unwrap(), vec!["metrics", "metrics"]);
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_fail_requests() {
        let fx = ready(Setup::default()).await;
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..RecordingSink::default()
        });
        let orchestrator = fx.orchestrator.with_telemetry(sink);

        assert!(orchestrator.verify_information(request("a")).await.is_ok());
        assert_eq!(orchestrator.get_system_health().status, HealthStatus::Healthy);
    }
}
