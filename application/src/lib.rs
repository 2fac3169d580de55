//! Application layer for verity
//!
//! This crate contains use cases, port definitions, and engine configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{
    BatchParams, CacheParams, DetectionParams, EngineConfig, InformationParams, MetricsParams,
    SourceParams,
};
pub use ports::{
    check_provider::{CheckInput, CheckProvider, ProviderError},
    progress::{NoProgress, VerificationProgress},
    reputation::ReputationTable,
    result_cache::{CacheError, NoCache, ResultCache},
    risk_analyzer::{NeutralRiskAnalyzer, RiskAnalyzer},
    source_discovery::{DiscoveryError, NoDiscovery, SourceDiscovery},
    source_fetcher::{FetchError, FetchedSource, SourceFetcher},
    telemetry_sink::{NoTelemetry, SinkError, TelemetrySink, TelemetrySnapshot},
};
pub use use_cases::agent_manager::{AgentError, AgentManager, VerificationAgent};
pub use use_cases::detect_hallucination::HallucinationDetectorAgent;
pub use use_cases::metrics::MetricsTracker;
pub use use_cases::orchestrator::{VerificationError, VerificationOrchestrator};
pub use use_cases::run_checks::ProviderPanel;
pub use use_cases::verify_information::InformationVerifierAgent;
pub use use_cases::verify_sources::SourceVerifier;
