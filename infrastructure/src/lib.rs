//! Infrastructure layer for verity
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod assembly;
pub mod cache;
pub mod config;
pub mod logging;
pub mod providers;
pub mod sources;
pub(crate) mod text;

// Re-export commonly used types
pub use assembly::{Assembly, AssemblyError, EngineAssembler};
pub use cache::InMemoryResultCache;
pub use config::{ConfigLoader, FileConfig, FileOutputConfig, FileTelemetryConfig};
pub use logging::JsonlTelemetrySink;
pub use providers::{
    DETECTOR_NAMES, HeuristicRiskAnalyzer, HeuristicSuite, KNOWN_PROVIDERS, is_known_provider,
};
pub use sources::{
    ContentSourceDiscovery, HttpSourceFetcher, StaticReputationTable, html_to_text,
};
