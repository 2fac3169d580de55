//! Application-level configuration.
//!
//! - [`EngineConfig`]: container handed to the orchestrator
//! - [`InformationParams`], [`DetectionParams`], [`SourceParams`]: agent tuning
//! - [`BatchParams`], [`CacheParams`], [`MetricsParams`]: orchestrator tuning

pub mod engine_config;
pub mod params;

pub use engine_config::EngineConfig;
pub use params::{
    BatchParams, CacheParams, DEFAULT_PROVIDER_TIMEOUT, DetectionParams, InformationParams,
    MetricsParams, SourceParams,
};
