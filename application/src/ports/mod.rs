//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod check_provider;
pub mod progress;
pub mod reputation;
pub mod result_cache;
pub mod risk_analyzer;
pub mod source_discovery;
pub mod source_fetcher;
pub mod telemetry_sink;
