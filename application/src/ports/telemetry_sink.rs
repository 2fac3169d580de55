//! Port for health and metrics telemetry.
//!
//! Defines the [`TelemetrySink`] trait, a write-only consumer of
//! [`SystemHealth`] / [`SystemMetrics`] snapshots for dashboards.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures structured
//! records in a machine-readable format (JSONL).

use serde::Serialize;
use thiserror::Error;
use verity_domain::{SystemHealth, SystemMetrics};

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Telemetry sink unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write telemetry record: {0}")]
    Write(String),
}

/// A structured snapshot published to the sink
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TelemetrySnapshot {
    Health(SystemHealth),
    Metrics(SystemMetrics),
}

impl TelemetrySnapshot {
    pub fn kind(&self) -> &'static str {
        match self {
            TelemetrySnapshot::Health(_) => "health",
            TelemetrySnapshot::Metrics(_) => "metrics",
        }
    }
}

/// Write-only telemetry consumer
///
/// Failures are reported to the caller, which logs and ignores them.
pub trait TelemetrySink: Send + Sync {
    fn publish(&self, snapshot: &TelemetrySnapshot) -> Result<(), SinkError>;
}

/// No-op implementation for tests and when telemetry is disabled.
pub struct NoTelemetry;

impl TelemetrySink for NoTelemetry {
    fn publish(&self, _snapshot: &TelemetrySnapshot) -> Result<(), SinkError> {
        Ok(())
    }
}
