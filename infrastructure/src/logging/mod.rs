//! Logging infrastructure: structured telemetry records.
//!
//! Provides [`JsonlTelemetrySink`], a JSONL file writer that implements
//! the [`TelemetrySink`](verity_application::TelemetrySink) port.

mod jsonl_sink;

pub use jsonl_sink::JsonlTelemetrySink;
