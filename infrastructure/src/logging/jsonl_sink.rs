//! JSONL file writer for health and metrics snapshots.
//!
//! Each [`TelemetrySnapshot`] is serialized as a single JSON line with a
//! `type` field, a `timestamp` and the snapshot under `data`, appended to the
//! file via a buffered writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use verity_application::ports::telemetry_sink::{SinkError, TelemetrySink, TelemetrySnapshot};

/// JSONL telemetry sink that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`.
pub struct JsonlTelemetrySink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTelemetrySink {
    /// Open the sink, appending to the file if it exists.
    ///
    /// Creates the file and its parent directories when missing.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                SinkError::Unavailable(format!(
                    "could not create telemetry directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                SinkError::Unavailable(format!(
                    "could not open telemetry file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the telemetry file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetrySink for JsonlTelemetrySink {
    fn publish(&self, snapshot: &TelemetrySnapshot) -> Result<(), SinkError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record =
            serde_json::to_value(snapshot).map_err(|e| SinkError::Write(e.to_string()))?;
        if let serde_json::Value::Object(map) = &mut record {
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
        }
        let line = serde_json::to_string(&record).map_err(|e| SinkError::Write(e.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::Unavailable("telemetry writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| SinkError::Write(e.to_string()))?;
        // JSONL is append-only; flush so a crash loses at most one record
        writer.flush().map_err(|e| SinkError::Write(e.to_string()))
    }
}

impl Drop for JsonlTelemetrySink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_domain::{
        AgentHealthRecord, SystemHealth, SystemMetrics, TargetAccuracy,
    };

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let sink = JsonlTelemetrySink::new(&path).unwrap();

        let mut metrics = SystemMetrics::new(TargetAccuracy::default());
        metrics.record(120, true);
        sink.publish(&TelemetrySnapshot::Metrics(metrics)).unwrap();

        let health = SystemHealth::from_records(vec![AgentHealthRecord::new("information_verifier")]);
        sink.publish(&TelemetrySnapshot::Health(health)).unwrap();
        drop(sink);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert!(line.get("type").is_some());
            assert!(line["timestamp"].as_str().unwrap().ends_with('Z'));
        }

        assert_eq!(lines[0]["type"], "metrics");
        assert_eq!(lines[0]["data"]["total_requests"], 1);
        assert_eq!(lines[1]["type"], "health");
        assert_eq!(lines[1]["data"]["agents"][0]["agent_id"], "information_verifier");
    }

    #[test]
    fn test_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("telemetry.jsonl");
        let snapshot = TelemetrySnapshot::Metrics(SystemMetrics::default());

        JsonlTelemetrySink::new(&path).unwrap().publish(&snapshot).unwrap();
        JsonlTelemetrySink::new(&path).unwrap().publish(&snapshot).unwrap();

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let result = JsonlTelemetrySink::new(blocker.join("telemetry.jsonl"));
        assert!(matches!(result, Err(SinkError::Unavailable(_))));
    }
}
