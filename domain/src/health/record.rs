//! Agent lifecycle and health records

use crate::util::current_timestamp_ms;
use serde::{Deserialize, Serialize};

/// Verification agents known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    InformationVerifier,
    HallucinationDetector,
}

impl AgentKind {
    pub fn id(&self) -> &'static str {
        match self {
            AgentKind::InformationVerifier => "information_verifier",
            AgentKind::HallucinationDetector => "hallucination_detector",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Lifecycle state of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Uninitialized,
    Active,
    Inactive,
    Error,
}

impl AgentStatus {
    pub fn accepts_requests(&self) -> bool {
        matches!(self, AgentStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Uninitialized => "uninitialized",
            AgentStatus::Active => "active",
            AgentStatus::Inactive => "inactive",
            AgentStatus::Error => "error",
        }
    }
}

/// Health bookkeeping for one agent
///
/// Rolling figures use the `(old + new) / 2` smoothing for response time and
/// an incremental mean for success rate. Both are approximations, not
/// windowed averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentHealthRecord {
    pub agent_id: String,
    pub status: AgentStatus,
    /// Last health check (milliseconds since epoch)
    pub last_health_check_ms: Option<u64>,
    pub average_response_ms: f64,
    pub success_rate: f64,
    pub error_count: u64,
    pub total_requests: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl AgentHealthRecord {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            status: AgentStatus::Uninitialized,
            last_health_check_ms: None,
            average_response_ms: 0.0,
            success_rate: 1.0,
            error_count: 0,
            total_requests: 0,
            last_error: None,
        }
    }

    /// Fold one completed request into the rolling figures
    pub fn record(&mut self, duration_ms: u64, success: bool) {
        self.total_requests += 1;
        self.average_response_ms = smooth(self.average_response_ms, duration_ms as f64, self.total_requests);
        self.success_rate = incremental_rate(self.success_rate, success, self.total_requests);
        if !success {
            self.error_count += 1;
        }
    }

    pub fn mark_active(&mut self) {
        self.status = AgentStatus::Active;
        self.last_error = None;
        self.touch();
    }

    pub fn mark_error(&mut self, reason: impl Into<String>) {
        self.status = AgentStatus::Error;
        self.last_error = Some(reason.into());
        self.touch();
    }

    pub fn mark_inactive(&mut self) {
        self.status = AgentStatus::Inactive;
    }

    /// Stamp the health-check time
    pub fn touch(&mut self) {
        self.last_health_check_ms = Some(current_timestamp_ms());
    }
}

/// `(old + new) / 2`, seeded with the first sample
pub(crate) fn smooth(previous: f64, sample: f64, count: u64) -> f64 {
    if count <= 1 {
        sample
    } else {
        (previous + sample) / 2.0
    }
}

/// Incremental mean of a boolean outcome over `count` samples
pub(crate) fn incremental_rate(previous: f64, outcome: bool, count: u64) -> f64 {
    if count == 0 {
        return previous;
    }
    let value = if outcome { 1.0 } else { 0.0 };
    let n = count as f64;
    (previous * (n - 1.0) + value) / n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_uninitialized() {
        let record = AgentHealthRecord::new(AgentKind::HallucinationDetector.id());
        assert_eq!(record.agent_id, "hallucination_detector");
        assert_eq!(record.status, AgentStatus::Uninitialized);
        assert!(!record.status.accepts_requests());
        assert!(record.last_health_check_ms.is_none());
    }

    #[test]
    fn test_record_rolling_figures() {
        let mut record = AgentHealthRecord::new("a");
        record.record(100, true);
        assert_eq!(record.average_response_ms, 100.0);
        assert_eq!(record.success_rate, 1.0);

        record.record(300, false);
        assert_eq!(record.average_response_ms, 200.0);
        assert_eq!(record.success_rate, 0.5);
        assert_eq!(record.error_count, 1);

        record.record(100, true);
        assert_eq!(record.average_response_ms, 150.0);
        assert!((record.success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(record.total_requests, 3);
    }

    #[test]
    fn test_status_transitions() {
        let mut record = AgentHealthRecord::new("a");
        record.mark_error("provider failed to load");
        assert_eq!(record.status, AgentStatus::Error);
        assert_eq!(record.last_error.as_deref(), Some("provider failed to load"));
        assert!(record.last_health_check_ms.is_some());

        record.mark_active();
        assert!(record.status.accepts_requests());
        assert!(record.last_error.is_none());

        record.mark_inactive();
        assert_eq!(record.status, AgentStatus::Inactive);
    }
}
