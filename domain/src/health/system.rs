//! Aggregate health and metrics

use super::record::{AgentHealthRecord, AgentStatus, incremental_rate, smooth};
use crate::util::current_timestamp_ms;
use serde::{Deserialize, Serialize};

/// Overall system status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Aggregate agent statuses
    ///
    /// More than half in error is unhealthy; any error or inactive agent is
    /// degraded.
    pub fn aggregate<'a>(statuses: impl IntoIterator<Item = &'a AgentStatus>) -> Self {
        let mut total = 0usize;
        let mut errors = 0usize;
        let mut inactive = 0usize;
        for status in statuses {
            total += 1;
            match status {
                AgentStatus::Error => errors += 1,
                AgentStatus::Inactive => inactive += 1,
                AgentStatus::Active | AgentStatus::Uninitialized => {}
            }
        }

        if errors * 2 > total {
            HealthStatus::Unhealthy
        } else if errors > 0 || inactive > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

/// Snapshot of system health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub agents: Vec<AgentHealthRecord>,
    pub recommendations: Vec<String>,
    pub checked_at_ms: u64,
}

impl SystemHealth {
    pub fn from_records(agents: Vec<AgentHealthRecord>) -> Self {
        let status = HealthStatus::aggregate(agents.iter().map(|r| &r.status));

        let mut recommendations = Vec::new();
        for record in &agents {
            match record.status {
                AgentStatus::Error => recommendations.push(format!(
                    "Investigate agent '{}': {}",
                    record.agent_id,
                    record.last_error.as_deref().unwrap_or("unknown error")
                )),
                AgentStatus::Inactive => recommendations.push(format!(
                    "Reactivate agent '{}' to restore full coverage",
                    record.agent_id
                )),
                AgentStatus::Uninitialized => recommendations.push(format!(
                    "Initialize agent '{}' before sending requests",
                    record.agent_id
                )),
                AgentStatus::Active => {}
            }
        }

        Self {
            status,
            agents,
            recommendations,
            checked_at_ms: current_timestamp_ms(),
        }
    }

    /// Best-effort fallback when the health query itself fails
    pub fn unavailable(reason: impl std::fmt::Display) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            agents: Vec::new(),
            recommendations: vec![format!(
                "Health query failed ({}); check agent manager state",
                reason
            )],
            checked_at_ms: current_timestamp_ms(),
        }
    }
}

/// Target accuracy figures reported for observability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetAccuracy {
    pub information_verification: f64,
    pub hallucination_detection: f64,
    pub source_verification: f64,
}

impl Default for TargetAccuracy {
    fn default() -> Self {
        Self {
            information_verification: 0.95,
            hallucination_detection: 0.90,
            source_verification: 0.90,
        }
    }
}

/// Rolling system counters
///
/// `average_response_ms` is updated as `(old + new) / 2` after each request;
/// success and error rates are incremental means over `total_requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_response_ms: f64,
    pub success_rate: f64,
    pub error_rate: f64,
    pub cache_hits: u64,
    pub target_accuracy: TargetAccuracy,
}

impl SystemMetrics {
    pub fn new(target_accuracy: TargetAccuracy) -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            average_response_ms: 0.0,
            success_rate: 0.0,
            error_rate: 0.0,
            cache_hits: 0,
            target_accuracy,
        }
    }

    /// Fold one completed request into the counters
    pub fn record(&mut self, duration_ms: u64, success: bool) {
        self.total_requests += 1;
        if success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
        self.average_response_ms = smooth(self.average_response_ms, duration_ms as f64, self.total_requests);
        self.success_rate = incremental_rate(self.success_rate, success, self.total_requests);
        self.error_rate = incremental_rate(self.error_rate, !success, self.total_requests);
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self::new(TargetAccuracy::default())
    }
}
