//! Agent Manager
//!
//! Tracks the lifecycle state and lightweight health figures of every
//! verification agent. The orchestrator asks the manager whether an agent may
//! serve a request and reports each outcome back to it.
//!
//! ```text
//!              initialize ok
//! Uninitialized ────────────→ Active ⇄ Inactive
//!       │                      │  ↑        (deactivate / reactivate)
//!       │ initialize failed    │  │ health check ok
//!       └──────────────────→ Error
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{info, warn};
use verity_domain::{AgentHealthRecord, AgentKind, AgentStatus, SystemHealth};

/// Errors raised by agents and the manager
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("provider '{provider}' failed to initialize: {reason}")]
    ProviderInit { provider: String, reason: String },

    #[error("agent has no check providers")]
    NoProviders,

    #[error("agent '{agent}' is {status}{}", reason_suffix(.reason))]
    NotReady {
        agent: AgentKind,
        status: &'static str,
        reason: Option<String>,
    },

    #[error("agent '{0}' is not registered")]
    NotRegistered(AgentKind),

    #[error("agent state unavailable: {0}")]
    StateUnavailable(String),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_ref()
        .map(|r| format!(": {}", r))
        .unwrap_or_default()
}

/// Lifecycle hooks every verification agent provides
#[async_trait]
pub trait VerificationAgent: Send + Sync {
    fn kind(&self) -> AgentKind;

    /// Prepare the agent's providers; failure keeps the agent out of service
    async fn initialize(&self) -> Result<(), AgentError>;

    /// Re-check readiness of an initialized agent
    async fn health_check(&self) -> Result<(), AgentError> {
        self.initialize().await
    }
}

/// Lifecycle and health bookkeeping for registered agents
///
/// Records are mutated only through this type.
pub struct AgentManager {
    agents: BTreeMap<AgentKind, Arc<dyn VerificationAgent>>,
    records: Mutex<BTreeMap<AgentKind, AgentHealthRecord>>,
}

impl Default for AgentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentManager {
    pub fn new() -> Self {
        Self {
            agents: BTreeMap::new(),
            records: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register an agent in the `Uninitialized` state
    pub fn register(&mut self, agent: Arc<dyn VerificationAgent>) {
        let kind = agent.kind();
        if let Ok(mut records) = self.records.lock() {
            records.insert(kind, AgentHealthRecord::new(kind.id()));
        }
        self.agents.insert(kind, agent);
    }

    pub fn is_registered(&self, kind: AgentKind) -> bool {
        self.agents.contains_key(&kind)
    }

    /// Initialize every registered agent concurrently
    ///
    /// Failures put the agent in `Error` with the reason; they are returned
    /// but do not stop the other agents from coming up.
    pub async fn initialize_all(&self) -> Vec<(AgentKind, Result<(), AgentError>)> {
        let results = futures::future::join_all(
            self.agents
                .iter()
                .map(|(kind, agent)| async move { (*kind, agent.initialize().await) }),
        )
        .await;

        for (kind, result) in &results {
            match result {
                Ok(()) => {
                    info!(agent = %kind, "Agent initialized");
                    self.update(*kind, |r| r.mark_active());
                }
                Err(e) => {
                    warn!(agent = %kind, "Agent initialization failed: {}", e);
                    self.update(*kind, |r| r.mark_error(e.to_string()));
                }
            }
        }
        results
    }

    /// Fail unless the agent is `Active`
    pub fn ensure_ready(&self, kind: AgentKind) -> Result<(), AgentError> {
        let records = self.lock()?;
        let record = records.get(&kind).ok_or(AgentError::NotRegistered(kind))?;
        if record.status.accepts_requests() {
            Ok(())
        } else {
            Err(AgentError::NotReady {
                agent: kind,
                status: record.status.as_str(),
                reason: record.last_error.clone(),
            })
        }
    }

    /// Fold a completed request into the agent's record
    pub fn record_outcome(&self, kind: AgentKind, duration_ms: u64, success: bool) {
        self.update(kind, |r| r.record(duration_ms, success));
    }

    pub fn mark_error(&self, kind: AgentKind, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(agent = %kind, "Agent marked as error: {}", reason);
        self.update(kind, |r| r.mark_error(reason));
    }

    /// Take an agent out of service without marking it failed
    pub fn deactivate(&self, kind: AgentKind) {
        info!(agent = %kind, "Agent deactivated");
        self.update(kind, |r| r.mark_inactive());
    }

    /// Return an agent to service, re-initializing it first
    pub async fn reactivate(&self, kind: AgentKind) -> Result<(), AgentError> {
        let agent = self.agents.get(&kind).ok_or(AgentError::NotRegistered(kind))?;
        match agent.initialize().await {
            Ok(()) => {
                info!(agent = %kind, "Agent reactivated");
                self.update(kind, |r| r.mark_active());
                Ok(())
            }
            Err(e) => {
                self.mark_error(kind, e.to_string());
                Err(e)
            }
        }
    }

    /// Run every agent's health check and update its status
    ///
    /// Inactive agents are checked but stay inactive.
    pub async fn run_health_checks(&self) -> SystemHealth {
        let results = futures::future::join_all(
            self.agents
                .iter()
                .map(|(kind, agent)| async move { (*kind, agent.health_check().await) }),
        )
        .await;

        for (kind, result) in results {
            self.update(kind, |record| match result {
                Ok(()) if record.status == AgentStatus::Inactive => record.touch(),
                Ok(()) => record.mark_active(),
                Err(e) => record.mark_error(e.to_string()),
            });
        }
        self.aggregate_health()
    }

    /// Snapshot of every record
    pub fn records(&self) -> Result<Vec<AgentHealthRecord>, AgentError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    pub fn record(&self, kind: AgentKind) -> Option<AgentHealthRecord> {
        self.lock().ok()?.get(&kind).cloned()
    }

    /// Aggregate health; never fails
    pub fn aggregate_health(&self) -> SystemHealth {
        match self.records() {
            Ok(records) => SystemHealth::from_records(records),
            Err(e) => {
                warn!("Health query failed: {}", e);
                SystemHealth::unavailable(e)
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<AgentKind, AgentHealthRecord>>, AgentError> {
        self.records
            .lock()
            .map_err(|e| AgentError::StateUnavailable(e.to_string()))
    }

    fn update(&self, kind: AgentKind, f: impl FnOnce(&mut AgentHealthRecord)) {
        match self.records.lock() {
            Ok(mut records) => {
                if let Some(record) = records.get_mut(&kind) {
                    f(record);
                }
            }
            Err(e) => warn!(agent = %kind, "Agent state unavailable: {}", e),
        }
    }
}
