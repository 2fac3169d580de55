//! Agent health records and system metrics

pub mod record;
pub mod system;

pub use record::{AgentHealthRecord, AgentKind, AgentStatus};
pub use system::{HealthStatus, SystemHealth, SystemMetrics, TargetAccuracy};
