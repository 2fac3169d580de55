//! Domain reputation port

/// Reputation lookup for source domains
pub trait ReputationTable: Send + Sync {
    /// Score in [0, 1]; unknown domains return the table's documented default
    fn reputation(&self, domain: &str) -> f64;
}
