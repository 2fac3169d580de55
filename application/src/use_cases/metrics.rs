//! Rolling system metrics shared across concurrent requests.

use std::sync::{Mutex, PoisonError};
use verity_domain::{SystemMetrics, TargetAccuracy};

/// Synchronized wrapper around [`SystemMetrics`]
///
/// Every update takes the lock, so concurrent requests never lose a count.
/// A poisoned lock still yields the last written counters.
pub struct MetricsTracker {
    metrics: Mutex<SystemMetrics>,
}

impl MetricsTracker {
    pub fn new(target_accuracy: TargetAccuracy) -> Self {
        Self {
            metrics: Mutex::new(SystemMetrics::new(target_accuracy)),
        }
    }

    /// Record a completed request and return the updated counters
    pub fn record(&self, duration_ms: u64, success: bool) -> SystemMetrics {
        let mut metrics = self.metrics.lock().unwrap_or_else(PoisonError::into_inner);
        metrics.record(duration_ms, success);
        metrics.clone()
    }

    pub fn record_cache_hit(&self) {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record_cache_hit();
    }

    pub fn snapshot(&self) -> SystemMetrics {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(TargetAccuracy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_returns_updated_snapshot() {
        let tracker = MetricsTracker::default();
        let after = tracker.record(40, true);
        assert_eq!(after.total_requests, 1);
        assert_eq!(after.average_response_ms, 40.0);
        tracker.record_cache_hit();
        assert_eq!(tracker.snapshot().cache_hits, 1);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let tracker = Arc::new(MetricsTracker::default());
        let mut handles = Vec::new();
        for i in 0..32u64 {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                tracker.record(i, i % 4 != 0);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let metrics = tracker.snapshot();
        assert_eq!(metrics.total_requests, 32);
        assert_eq!(metrics.failed_requests, 8);
        assert_eq!(metrics.successful_requests, 24);
    }
}
