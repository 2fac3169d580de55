//! In-process result cache

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use verity_application::ports::result_cache::{CacheError, ResultCache};
use verity_domain::{Fingerprint, VerificationResult};

struct Entry {
    result: VerificationResult,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Result cache held in memory for the lifetime of the process
///
/// Honors the TTL hint. When `max_entries` is reached, expired entries are
/// purged first, then the entry closest to expiry is evicted.
pub struct InMemoryResultCache {
    entries: RwLock<HashMap<Fingerprint, Entry>>,
    max_entries: usize,
}

impl InMemoryResultCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl Default for InMemoryResultCache {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn get(&self, key: &Fingerprint) -> Result<Option<VerificationResult>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.result.clone())),
                Some(_) => {}
            }
        }

        debug!(fingerprint = %key, "Evicting expired cache entry");
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(
        &self,
        key: &Fingerprint,
        result: &VerificationResult,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            entries.retain(|_, e| !e.is_expired(now));
            if entries.len() >= self.max_entries {
                let victim = entries
                    .iter()
                    .min_by_key(|(_, e)| (e.expires_at.is_none(), e.expires_at))
                    .map(|(k, _)| k.clone());
                if let Some(victim) = victim {
                    entries.remove(&victim);
                }
            }
        }

        entries.insert(
            key.clone(),
            Entry {
                result: result.clone(),
                expires_at: ttl.map(|ttl| now + ttl),
            },
        );
        Ok(())
    }
}
