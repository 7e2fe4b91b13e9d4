use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::shared::usage_dto::{EngineUsage, UsageSnapshot};

/// Process-wide usage counters, shared by every request
#[derive(Debug, Default)]
pub struct UsageRepository {
    total_requests: AtomicU64,
    total_characters: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    placeholder_responses: AtomicU64,
    engines: RwLock<BTreeMap<String, EngineUsage>>,
}

impl UsageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an accepted synthesis request, cache hits included
    pub fn record_request(&self, characters: usize) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_characters
            .fetch_add(characters as u64, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_placeholder(&self) {
        self.placeholder_responses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one call to an engine and whether it produced audio
    pub fn record_engine_attempt(&self, engine: &str, success: bool) {
        let mut engines = self.engines.write();
        let usage = engines.entry(engine.to_string()).or_default();
        usage.attempts += 1;
        if success {
            usage.successes += 1;
        } else {
            usage.failures += 1;
        }
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_characters: self.total_characters.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            placeholder_responses: self.placeholder_responses.load(Ordering::Relaxed),
            engines: self.engines.read().clone(),
        }
    }
}
