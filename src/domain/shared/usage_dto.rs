use super::tier::{ApiTier, TierLimits};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-engine outcome counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineUsage {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

/// Point-in-time copy of the process-wide usage counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub total_requests: u64,
    pub total_characters: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub placeholder_responses: u64,
    pub engines: BTreeMap<String, EngineUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: u64,
    pub total_bytes: u64,
}

/// Response for GET /stats
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub usage: UsageSnapshot,
    pub cache: CacheStats,
    pub tier: ApiTier,
    pub limits: TierLimits,
    pub engines: Vec<String>,
    pub timestamp: String,
}
