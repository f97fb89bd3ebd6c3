//! Data types shared between the cover cache and the web layer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of a batch lookup: game id -> cover URL, or `None` when not found / lookup failed.
///
/// Keys are sorted, so the JSON object is stable across calls.
pub type CoverMap = BTreeMap<String, Option<String>>;

/// Single cover lookup result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverResponse {
    pub game_id: String,
    pub url: Option<String>,
}

/// Point-in-time counters for the cover cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub provider: String,
    pub entries: usize,
    /// Configured bound, `None` when the cache is unbounded
    pub max_entries: Option<usize>,
    pub hits: u64,
    pub misses: u64,
    pub upstream_lookups: u64,
    pub upstream_failures: u64,
    pub not_found: u64,
    pub evictions: u64,
}
