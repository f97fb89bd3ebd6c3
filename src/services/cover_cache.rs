//! Cover lookup cache
//!
//! Maps game ids to absolute cover URLs and consults the provider only for ids
//! it has not resolved before.
//!
//! Concurrency policy: the store is behind a `RwLock` that is never held across
//! a provider call. Two requests racing on the same uncached id will both call
//! the provider and the last writer wins; there is no single-flight. Misses
//! (not found or failed) are not stored, so they are retried on the next
//! request. Without `max_entries` the store grows for the life of the process.

use futures::future::join_all;
use lru::LruCache;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::models::{CacheStats, CoverMap};
use crate::providers::CoverProvider;
use crate::utils::UrlUtils;

/// Backing map. The bounded variant evicts the least recently inserted cover;
/// reads use `peek` and never reorder.
enum CoverStore {
    Unbounded(HashMap<String, String>),
    Bounded(LruCache<String, String>),
}

impl CoverStore {
    fn get(&self, game_id: &str) -> Option<&String> {
        match self {
            CoverStore::Unbounded(map) => map.get(game_id),
            CoverStore::Bounded(lru) => lru.peek(game_id),
        }
    }

    /// Insert a cover, returning true when another entry was evicted to make room
    fn insert(&mut self, game_id: String, url: String) -> bool {
        match self {
            CoverStore::Unbounded(map) => {
                map.insert(game_id, url);
                false
            }
            CoverStore::Bounded(lru) => {
                let key = game_id.clone();
                matches!(lru.push(game_id, url), Some((evicted, _)) if evicted != key)
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            CoverStore::Unbounded(map) => map.len(),
            CoverStore::Bounded(lru) => lru.len(),
        }
    }
}

#[derive(Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    upstream_lookups: AtomicU64,
    upstream_failures: AtomicU64,
    not_found: AtomicU64,
    evictions: AtomicU64,
}

impl CacheCounters {
    fn add(counter: &AtomicU64, n: usize) {
        counter.fetch_add(n as u64, Ordering::Relaxed);
    }
}

pub struct CoverCache {
    provider: Arc<dyn CoverProvider>,
    provider_name: &'static str,
    store: RwLock<CoverStore>,
    max_entries: Option<usize>,
    cover_size: Option<String>,
    counters: CacheCounters,
}

impl CoverCache {
    pub fn new(provider: Arc<dyn CoverProvider>, config: &CacheConfig) -> Self {
        let capacity = config.max_entries.and_then(NonZeroUsize::new);
        let store = match capacity {
            Some(capacity) => CoverStore::Bounded(LruCache::new(capacity)),
            None => CoverStore::Unbounded(HashMap::new()),
        };
        let provider_name = provider.name();

        info!(
            "Cover cache initialized (provider: {}, bound: {})",
            provider_name,
            capacity.map_or_else(|| "unbounded".to_string(), |c| c.to_string())
        );

        Self {
            provider,
            provider_name,
            store: RwLock::new(store),
            max_entries: capacity.map(NonZeroUsize::get),
            cover_size: config.cover_size.clone(),
            counters: CacheCounters::default(),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Resolve every requested id to its cover URL or `None`
    ///
    /// The returned map has exactly one key per distinct requested id. Ids
    /// already cached are answered without touching the provider; the rest are
    /// looked up concurrently and the batch waits for all of them to settle.
    pub async fn lookup(&self, game_ids: &[String]) -> CoverMap {
        let mut result = CoverMap::new();

        let mut seen = HashSet::new();
        let requested: Vec<&str> = game_ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect();

        if requested.is_empty() {
            return result;
        }

        let mut missing = Vec::new();
        {
            let store = self.store.read().await;
            for id in requested {
                match store.get(id) {
                    Some(url) => {
                        result.insert(id.to_string(), Some(url.clone()));
                    }
                    None => missing.push(id),
                }
            }
        }

        CacheCounters::add(&self.counters.hits, result.len());
        CacheCounters::add(&self.counters.misses, missing.len());

        if missing.is_empty() {
            debug!("Cover lookup served {} ids from cache", result.len());
            return result;
        }

        let settled = join_all(missing.iter().map(|id| self.fetch(id))).await;

        let resolved: Vec<(&str, &String)> = missing
            .iter()
            .zip(settled.iter())
            .filter_map(|(id, url)| url.as_ref().map(|url| (*id, url)))
            .collect();

        if !resolved.is_empty() {
            let mut store = self.store.write().await;
            for (id, url) in &resolved {
                if store.insert(id.to_string(), (*url).clone()) {
                    self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        debug!(
            "Cover lookup: {} cached, {} fetched, {} unresolved",
            result.len(),
            resolved.len(),
            missing.len() - resolved.len()
        );

        for (id, url) in missing.into_iter().zip(settled) {
            result.insert(id.to_string(), url);
        }

        result
    }

    /// Resolve a single id; same caching rules as [`CoverCache::lookup`]
    pub async fn lookup_one(&self, game_id: &str) -> Option<String> {
        self.lookup(&[game_id.to_string()])
            .await
            .remove(game_id)
            .flatten()
    }

    /// Cached cover for an id, without consulting the provider
    pub async fn get_cached(&self, game_id: &str) -> Option<String> {
        self.store.read().await.get(game_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        let counters = &self.counters;
        CacheStats {
            provider: self.provider_name.to_string(),
            entries: self.len().await,
            max_entries: self.max_entries,
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            upstream_lookups: counters.upstream_lookups.load(Ordering::Relaxed),
            upstream_failures: counters.upstream_failures.load(Ordering::Relaxed),
            not_found: counters.not_found.load(Ordering::Relaxed),
            evictions: counters.evictions.load(Ordering::Relaxed),
        }
    }

    /// One provider call; every failure collapses to `None` for this id only
    async fn fetch(&self, game_id: &str) -> Option<String> {
        self.counters.upstream_lookups.fetch_add(1, Ordering::Relaxed);

        match self.provider.cover_url(game_id).await {
            Ok(Some(raw)) => Some(UrlUtils::normalize_cover_url(
                &raw,
                self.cover_size.as_deref(),
            )),
            Ok(None) => {
                self.counters.not_found.fetch_add(1, Ordering::Relaxed);
                debug!(game_id = %game_id, provider = self.provider_name, "No cover found");
                None
            }
            Err(e) => {
                self.counters.upstream_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    game_id = %game_id,
                    provider = self.provider_name,
                    error = %UrlUtils::obfuscate_credentials(&e.to_string()),
                    "Cover lookup failed"
                );
                None
            }
        }
    }
}
