//! Bounded TTL cache with per-identifier write rate limiting — `spec.md`
//! §4.3. The one genuinely shared mutable resource in the pipeline; all
//! operations are linearizable per key (`spec.md` §5 shared-resource
//! policy (a)).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::clock::Clock;
use crate::model::AuthorizationResult;

const DEFAULT_RATE_LIMIT_MAX_REQUESTS: usize = 10;
const DEFAULT_RATE_LIMIT_WINDOW_MS: i64 = 60_000;

struct Entry {
    result: AuthorizationResult,
    stored_at: DateTime<Utc>,
    ttl_seconds: u64,
    hits: u64,
    last_access_tick: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub last_eviction_at: Option<DateTime<Utc>>,
}

/// Bounded TTL cache. `set`/eviction run under one mutex so that
/// `size <= max_entries` is never temporarily violated (`spec.md` §5
/// transactional discipline).
pub struct AuthCache {
    clock: Arc<dyn Clock>,
    max_entries: usize,
    default_ttl_seconds: u64,
    rate_limit_max_requests: usize,
    rate_limit_window_ms: i64,

    entries: Mutex<DashMap<String, Entry>>,
    write_log: DashMap<String, VecDeque<DateTime<Utc>>>,
    tick: AtomicU64,

    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    last_eviction_at: Mutex<Option<DateTime<Utc>>>,
}

impl AuthCache {
    pub fn new(clock: Arc<dyn Clock>, max_entries: usize, default_ttl_seconds: u64) -> Self {
        Self {
            clock,
            max_entries,
            default_ttl_seconds,
            rate_limit_max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window_ms: DEFAULT_RATE_LIMIT_WINDOW_MS,
            entries: Mutex::new(DashMap::new()),
            write_log: DashMap::new(),
            tick: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            last_eviction_at: Mutex::new(None),
        }
    }

    pub fn with_rate_limit(mut self, max_requests: usize, window_ms: i64) -> Self {
        self.rate_limit_max_requests = max_requests;
        self.rate_limit_window_ms = window_ms;
        self
    }

    /// Returns the cached result if it has not expired; an expired entry
    /// is evicted on read. Updates the hit counter and LRU recency.
    pub fn get(&self, key: &str) -> Option<AuthorizationResult> {
        let guard = self.entries.lock().unwrap();
        let now = self.clock.now();

        let expired = match guard.get(key) {
            Some(entry) => now >= entry.stored_at + chrono::Duration::seconds(entry.ttl_seconds as i64),
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        if expired {
            guard.remove(key);
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let tick = self.tick.fetch_add(1, Ordering::Relaxed);
        let mut entry = guard.get_mut(key).expect("checked present above");
        entry.hits += 1;
        entry.last_access_tick = tick;
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(entry.result.clone())
    }

    /// Insert or replace `key`, subject to the per-identifier write rate
    /// limit. Returns `false` when the write was dropped by the rate
    /// limiter (`spec.md` §4.3 — reads are never rate-limited).
    pub fn set(&self, key: &str, result: AuthorizationResult, ttl_override: Option<u64>) -> bool {
        if !self.allow_write(key) {
            return false;
        }

        let ttl_seconds = ttl_override.unwrap_or(self.default_ttl_seconds);
        let guard = self.entries.lock().unwrap();
        let tick = self.tick.fetch_add(1, Ordering::Relaxed);

        guard.insert(
            key.to_string(),
            Entry {
                result,
                stored_at: self.clock.now(),
                ttl_seconds,
                hits: 0,
                last_access_tick: tick,
            },
        );

        while guard.len() > self.max_entries {
            self.evict_lru(&guard, key);
        }

        true
    }

    fn evict_lru(&self, guard: &DashMap<String, Entry>, just_inserted: &str) {
        let victim = guard
            .iter()
            .filter(|e| e.key() != just_inserted)
            .min_by_key(|e| e.value().last_access_tick)
            .map(|e| e.key().clone());

        let victim = match victim {
            Some(v) => v,
            None => just_inserted.to_string(),
        };

        guard.remove(&victim);
        self.evictions.fetch_add(1, Ordering::Relaxed);
        *self.last_eviction_at.lock().unwrap() = Some(self.clock.now());
    }

    fn allow_write(&self, key: &str) -> bool {
        let now = self.clock.now();
        let window_start = now - chrono::Duration::milliseconds(self.rate_limit_window_ms);

        let mut log = self
            .write_log
            .entry(key.to_string())
            .or_insert_with(VecDeque::new);

        while log.front().is_some_and(|t| *t < window_start) {
            log.pop_front();
        }

        if log.len() >= self.rate_limit_max_requests {
            return false;
        }

        log.push_back(now);
        true
    }

    pub fn remove(&self, key: &str) {
        let guard = self.entries.lock().unwrap();
        guard.remove(key);
    }

    /// Clears entries and resets hit/miss counters (`spec.md` §4.3
    /// invariant iii); eviction/rate-limit bookkeeping is left intact.
    pub fn clear(&self) {
        let guard = self.entries.lock().unwrap();
        guard.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        let guard = self.entries.lock().unwrap();
        CacheStats {
            size: guard.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            last_eviction_at: *self.last_eviction_at.lock().unwrap(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
