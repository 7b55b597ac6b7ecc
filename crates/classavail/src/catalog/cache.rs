//! TTL-based caching of parsed department listings.

use super::types::DepartmentCatalog;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A cached catalog with metadata.
#[derive(Clone)]
struct CachedCatalog {
    catalog: DepartmentCatalog,
    cached_at: Instant,
    ttl: Duration,
}

impl CachedCatalog {
    fn is_fresh(&self) -> bool {
        self.cached_at.elapsed() < self.ttl
    }
}

/// Thread-safe cache of department catalogs, keyed by department code.
pub struct CatalogCache {
    entries: DashMap<String, CachedCatalog>,
    default_ttl: Duration,
}

impl CatalogCache {
    /// Creates a new cache with the specified default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Gets a cached catalog if it exists and hasn't expired.
    pub fn get(&self, department: &str) -> Option<DepartmentCatalog> {
        self.entries.get(department).and_then(|entry| {
            if entry.is_fresh() {
                Some(entry.catalog.clone())
            } else {
                // Entry expired, remove it
                drop(entry);
                self.entries.remove(department);
                None
            }
        })
    }

    /// Inserts a catalog with the default TTL.
    pub fn insert(&self, catalog: DepartmentCatalog) {
        self.insert_with_ttl(catalog, self.default_ttl);
    }

    /// Inserts a catalog with a custom TTL.
    pub fn insert_with_ttl(&self, catalog: DepartmentCatalog, ttl: Duration) {
        self.entries.insert(
            catalog.department.clone(),
            CachedCatalog {
                catalog,
                cached_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Removes a department's entry.
    pub fn invalidate(&self, department: &str) {
        self.entries.remove(department);
    }

    /// Number of entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes expired entries from the cache.
    pub fn cleanup_expired(&self) {
        self.entries.retain(|_, entry| entry.is_fresh());
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.entries.len();
        let expired = self.entries.iter().filter(|e| !e.is_fresh()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Stops hammering the site after repeated transport failures.
pub struct CircuitBreaker {
    failure_count: AtomicU32,
    last_failure: Mutex<Option<Instant>>,
    threshold: u32,
    recovery_time: Duration,
}

impl CircuitBreaker {
    /// Creates a new circuit breaker.
    ///
    /// - `threshold`: Number of failures before the breaker opens
    /// - `recovery_time`: How long to wait before allowing requests again
    pub fn new(threshold: u32, recovery_time: Duration) -> Self {
        Self {
            failure_count: AtomicU32::new(0),
            last_failure: Mutex::new(None),
            threshold,
            recovery_time,
        }
    }

    /// Creates a circuit breaker with default settings (5 failures, 30s recovery).
    pub fn with_defaults() -> Self {
        Self::new(5, Duration::from_secs(30))
    }

    /// Returns true if the breaker is open (blocking requests).
    pub fn is_open(&self) -> bool {
        if self.failure_count.load(Ordering::Relaxed) < self.threshold {
            return false;
        }

        if let Ok(guard) = self.last_failure.lock() {
            if let Some(last) = *guard {
                if last.elapsed() > self.recovery_time {
                    drop(guard);
                    self.record_success();
                    return false;
                }
            }
        }

        true
    }

    pub fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut guard) = self.last_failure.lock() {
            *guard = Some(Instant::now());
        }
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count.load(Ordering::Relaxed)
    }
}
