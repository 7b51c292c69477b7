// Payment-status cache with tiered freshness.
// Keeps aggregates in memory and mirrors the whole map to a durable snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::Bucket;

use super::clock::{Clock, SystemClock};
use super::snapshot::SnapshotStore;

/// Age below which an entry is fully authoritative: 48 hours.
pub const DEFAULT_FRESH_WINDOW: Duration = Duration::hours(48);

/// Age below which an entry may still be served as a fallback: 14 days.
pub const DEFAULT_STALE_WINDOW: Duration = Duration::days(14);

/// Freshness policy windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessWindows {
    pub fresh: Duration,
    pub stale: Duration,
}

impl Default for FreshnessWindows {
    fn default() -> Self {
        Self {
            fresh: DEFAULT_FRESH_WINDOW,
            stale: DEFAULT_STALE_WINDOW,
        }
    }
}

/// Classification of a lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
    Expired,
}

/// A cached aggregate. Never mutated; a newer write replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    data: Vec<Bucket>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    timestamp: DateTime<Utc>,
    /// Caller-asserted hint. Freshness is computed from `timestamp` only.
    stale: bool,
}

impl CacheEntry {
    /// Timestamps are kept at millisecond precision, the snapshot's resolution.
    pub fn new(data: Vec<Bucket>, timestamp: DateTime<Utc>, stale: bool) -> Self {
        let timestamp =
            DateTime::from_timestamp_millis(timestamp.timestamp_millis()).unwrap_or(timestamp);
        Self {
            data,
            timestamp,
            stale,
        }
    }

    pub fn data(&self) -> &[Bucket] {
        &self.data
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[cfg(test)]
    pub fn stale(&self) -> bool {
        self.stale
    }
}

/// In-memory status cache backed by a snapshot store.
pub struct StatusCache {
    entries: BTreeMap<String, CacheEntry>,
    store: Box<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    windows: FreshnessWindows,
}

impl StatusCache {
    /// Open the cache on the wall clock, hydrating from `store`.
    pub fn open(store: impl SnapshotStore + 'static, windows: FreshnessWindows) -> Self {
        Self::with_clock(store, windows, Arc::new(SystemClock))
    }

    /// Open the cache with an explicit time source.
    pub fn with_clock(
        store: impl SnapshotStore + 'static,
        windows: FreshnessWindows,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store: Box<dyn SnapshotStore> = Box::new(store);
        let entries = match hydrate(store.as_ref()) {
            Ok(mut entries) => {
                let now = clock.now();
                let before = entries.len();
                entries.retain(|_, entry| now - entry.timestamp < windows.stale);
                tracing::debug!(
                    entries = entries.len(),
                    expired = before - entries.len(),
                    "status cache hydrated"
                );
                entries
            }
            Err(e) => {
                tracing::warn!(error = %e, "status cache snapshot unreadable, starting empty");
                BTreeMap::new()
            }
        };

        Self {
            entries,
            store,
            clock,
            windows,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry. Absent is a normal outcome.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Build an entry stamped with the cache clock's current time.
    pub fn entry(&self, data: Vec<Bucket>, stale: bool) -> CacheEntry {
        CacheEntry::new(data, self.clock.now(), stale)
    }

    /// Insert or replace an entry, then persist the full map.
    /// Persistence is best-effort: a failure is logged and the memory write stands.
    pub fn set(&mut self, key: impl Into<String>, entry: CacheEntry) {
        let key = key.into();
        self.entries.insert(key.clone(), entry);

        if let Err(e) = self.persist() {
            tracing::warn!(%key, error = %e, "status cache snapshot write failed, keeping memory only");
        }
    }

    pub fn is_fresh(&self, entry: Option<&CacheEntry>) -> bool {
        self.younger_than(entry, self.windows.fresh)
    }

    pub fn is_stale_but_usable(&self, entry: Option<&CacheEntry>) -> bool {
        self.younger_than(entry, self.windows.stale)
    }

    pub fn freshness(&self, entry: Option<&CacheEntry>) -> Freshness {
        if self.is_fresh(entry) {
            Freshness::Fresh
        } else if self.is_stale_but_usable(entry) {
            Freshness::Stale
        } else {
            Freshness::Expired
        }
    }

    fn younger_than(&self, entry: Option<&CacheEntry>, window: Duration) -> bool {
        entry.is_some_and(|entry| self.clock.now() - entry.timestamp < window)
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.store.save(&json)
    }
}

fn hydrate(store: &dyn SnapshotStore) -> Result<BTreeMap<String, CacheEntry>> {
    match store.load()? {
        Some(contents) => Ok(serde_json::from_str(&contents)?),
        None => Ok(BTreeMap::new()),
    }
}
