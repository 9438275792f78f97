use crate::registry::WorkspaceRecord;
use crate::store::modified;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

struct CacheEntry {
    records: Arc<[WorkspaceRecord]>,
    produced_at: Instant,
    /// `None` when the store's mtime could not be read at `set` time.
    store_mtime: Option<SystemTime>,
}

/// Memoizes one registry load behind a TTL and a store-mtime check.
///
/// Not synchronized. A session that is shared across threads must hold a lock
/// across the `get`/`set` pair; without one, two callers can both miss and
/// both read the store, which costs time but never returns wrong data.
pub struct FreshnessCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl Default for FreshnessCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl FreshnessCache {
    /// A zero TTL is bumped to one millisecond; config validation rejects it
    /// before it gets here.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ttl.max(Duration::from_millis(1)),
            entry: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, store: &Path) -> Option<Arc<[WorkspaceRecord]>> {
        self.get_at(store, Instant::now())
    }

    pub(crate) fn get_at(&self, store: &Path, now: Instant) -> Option<Arc<[WorkspaceRecord]>> {
        let entry = self.entry.as_ref()?;

        let age = now.saturating_duration_since(entry.produced_at);
        if age > self.ttl {
            log::debug!("cache: expired after {age:?}");
            return None;
        }

        let recorded = entry.store_mtime?;
        match modified(store) {
            Some(current) if current == recorded => {
                log::debug!("cache: hit ({} workspaces)", entry.records.len());
                Some(Arc::clone(&entry.records))
            }
            Some(_) => {
                log::debug!("cache: store modified since last load");
                None
            }
            None => None,
        }
    }

    pub fn set(&mut self, store: &Path, records: impl Into<Arc<[WorkspaceRecord]>>) {
        self.set_at(store, records.into(), Instant::now());
    }

    pub(crate) fn set_at(&mut self, store: &Path, records: Arc<[WorkspaceRecord]>, now: Instant) {
        self.entry = Some(CacheEntry {
            records,
            produced_at: now,
            store_mtime: modified(store),
        });
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
