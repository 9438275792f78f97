use crate::cache::FreshnessCache;
use crate::classify::classify_domain;
use crate::config::{LaunchConfig, ZedwsConfig};
use crate::launch::launch;
use crate::query::{ResultRow, result_rows};
use crate::registry::{WorkspaceRecord, load_or_empty};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One logical query session: a resolved store plus its freshness cache.
///
/// `workspaces` takes `&mut self`, so the cache check and the refill happen
/// under one exclusive borrow. Hosts that share a session across threads
/// wrap it in a `Mutex` and lock around each call.
pub struct Session {
    store: PathBuf,
    cache: FreshnessCache,
    launch: LaunchConfig,
}

impl Session {
    pub fn new(store: PathBuf, config: &ZedwsConfig) -> Self {
        let cache = FreshnessCache::new(config.cache.ttl());
        log::debug!("session: {} (cache ttl {:?})", store.display(), cache.ttl());
        Self {
            store,
            cache,
            launch: config.launch.clone(),
        }
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    /// Deduplicated, sorted workspaces, served from cache while fresh.
    ///
    /// Store failures come back as an empty list; the cause is logged.
    pub fn workspaces(&mut self) -> Arc<[WorkspaceRecord]> {
        if let Some(records) = self.cache.get(&self.store) {
            return records;
        }
        let records: Arc<[WorkspaceRecord]> = load_or_empty(&self.store).into();
        self.cache.set(&self.store, Arc::clone(&records));
        records
    }

    pub fn query(&mut self, query: &str) -> Vec<ResultRow> {
        let records = self.workspaces();
        result_rows(&records, query, &self.store)
    }

    /// Open `path` in the editor, routed by its domain.
    pub fn open(&self, path: &str) -> bool {
        launch(path, classify_domain(path), &self.launch)
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}
