use crate::classify::{PathDomain, canonical_key, classify_domain, display_name};
use crate::store::{RawRow, read_rows};
use crate::ZedwsError;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

/// One deduplicated workspace. Rebuilt wholesale on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceRecord {
    pub id: i64,
    /// Path exactly as stored; this is what gets displayed and opened.
    pub path: String,
    pub canonical_key: String,
    pub domain: PathDomain,
}

impl WorkspaceRecord {
    fn from_row(row: RawRow, key: String) -> Self {
        let domain = classify_domain(&row.path);
        Self {
            id: row.workspace_id,
            path: row.path,
            canonical_key: key,
            domain,
        }
    }

    pub fn name(&self) -> &str {
        display_name(&self.path)
    }
}

/// Deduplicate by canonical key and sort by display name.
///
/// Within a key group the shortest original path wins; on equal length the
/// first row seen stays. A replaced record keeps its group's first-seen slot,
/// which is what the stable sort falls back on for equal names.
pub fn build<I>(rows: I) -> Vec<WorkspaceRecord>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut records: Vec<WorkspaceRecord> = Vec::new();

    for row in rows {
        if row.path.is_empty() {
            continue;
        }
        let key = canonical_key(&row.path);
        match slots.entry(key) {
            Entry::Vacant(v) => {
                let key = v.key().clone();
                v.insert(records.len());
                records.push(WorkspaceRecord::from_row(row, key));
            }
            Entry::Occupied(o) => {
                let kept = &mut records[*o.get()];
                if row.path.chars().count() < kept.path.chars().count() {
                    log::debug!("registry: {:?} replaces {:?}", row.path, kept.path);
                    *kept = WorkspaceRecord::from_row(row, o.key().clone());
                }
            }
        }
    }

    records.sort_by_cached_key(|r| r.name().to_lowercase());
    records
}

/// Read the store and build the workspace list.
///
/// Errors are returned, never swallowed here; see [`load_or_empty`].
pub fn load(store: &Path) -> Result<Vec<WorkspaceRecord>, ZedwsError> {
    let rows = read_rows(store)?;
    let total = rows.len();
    let records = build(rows);
    log::debug!(
        "registry: {} rows -> {} workspaces from {}",
        total,
        records.len(),
        store.display()
    );
    Ok(records)
}

/// [`load`], degrading any store failure to an empty list plus a diagnostic.
pub fn load_or_empty(store: &Path) -> Vec<WorkspaceRecord> {
    match load(store) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("{e}");
            Vec::new()
        }
    }
}
