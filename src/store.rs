use crate::ZedwsError;
use regex::Regex;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::{Duration, SystemTime};

pub const STORE_FILE: &str = "db.sqlite";
pub const DEFAULT_CHANNEL: &str = "stable";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const WORKSPACES_SQL: &str = "SELECT workspace_id, paths FROM workspaces";

/// `<version>-<channel>` directory names, e.g. `0-stable`, `0-preview`.
static CHANNEL_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-([A-Za-z0-9_]+)$").expect("static regex"));

/// A validated row from the workspaces relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub workspace_id: i64,
    pub path: String,
}

/// Where the editor keeps its per-channel databases.
pub fn default_db_dir() -> PathBuf {
    #[cfg(windows)]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return PathBuf::from(local).join("Zed").join("db");
        }
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".into());
    PathBuf::from(home)
        .join("AppData")
        .join("Local")
        .join("Zed")
        .join("db")
}

/// Probe `db_dir` for `<version>-<channel>/db.sqlite`.
///
/// Prefers the requested channel, then the first candidate by directory name.
/// Falls back to `<db_dir>/0-stable/db.sqlite` when nothing matches, so the
/// caller always gets a concrete path to report.
pub fn discover(db_dir: &Path, channel: &str) -> PathBuf {
    let mut candidates: Vec<(String, String, PathBuf)> = Vec::new();

    if let Ok(entries) = std::fs::read_dir(db_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(caps) = CHANNEL_DIR.captures(&name) else {
                continue;
            };
            let db = entry.path().join(STORE_FILE);
            if db.is_file() {
                let chan = caps[2].to_string();
                candidates.push((name, chan, db));
            }
        }
    } else {
        log::debug!("store: {} not readable, using fallback", db_dir.display());
    }

    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some((_, _, db)) = candidates.iter().find(|(_, chan, _)| chan == channel) {
        return db.clone();
    }
    if let Some((name, _, db)) = candidates.into_iter().next() {
        log::debug!("store: no {channel:?} channel, using {name}");
        return db;
    }

    db_dir.join(format!("0-{DEFAULT_CHANNEL}")).join(STORE_FILE)
}

/// Open the store read-only. Never creates the file.
pub fn open_readonly(path: &Path) -> Result<Connection, ZedwsError> {
    if !path.is_file() {
        return Err(ZedwsError::StoreUnavailable {
            path: path.to_path_buf(),
            reason: "file not found".into(),
        });
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| unavailable(path, e))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|e| unavailable(path, e))?;
    Ok(conn)
}

fn unavailable(path: &Path, e: rusqlite::Error) -> ZedwsError {
    ZedwsError::StoreUnavailable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Read every row of the workspaces relation, discarding malformed ones.
///
/// All or nothing: a failure while stepping the cursor discards what was read.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, ZedwsError> {
    let conn = open_readonly(path)?;
    let mut stmt = conn
        .prepare(WORKSPACES_SQL)
        .map_err(|e| unavailable(path, e))?;

    let mut out = Vec::new();
    let mut dropped = 0usize;
    let mut rows = stmt.query([]).map_err(|e| unavailable(path, e))?;
    while let Some(row) = rows.next().map_err(|e| unavailable(path, e))? {
        let id = row.get_ref(0).map_err(|e| unavailable(path, e))?;
        let p = row.get_ref(1).map_err(|e| unavailable(path, e))?;
        match validate_row(id, p) {
            Some(raw) => out.push(raw),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("store: skipped {dropped} malformed rows");
    }
    Ok(out)
}

/// Convert loosely-typed column values into a `RawRow`, or reject the row.
pub fn validate_row(id: ValueRef<'_>, path: ValueRef<'_>) -> Option<RawRow> {
    let ValueRef::Integer(workspace_id) = id else {
        return None;
    };
    let ValueRef::Text(bytes) = path else {
        return None;
    };
    let path = std::str::from_utf8(bytes).ok()?;
    if path.is_empty() {
        return None;
    }
    Some(RawRow {
        workspace_id,
        path: path.to_string(),
    })
}

/// Last-modification time of the store file, if it can be read.
pub fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).ok()?.modified().ok()
}

pub fn handle_locate(path: &Path) -> Result<(), ZedwsError> {
    println!("{}", path.display());
    match modified(path) {
        Some(_) => eprintln!("zedws: store present"),
        None => eprintln!("zedws: store missing"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_db(dir: &Path, sub: &str) -> PathBuf {
        let d = dir.join(sub);
        std::fs::create_dir_all(&d).unwrap();
        let db = d.join(STORE_FILE);
        std::fs::write(&db, b"").unwrap();
        db
    }

    fn make_store(path: &Path) -> Connection {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch("CREATE TABLE workspaces (workspace_id INTEGER, paths)")
            .unwrap();
        conn
    }

    #[test]
    fn discover_prefers_stable() {
        let dir = tempfile::TempDir::new().unwrap();
        touch_db(dir.path(), "0-preview");
        let stable = touch_db(dir.path(), "0-stable");
        assert_eq!(discover(dir.path(), "stable"), stable);
    }

    #[test]
    fn discover_honours_requested_channel() {
        let dir = tempfile::TempDir::new().unwrap();
        let preview = touch_db(dir.path(), "0-preview");
        touch_db(dir.path(), "0-stable");
        assert_eq!(discover(dir.path(), "preview"), preview);
    }

    #[test]
    fn discover_falls_back_to_first_by_name() {
        let dir = tempfile::TempDir::new().unwrap();
        touch_db(dir.path(), "1-preview");
        let nightly = touch_db(dir.path(), "0-nightly");
        assert_eq!(discover(dir.path(), "stable"), nightly);
    }

    #[test]
    fn discover_ignores_non_channel_dirs_and_empty_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        touch_db(dir.path(), "backup");
        std::fs::create_dir_all(dir.path().join("0-stable")).unwrap();
        assert_eq!(
            discover(dir.path(), "stable"),
            dir.path().join("0-stable").join(STORE_FILE)
        );
    }

    #[test]
    fn discover_missing_dir_uses_fallback() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(
            discover(&missing, "stable"),
            missing.join("0-stable").join(STORE_FILE)
        );
    }

    #[test]
    fn open_missing_file_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.sqlite");
        let err = open_readonly(&path).unwrap_err();
        assert!(matches!(err, ZedwsError::StoreUnavailable { .. }));
        assert!(!path.exists(), "read-only open must not create the store");
    }

    #[test]
    fn read_rows_drops_malformed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        let conn = make_store(&path);
        conn.execute_batch(
            "INSERT INTO workspaces VALUES (1, 'C:/a');
             INSERT INTO workspaces VALUES (2, NULL);
             INSERT INTO workspaces VALUES (3, 123);
             INSERT INTO workspaces VALUES (4, '');
             INSERT INTO workspaces VALUES (5, X'2F62');
             INSERT INTO workspaces VALUES ('x', '/b');
             INSERT INTO workspaces VALUES (6, '/home/u/c');",
        )
        .unwrap();
        drop(conn);

        let rows = read_rows(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                RawRow { workspace_id: 1, path: "C:/a".into() },
                RawRow { workspace_id: 6, path: "/home/u/c".into() },
            ]
        );
    }

    #[test]
    fn read_rows_missing_table_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE other (x)")
            .unwrap();
        let err = read_rows(&path).unwrap_err();
        assert!(matches!(err, ZedwsError::StoreUnavailable { .. }));
    }

    #[test]
    fn read_rows_corrupt_file_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        std::fs::write(&path, b"this is not a sqlite database at all, not even close").unwrap();
        assert!(read_rows(&path).is_err());
    }

    #[test]
    fn modified_reads_mtime() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(STORE_FILE);
        assert!(modified(&path).is_none());
        std::fs::write(&path, b"").unwrap();
        assert!(modified(&path).is_some());
    }
}
