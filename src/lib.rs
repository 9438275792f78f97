pub mod cache;
pub mod classify;
pub mod cli;
pub mod config;
pub mod launch;
pub mod query;
pub mod registry;
pub mod rpc;
pub mod session;
pub mod store;

use std::path::PathBuf;

#[derive(Debug)]
pub enum ZedwsError {
    Database(rusqlite::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    Config(String),
    /// The backing store could not be opened or read.
    StoreUnavailable { path: PathBuf, reason: String },
}

impl std::fmt::Display for ZedwsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZedwsError::Database(e) => write!(f, "database: {e}"),
            ZedwsError::Io(e) => write!(f, "io: {e}"),
            ZedwsError::Json(e) => write!(f, "json: {e}"),
            ZedwsError::Config(msg) => write!(f, "config: {msg}"),
            ZedwsError::StoreUnavailable { path, reason } => {
                write!(f, "store unavailable ({}): {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for ZedwsError {}

impl From<rusqlite::Error> for ZedwsError {
    fn from(e: rusqlite::Error) -> Self {
        ZedwsError::Database(e)
    }
}

impl From<std::io::Error> for ZedwsError {
    fn from(e: std::io::Error) -> Self {
        ZedwsError::Io(e)
    }
}

impl From<serde_json::Error> for ZedwsError {
    fn from(e: serde_json::Error) -> Self {
        ZedwsError::Json(e)
    }
}
