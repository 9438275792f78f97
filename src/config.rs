use crate::ZedwsError;
use crate::store::{DEFAULT_CHANNEL, default_db_dir, discover};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Default)]
pub struct ZedwsConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

impl CacheConfig {
    /// Saturates instead of panicking; `validate_config` rejects what
    /// would not fit.
    pub fn ttl(&self) -> Duration {
        Duration::try_from_secs_f64(self.ttl_seconds).unwrap_or(Duration::MAX)
    }
}

fn default_ttl_seconds() -> f64 {
    5.0
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StoreConfig {
    /// Explicit store file; skips channel discovery.
    pub path: Option<PathBuf>,
    /// Directory holding `<version>-<channel>/db.sqlite`.
    pub db_dir: Option<PathBuf>,
    pub channel: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LaunchConfig {
    #[serde(default = "default_editor")]
    pub editor: String,
    /// Program that runs commands inside the subsystem.
    #[serde(default = "default_bridge")]
    pub bridge: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            editor: default_editor(),
            bridge: default_bridge(),
        }
    }
}

fn default_editor() -> String {
    "zed".into()
}

fn default_bridge() -> String {
    "wsl".into()
}

/// Load config from ZEDWS_CONFIG env var, ~/.zedws/config.toml, or defaults.
pub fn load_config() -> Result<ZedwsConfig, ZedwsError> {
    match config_path() {
        Some(p) if p.exists() => load_config_from(&p),
        _ => Ok(ZedwsConfig::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<ZedwsConfig, ZedwsError> {
    let content = std::fs::read_to_string(path)?;
    let config: ZedwsConfig = toml::from_str(&content)
        .map_err(|e| ZedwsError::Config(format!("{}: {e}", path.display())))?;
    validate_config(&config)?;
    Ok(config)
}

fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("ZEDWS_CONFIG") {
        return Some(PathBuf::from(p));
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()?;
    Some(Path::new(&home).join(".zedws").join("config.toml"))
}

fn validate_config(config: &ZedwsConfig) -> Result<(), ZedwsError> {
    let ttl = config.cache.ttl_seconds;
    if !ttl.is_finite() || ttl <= 0.0 {
        return Err(ZedwsError::Config(format!(
            "cache.ttl_seconds must be a positive number, got {ttl}"
        )));
    }
    Duration::try_from_secs_f64(ttl)
        .map_err(|e| ZedwsError::Config(format!("cache.ttl_seconds = {ttl}: {e}")))?;
    if config.launch.editor.trim().is_empty() {
        return Err(ZedwsError::Config("launch.editor must not be empty".into()));
    }
    if config.launch.bridge.trim().is_empty() {
        return Err(ZedwsError::Config("launch.bridge must not be empty".into()));
    }
    if let Some(chan) = &config.store.channel
        && chan.trim().is_empty()
    {
        return Err(ZedwsError::Config("store.channel must not be empty".into()));
    }
    Ok(())
}

/// Resolve the store file: explicit override > config path > discovery.
pub fn resolve_store_path(config: &ZedwsConfig, explicit: Option<PathBuf>) -> PathBuf {
    if let Some(p) = explicit {
        return p;
    }
    if let Some(p) = &config.store.path {
        return p.clone();
    }
    let db_dir = config.store.db_dir.clone().unwrap_or_else(default_db_dir);
    let channel = config.store.channel.as_deref().unwrap_or(DEFAULT_CHANNEL);
    discover(&db_dir, channel)
}
