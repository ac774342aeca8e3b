/*!
common/src/lib.rs

Shared configuration types and DB helper functions for Newsdeck.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file
- Helpers to initialize and migrate an SQLite database
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// Remote article service configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the remote article service (e.g. "https://news.example.com")
    pub base_url: String,
    /// Seconds between health probes against the service root
    pub health_poll_seconds: Option<u64>,
}

/// Database configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the sqlite database file (e.g. "data/newsdeck.db")
    pub path: String,
}

/// Category feed page sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub page_size: Option<i64>,
    pub expanded_page_size: Option<i64>,
}

/// Admin / maintenance config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub auto_migrate: Option<bool>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub feed: Option<FeedConfig>,
    pub admin: Option<AdminConfig>,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// Collapsed feed page size (articles shown before "more")
    pub fn feed_page_size(&self) -> i64 {
        self.feed.as_ref().and_then(|f| f.page_size).unwrap_or(4)
    }

    /// Expanded feed page size (articles fetched after "more")
    pub fn feed_expanded_page_size(&self) -> i64 {
        self.feed.as_ref().and_then(|f| f.expanded_page_size).unwrap_or(12)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

/// Run SQL migrations using sqlx's migration macro.
/// This expects a `migrations` directory at the workspace root containing SQL
/// migration files. The caller provides an async `SqlitePool` and the migrator
/// is executed against the provided pool.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // When built inside the workspace, migrations are located at ../migrations relative to this crate.
    // Packaging may require adapting this path or embedding migrations.
    sqlx::migrate!("../migrations")
        .run(pool)
        .await
        .context("Failed to run sqlx migrations")?;

    Ok(())
}

/// Initialize an SQLite connection pool.
///
/// This function will create the parent directory if necessary, ensure the DB file exists
/// (attempting to create it if missing), and return a configured `SqlitePool`. Defaults are
/// conservative:
/// - max_connections: 5
/// - connection timeout default provided by `sqlx`
///
/// Example:
///   let pool = init_db_pool("data/newsdeck.db").await?;
pub async fn init_db_pool(path: &str) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = Path::new(path).parent() {
        tokio::fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create DB parent directory: {}", parent.display())
        })?;
    }

    // Try to create the DB file if it does not already exist. This gives a clearer error
    // earlier (filesystem permission or path issues) instead of only surfacing it via the
    // SQLite connection attempt.
    tokio::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to create or open DB file: {}", path))?;

    // Migrations are intended to be executed explicitly by the caller (for example, from `main`)
    // using `run_migrations(pool)` once a `SqlitePool` is available.
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to sqlite database at path: {}", path))?;

    Ok(pool)
}
