use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

/// Which key-value store holds the persisted snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    File,
    Redis,
    Memory,
}

impl StoreBackend {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE_BACKEND must be one of file, redis, memory (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub store_backend: StoreBackend,
    pub snapshot_dir: PathBuf,
    pub redis_url: Option<String>,
    /// Prefix of the per-session snapshot key.
    pub snapshot_key: String,
    /// Open sessions untouched for this long are dropped from memory.
    pub session_idle: Duration,
}

impl Config {
    /// Defaults for a single-machine setup with file-backed snapshots.
    pub fn local_defaults() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            store_backend: StoreBackend::File,
            snapshot_dir: PathBuf::from("./data"),
            redis_url: None,
            snapshot_key: "cvData".to_string(),
            session_idle: Duration::from_secs(30 * 60),
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::local_defaults();
        let store_backend = match std::env::var("STORE_BACKEND") {
            Ok(raw) => StoreBackend::parse(&raw)?,
            Err(_) => defaults.store_backend,
        };
        let redis_url = std::env::var("REDIS_URL").ok();
        if store_backend == StoreBackend::Redis && redis_url.is_none() {
            bail!("Required environment variable 'REDIS_URL' is not set (STORE_BACKEND=redis)");
        }

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            store_backend,
            snapshot_dir: std::env::var("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_dir),
            redis_url,
            snapshot_key: std::env::var("SNAPSHOT_KEY").unwrap_or(defaults.snapshot_key),
            session_idle: match std::env::var("SESSION_IDLE_SECS") {
                Ok(raw) => Duration::from_secs(
                    raw.parse::<u64>()
                        .context("SESSION_IDLE_SECS must be a whole number of seconds")?,
                ),
                Err(_) => defaults.session_idle,
            },
        })
    }

    /// The single store key holding one session's snapshot.
    pub fn snapshot_key_for(&self, session_id: Uuid) -> String {
        format!("{}:{}", self.snapshot_key, session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(StoreBackend::parse("file").unwrap(), StoreBackend::File);
        assert_eq!(StoreBackend::parse(" Redis ").unwrap(), StoreBackend::Redis);
        assert_eq!(StoreBackend::parse("memory").unwrap(), StoreBackend::Memory);
        assert!(StoreBackend::parse("postgres").is_err());
    }

    #[test]
    fn test_sessions_idle_out_after_thirty_minutes_by_default() {
        assert_eq!(
            Config::local_defaults().session_idle,
            Duration::from_secs(1800)
        );
    }

    #[test]
    fn test_snapshot_key_is_prefixed_per_session() {
        let config = Config::local_defaults();
        let id = Uuid::nil();
        assert_eq!(
            config.snapshot_key_for(id),
            "cvData:00000000-0000-0000-0000-000000000000"
        );
    }
}
