//! # API Configuration
//!
//! Configuration for the HTTP server and the database it drives.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KASIR_PORT=9000                                                    │
//! │     KASIR_API_KEY=secret   (API_KEY also accepted)                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or KASIR_CONFIG, or                               │
//! │     ~/.config/kasir/kasir.toml (Linux)                                 │
//! │     ~/Library/Application Support/id.kasir.kasir/kasir.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:8080, ./kasir.db, no API key, UTC reports                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1"
//! port = 8080
//!
//! [database]
//! path = "/var/lib/kasir/kasir.db"
//! max_connections = 5
//! lock_timeout_ms = 5000
//! checkout_timeout_ms = 10000
//!
//! [auth]
//! api_key = "change-me"
//!
//! [report]
//! utc_offset_minutes = 420  # WIB
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use kasir_db::pool::MAX_UTC_OFFSET_MINUTES;
use kasir_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "KASIR_CONFIG";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// SQLite file and transaction bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a checkout waits for another checkout's write lock.
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_ms: u64,

    /// Upper bound on one whole checkout, lock wait included.
    #[serde(default = "default_checkout_timeout")]
    pub checkout_timeout_ms: u64,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("kasir.db")
}

fn default_max_connections() -> u32 {
    5
}

fn default_lock_timeout() -> u64 {
    5_000
}

fn default_checkout_timeout() -> u64 {
    10_000
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
            lock_timeout_ms: default_lock_timeout(),
            checkout_timeout_ms: default_checkout_timeout(),
        }
    }
}

/// API key protection. `None` leaves the API open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Reporting calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Offset of the store's local time from UTC, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete API configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub report: ReportSettings,
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `KASIR_CONFIG`, else kasir.toml
    ///    in the platform config dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with a custom environment lookup.
    pub fn load_with(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let explicit = config_path.or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(env)?;
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading API config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.database.checkout_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "database.checkout_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.database.lock_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "database.lock_timeout_ms must be greater than 0".into(),
            ));
        }

        if self.report.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "report.utc_offset_minutes must be within ±{}",
                MAX_UTC_OFFSET_MINUTES
            )));
        }

        if matches!(self.auth.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
            return Err(ConfigError::Invalid("auth.api_key must not be blank".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(addr) = env("KASIR_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = env("KASIR_PORT") {
            self.server.port = parse_env("KASIR_PORT", &port)?;
            debug!(port = self.server.port, "Overriding port from environment");
        }

        if let Some(path) = env("KASIR_DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }

        if let Some(ms) = env("KASIR_CHECKOUT_TIMEOUT_MS") {
            self.database.checkout_timeout_ms = parse_env("KASIR_CHECKOUT_TIMEOUT_MS", &ms)?;
        }

        if let Some(ms) = env("KASIR_LOCK_TIMEOUT_MS") {
            self.database.lock_timeout_ms = parse_env("KASIR_LOCK_TIMEOUT_MS", &ms)?;
        }

        if let Some(minutes) = env("KASIR_REPORT_UTC_OFFSET_MINUTES") {
            self.report.utc_offset_minutes =
                parse_env("KASIR_REPORT_UTC_OFFSET_MINUTES", &minutes)?;
        }

        // An empty variable switches authentication off.
        if let Some(key) = env("KASIR_API_KEY").or_else(|| env("API_KEY")) {
            self.auth.api_key = Some(key).filter(|k| !k.is_empty());
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "kasir", "kasir")
            .map(|dirs| dirs.config_dir().join("kasir.toml"))
    }

    /// Builds the database configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database.path.clone())
            .max_connections(self.database.max_connections)
            .lock_timeout(Duration::from_millis(self.database.lock_timeout_ms))
            .checkout_timeout(Duration::from_millis(self.database.checkout_timeout_ms))
            .report_utc_offset_minutes(self.report.utc_offset_minutes)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.checkout_timeout_ms, 10_000);
        assert!(config.auth.api_key.is_none());
        assert_eq!(config.report.utc_offset_minutes, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ApiConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [report]
            utc_offset_minutes = 420
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.database.path, PathBuf::from("kasir.db"));
        assert_eq!(config.report.utc_offset_minutes, 420);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kasir.toml");
        std::fs::write(&path, "[server]\nport = 9000\n[auth]\napi_key = \"from-file\"\n").unwrap();

        let config = ApiConfig::load_with(
            Some(path),
            env_of(&[("KASIR_PORT", "9100"), ("API_KEY", "from-env")]),
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.auth.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_kasir_api_key_wins_over_api_key() {
        let mut config = ApiConfig::default();
        config
            .apply_env_overrides(env_of(&[("KASIR_API_KEY", "primary"), ("API_KEY", "fallback")]))
            .unwrap();
        assert_eq!(config.auth.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_empty_api_key_disables_auth() {
        let mut config = ApiConfig::default();
        config.auth.api_key = Some("secret".into());
        config
            .apply_env_overrides(env_of(&[("KASIR_API_KEY", "")]))
            .unwrap();
        assert!(config.auth.api_key.is_none());
    }

    #[test]
    fn test_invalid_env_value_is_reported() {
        let mut config = ApiConfig::default();
        let err = config
            .apply_env_overrides(env_of(&[("KASIR_CHECKOUT_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "KASIR_CHECKOUT_TIMEOUT_MS"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ApiConfig::load_with(Some(dir.path().join("nope.toml")), env_of(&[]));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ApiConfig::default();
        config.database.checkout_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.report.utc_offset_minutes = 15 * 60;
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.auth.api_key = Some("   ".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_db_config_carries_timeouts() {
        let mut config = ApiConfig::default();
        config.database.lock_timeout_ms = 250;
        config.database.checkout_timeout_ms = 1_500;
        config.report.utc_offset_minutes = 420;

        let db = config.db_config();
        assert_eq!(db.lock_timeout, Duration::from_millis(250));
        assert_eq!(db.checkout_timeout, Duration::from_millis(1_500));
        assert_eq!(db.report_utc_offset_minutes, 420);
    }
}
