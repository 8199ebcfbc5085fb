//! Configuration loading and typed config structures for RPG Master.
//!
//! The configuration lives in `rpgmaster-config.yaml` next to the binary.
//! Every field has a default, so an empty or missing file yields a
//! working single-table setup backed by files under `instance/`.

use std::path::{Path, PathBuf};

use rpgmaster_types::{CommandKind, RelayRetention};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid environment override {name}: {value}")]
    Env {
        /// The variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Default request body cap: 64 MiB, enough for large whiteboard drawings.
pub const DEFAULT_MAX_BODY_BYTES: usize = 67_108_864;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ListenConfig,

    /// Database and durable record locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Screen command relay behavior.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Content library directories.
    #[serde(default)]
    pub content: ContentConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `HOST` overrides `server.host`
    /// - `PORT` overrides `server.port`
    /// - `DATABASE_URL` overrides `storage.database_url`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Env`] if an override cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override settings with environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `PORT` is not a valid port number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            self.server.port = val
                .parse()
                .map_err(|_parse_err| ConfigError::Env { name: "PORT", value: val.clone() })?;
        }
        if let Ok(val) = std::env::var("DATABASE_URL") {
            self.storage.database_url = val;
        }
        Ok(())
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListenConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body in bytes; `0` removes the cap.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` connection URL for the roster and cursor tables.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// File holding the latest screen command.
    #[serde(default = "default_screen_command_file")]
    pub screen_command_file: PathBuf,

    /// File holding the latest whiteboard drawing.
    #[serde(default = "default_whiteboard_file")]
    pub whiteboard_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_connections: default_max_connections(),
            screen_command_file: default_screen_command_file(),
            whiteboard_file: default_whiteboard_file(),
        }
    }
}

/// Screen command relay configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelayConfig {
    /// Whether superseded commands stay recoverable.
    #[serde(default)]
    pub retention: RelayRetention,

    /// Kind returned to displays when nothing has been published.
    #[serde(default)]
    pub default_kind: CommandKind,
}

/// Content library directories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentConfig {
    /// Monster entries (also used for portrait lookup).
    #[serde(default = "default_monsters_dir")]
    pub monsters_dir: PathBuf,

    /// Spell entries.
    #[serde(default = "default_spells_dir")]
    pub spells_dir: PathBuf,

    /// Rule entries.
    #[serde(default = "default_rules_dir")]
    pub rules_dir: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            monsters_dir: default_monsters_dir(),
            spells_dir: default_spells_dir(),
            rules_dir: default_rules_dir(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

const fn default_port() -> u16 {
    5000
}

const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

fn default_database_url() -> String {
    "sqlite://instance/app.db".to_owned()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_screen_command_file() -> PathBuf {
    PathBuf::from("instance/screen_command.json")
}

fn default_whiteboard_file() -> PathBuf {
    PathBuf::from("instance/whiteboard_state.json")
}

fn default_monsters_dir() -> PathBuf {
    PathBuf::from("resources/monsters")
}

fn default_spells_dir() -> PathBuf {
    PathBuf::from("resources/spells")
}

fn default_rules_dir() -> PathBuf {
    PathBuf::from("resources/rules")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.database_url, "sqlite://instance/app.db");
        assert_eq!(config.relay.retention, RelayRetention::KeepLast);
        assert_eq!(config.relay.default_kind, CommandKind::Initiative);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "0.0.0.0"
  port: 8080
  max_body_bytes: 0

storage:
  database_url: "sqlite::memory:"
  max_connections: 1
  connect_timeout_secs: 10
  screen_command_file: "/tmp/screen.json"
  whiteboard_file: "/tmp/board.json"

relay:
  retention: append_all
  default_kind: clear

content:
  monsters_dir: "content/bestiary"
  spells_dir: "content/spells"
  rules_dir: "content/rules"

logging:
  level: "debug"
  format: json
"#;

        let config = AppConfig::parse_without_env(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_body_bytes, 0);
        assert_eq!(config.storage.connect_timeout_secs, 10);
        assert_eq!(config.storage.max_connections, 1);
        assert_eq!(config.storage.screen_command_file, PathBuf::from("/tmp/screen.json"));
        assert_eq!(config.relay.retention, RelayRetention::AppendAll);
        assert_eq!(config.relay.default_kind, CommandKind::Clear);
        assert_eq!(config.content.monsters_dir, PathBuf::from("content/bestiary"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = AppConfig::parse_without_env("server:\n  port: 7000\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.content, ContentConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = AppConfig::parse_without_env("");
        assert!(config.is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let config = AppConfig::parse_without_env("server: [unclosed");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn unknown_retention_is_rejected() {
        let config = AppConfig::parse_without_env("relay:\n  retention: forever\n");
        assert!(config.is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir();
        assert!(dir.is_ok());
        if let Ok(dir) = dir {
            let config = AppConfig::from_file(&dir.path().join("absent.yaml"));
            assert!(matches!(config, Err(ConfigError::Io { .. })));
        }
    }
}
