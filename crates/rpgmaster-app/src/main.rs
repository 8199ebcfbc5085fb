//! RPG Master server binary.
//!
//! Wires configuration, logging, storage, and the HTTP server together
//! and serves until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `rpgmaster-config.yaml` (or the path in
//!    `RPGMASTER_CONFIG`), falling back to defaults
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `SQLite` and run migrations
//! 4. Assemble the shared state (relay, whiteboard, content library)
//! 5. Serve HTTP until shutdown

mod error;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rpgmaster_core::config::LoggingConfig;
use rpgmaster_core::{AppConfig, LogFormat};
use rpgmaster_db::{Database, SqliteConfig};
use rpgmaster_server::{AppState, ServerConfig, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "rpgmaster-config.yaml";

/// Environment variable naming an alternative configuration file.
const CONFIG_PATH_ENV: &str = "RPGMASTER_CONFIG";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, storage, or the server fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("rpgmaster starting");
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        max_body_bytes = config.server.max_body_bytes,
        database_url = config.storage.database_url,
        retention = ?config.relay.retention,
        "Effective configuration"
    );

    // 3. Connect to SQLite and run migrations.
    let db_config = SqliteConfig::new(&config.storage.database_url)
        .with_max_connections(config.storage.max_connections)
        .with_connect_timeout(Duration::from_secs(config.storage.connect_timeout_secs));
    let db = Database::connect(&db_config).await?;
    db.run_migrations().await?;

    // 4. Assemble shared state.
    let state = Arc::new(AppState::from_config(db.clone(), &config));

    // 5. Serve.
    let server_config = ServerConfig::from(&config.server);
    let result = start_server(&server_config, state).await;

    db.close().await;
    result?;
    info!("rpgmaster stopped");
    Ok(())
}

/// Load configuration, returning the file it came from.
///
/// A missing file is not an error: defaults are used, and environment
/// overrides still apply.
fn load_config() -> Result<(AppConfig, Option<PathBuf>), AppError> {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = AppConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        let mut config = AppConfig::default();
        config.apply_env_overrides()?;
        Ok((config, None))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    match logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
