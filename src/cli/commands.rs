//! CLI command implementations
//!
//! `serve` boots in a fixed order: load config, open and verify the record
//! file, build the router, bind. Any failure halts startup.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::storage::DATA_SUBDIR;
use crate::store::{FileFormStore, FormStore};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// HTTP listener settings (optional)
    #[serde(default)]
    pub server: HttpServerConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        self.server.validate().map_err(CliError::config_error)
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Initialize a new forms data directory
///
/// Creates the directory layout only. No record file is written until the
/// first `serve`.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    let dir = data_dir.join(DATA_SUBDIR);
    fs::create_dir_all(&dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", dir, e))
    })?;

    log_event_with_fields(
        Event::DataDirInitialized,
        &[("data_dir", config.data_dir.as_str())],
    );

    Ok(())
}

/// Start the HTTP API server
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = Config::load(config_path)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("data_dir", config.data_dir.as_str())],
    );

    let data_dir = config.data_path();
    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    let store = open_store(data_dir)?;

    let mut http_config = config.server.clone();
    if let Some(port) = port {
        http_config.port = port;
        http_config.validate().map_err(CliError::config_error)?;
    }
    let server = HttpServer::new(http_config, store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Check whether the data directory layout exists
fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join(DATA_SUBDIR).exists()
}

/// Open the durable store, verifying every stored record.
fn open_store(data_dir: &Path) -> CliResult<Arc<dyn FormStore>> {
    let store = FileFormStore::open(data_dir).map_err(|e| {
        if e.is_fatal() {
            log_event_with_fields(
                Event::StoreCorruption,
                &[("code", e.code().code()), ("error", e.to_string().as_str())],
            );
        }
        CliError::from(e)
    })?;

    let rows = store.count().map_err(|e| CliError::boot_failed(e.to_string()))?;
    let path = store.data_dir().display().to_string();
    log_event_with_fields(
        Event::StoreOpened,
        &[("data_dir", path.as_str()), ("rows", rows.to_string().as_str())],
    );

    Ok(Arc::new(store))
}
