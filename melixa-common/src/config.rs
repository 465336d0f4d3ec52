//! Configuration loading and resolution
//!
//! Gateway settings are resolved per-field in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or unparseable config file never prevents startup; the
//! gateway logs a warning and continues with defaults.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default gateway listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Default ML inference service base URL
pub const DEFAULT_ML_SERVICE_URL: &str = "http://localhost:8000";

/// Upstream /predict forward timeout
pub const DEFAULT_PREDICT_TIMEOUT: Duration = Duration::from_secs(60);

/// Multipart upload size limit (100 MiB)
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Environment variable names recognized by the resolver
pub const ENV_PORT: &str = "MELIXA_GATEWAY_PORT";
pub const ENV_ML_SERVICE_URL: &str = "MELIXA_ML_SERVICE_URL";
pub const ENV_UPLOAD_DIR: &str = "MELIXA_UPLOAD_DIR";

/// Fully resolved gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Port to listen on
    pub port: u16,
    /// Base URL of the upstream ML service (no trailing slash)
    pub ml_service_url: String,
    /// Directory where uploads are spooled before forwarding
    pub upload_dir: PathBuf,
    /// Timeout applied to the upstream /predict forward
    pub predict_timeout: Duration,
    /// Maximum accepted multipart body size in bytes
    pub max_upload_bytes: usize,
}

/// Per-field command-line overrides, passed in from clap
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub ml_service_url: Option<String>,
    pub upload_dir: Option<PathBuf>,
}

/// On-disk TOML schema (`gateway.toml`)
///
/// Every field is optional; absent fields fall through to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub ml_service_url: Option<String>,
    pub upload_dir: Option<PathBuf>,
    pub predict_timeout_secs: Option<u64>,
}

impl GatewayConfig {
    /// Resolve configuration from CLI overrides, environment, config
    /// file, and compiled defaults, in that order.
    pub fn resolve(cli: ConfigOverrides) -> Self {
        let file = load_toml_config();

        let port = cli
            .port
            .or_else(|| env_parsed(ENV_PORT))
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let ml_service_url = cli
            .ml_service_url
            .or_else(|| std::env::var(ENV_ML_SERVICE_URL).ok())
            .or(file.ml_service_url)
            .unwrap_or_else(|| DEFAULT_ML_SERVICE_URL.to_string());

        let upload_dir = cli
            .upload_dir
            .or_else(|| std::env::var(ENV_UPLOAD_DIR).ok().map(PathBuf::from))
            .or(file.upload_dir)
            .unwrap_or_else(default_upload_dir);

        let predict_timeout = file
            .predict_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_PREDICT_TIMEOUT);

        Self {
            port,
            ml_service_url: ml_service_url.trim_end_matches('/').to_string(),
            upload_dir,
            predict_timeout,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }

    /// Create the upload spool directory if it does not exist.
    ///
    /// Idempotent; safe to call on every startup.
    pub fn ensure_upload_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.upload_dir)?;
        Ok(())
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unparseable {}: {:?}", name, raw);
                None
            }
        },
        Err(_) => None,
    }
}

/// Locate the gateway config file for the platform
///
/// Linux checks `~/.config/melixa/gateway.toml` then
/// `/etc/melixa/gateway.toml`; other platforms use the OS config dir.
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("melixa").join("gateway.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/melixa/gateway.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

fn load_toml_config() -> TomlConfig {
    match config_file_path() {
        Some(path) => parse_toml_config(&path),
        None => TomlConfig::default(),
    }
}

fn parse_toml_config(path: &Path) -> TomlConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Could not read config file {}: {}", path.display(), e);
            return TomlConfig::default();
        }
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// OS-dependent default upload spool directory
fn default_upload_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("melixa").join("uploads"))
        .unwrap_or_else(|| PathBuf::from("./melixa_uploads"))
}
