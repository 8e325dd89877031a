//! Configuration loading and resolution
//!
//! Settings are resolved with the following priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (`VOICEGUARD_*`)
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! A missing TOML file is never fatal: a warning is logged and defaults are
//! used. A TOML file that exists but cannot be parsed IS an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// API key used when nothing else is configured
pub const DEFAULT_API_KEY: &str = "test123";

/// Service name reported by the health endpoint
pub const DEFAULT_SERVICE_NAME: &str = "AI Voice Detection API";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Default request body limit (base64 inflates audio by ~4/3)
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 25 * 1024 * 1024;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "VOICEGUARD_CONFIG";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; absent values fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Static token expected in the `x-api-key` header
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub service_name: Option<String>,

    /// Directory for decoded/downloaded audio clips
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Serialized classifier model (JSON). Random fallback when absent.
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    #[serde(default)]
    pub max_body_bytes: Option<usize>,

    #[serde(default)]
    pub max_download_bytes: Option<u64>,

    #[serde(default)]
    pub download_timeout_secs: Option<u64>,

    #[serde(default)]
    pub features: FeatureSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Feature extraction settings (`[features]` table)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureSettings {
    /// Sample rate audio is resampled to before analysis (Hz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Only the first `max_duration_secs` of a clip are analysed
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: f64,

    /// Number of MFCC coefficients
    #[serde(default = "default_n_mfcc")]
    pub n_mfcc: usize,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            max_duration_secs: default_max_duration_secs(),
            n_mfcc: default_n_mfcc(),
        }
    }
}

/// Logging configuration (`[logging]` table)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_sample_rate() -> u32 {
    16_000
}

fn default_max_duration_secs() -> f64 {
    10.0
}

fn default_n_mfcc() -> usize {
    40
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_key: Option<String>,
    pub model_path: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub service_name: String,
    pub temp_dir: PathBuf,
    pub model_path: Option<PathBuf>,
    pub max_body_bytes: usize,
    pub max_download_bytes: u64,
    pub download_timeout_secs: u64,
    pub features: FeatureSettings,
    pub logging: LoggingConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: DEFAULT_API_KEY.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            temp_dir: default_temp_dir(),
            model_path: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            features: FeatureSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Resolve configuration: CLI → ENV → TOML → defaults
    pub fn resolve(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let defaults = Self::default();

        let host = overrides
            .host
            .clone()
            .or_else(|| env_string("VOICEGUARD_HOST"))
            .or_else(|| toml_config.host.clone())
            .unwrap_or(defaults.host);

        let port = match overrides.port {
            Some(port) => port,
            None => match env_parsed::<u16>("VOICEGUARD_PORT")? {
                Some(port) => port,
                None => toml_config.port.unwrap_or(defaults.port),
            },
        };

        let api_key = resolve_api_key(overrides, toml_config);

        let service_name = toml_config
            .service_name
            .clone()
            .unwrap_or(defaults.service_name);

        let temp_dir = overrides
            .temp_dir
            .clone()
            .or_else(|| env_string("VOICEGUARD_TEMP_DIR").map(PathBuf::from))
            .or_else(|| toml_config.temp_dir.clone())
            .unwrap_or(defaults.temp_dir);

        let model_path = overrides
            .model_path
            .clone()
            .or_else(|| env_string("VOICEGUARD_MODEL_PATH").map(PathBuf::from))
            .or_else(|| toml_config.model_path.clone());

        let mut logging = toml_config.logging.clone();
        if let Some(level) = env_string("VOICEGUARD_LOG_LEVEL") {
            logging.level = level;
        }

        let config = Self {
            host,
            port,
            api_key,
            service_name,
            temp_dir,
            model_path,
            max_body_bytes: toml_config.max_body_bytes.unwrap_or(defaults.max_body_bytes),
            max_download_bytes: toml_config
                .max_download_bytes
                .unwrap_or(defaults.max_download_bytes),
            download_timeout_secs: toml_config
                .download_timeout_secs
                .unwrap_or(defaults.download_timeout_secs),
            features: toml_config.features.clone(),
            logging,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("api_key must not be empty".to_string()));
        }
        if self.features.sample_rate == 0 {
            return Err(Error::Config("features.sample_rate must be > 0".to_string()));
        }
        let duration = self.features.max_duration_secs;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Error::Config(
                "features.max_duration_secs must be > 0".to_string(),
            ));
        }
        if self.features.n_mfcc == 0 || self.features.n_mfcc > 128 {
            return Err(Error::Config(format!(
                "features.n_mfcc must be within 1..=128, got {}",
                self.features.n_mfcc
            )));
        }
        if self.max_body_bytes == 0 || self.max_download_bytes == 0 {
            return Err(Error::Config("size limits must be > 0".to_string()));
        }
        Ok(())
    }

    /// `host:port` string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True when no API key was configured anywhere
    pub fn uses_default_api_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }
}

/// API key priority: CLI → `VOICEGUARD_API_KEY` → `API_KEY` → TOML → default
fn resolve_api_key(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> String {
    overrides
        .api_key
        .clone()
        .or_else(|| env_string("VOICEGUARD_API_KEY"))
        .or_else(|| env_string("API_KEY"))
        .or_else(|| toml_config.api_key.clone())
        .unwrap_or_else(|| DEFAULT_API_KEY.to_string())
}

/// Default directory for temporary audio files
pub fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("voiceguard-audio")
}

/// Locate the TOML config file
///
/// Search order: explicit path → `VOICEGUARD_CONFIG` →
/// `~/.config/voiceguard/config.toml` → `/etc/voiceguard/config.toml`.
/// An explicit path is returned even if it does not exist so the caller can
/// warn about it.
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env_string(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("voiceguard").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/voiceguard/config.toml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the TOML config, falling back to defaults when no file exists
pub fn load_or_default(explicit: Option<&Path>) -> Result<TomlConfig> {
    match locate_config_file(explicit) {
        Some(path) if path.exists() => {
            let config = load_toml_config(&path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        Some(path) => {
            warn!(
                "Config file {} not found, using defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            info!("No config file found, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env_string(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid {}='{}': {}", name, raw, e))),
        None => Ok(None),
    }
}
