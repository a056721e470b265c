//! Runtime configuration.
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. command-line flags and their environment variables ([`GlobalArgs`])
//! 2. an optional YAML file (`--config` / `SCRAPER_CONFIG`)
//! 3. built-in defaults
//!
//! # YAML keys
//!
//! ```yaml
//! db_path: articles.db
//! gemini_api_key: "..."
//! gemini_model: gemini-2.0-flash
//! max_concurrent: 5
//! timeout_secs: 30
//! summary_interval_ms: 1000
//! max_summary_input_chars: 8000
//! ```

use crate::cli::GlobalArgs;
use crate::dispatcher::DEFAULT_MAX_CONCURRENT;
use crate::errors::ConfigError;
use crate::fetcher::DEFAULT_TIMEOUT;
use crate::store::DEFAULT_DB_PATH;
use crate::summarizer::{DEFAULT_INTERVAL, DEFAULT_MAX_INPUT_CHARS, DEFAULT_MODEL};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub db_path: Option<PathBuf>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub max_concurrent: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub summary_interval_ms: Option<u64>,
    pub max_summary_input_chars: Option<usize>,
}

impl FileConfig {
    /// Read and parse the YAML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let location = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: location.clone(),
            source,
        })?;
        let config: FileConfig = serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: location.clone(),
            source,
        })?;
        info!(path = %location, "Loaded configuration file");
        Ok(config)
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub max_concurrent: usize,
    pub timeout: Duration,
    pub summary_interval: Duration,
    pub max_summary_input_chars: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: DEFAULT_TIMEOUT,
            summary_interval: DEFAULT_INTERVAL,
            max_summary_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

impl AppConfig {
    /// Layer `args` over `file` over the defaults.
    pub fn resolve(args: &GlobalArgs, file: FileConfig) -> Self {
        let defaults = AppConfig::default();
        let config = Self {
            db_path: args
                .db_path
                .clone()
                .or(file.db_path)
                .unwrap_or(defaults.db_path),
            gemini_api_key: args
                .gemini_api_key
                .clone()
                .or(file.gemini_api_key)
                .filter(|k| !k.trim().is_empty()),
            gemini_model: args
                .gemini_model
                .clone()
                .or(file.gemini_model)
                .unwrap_or(defaults.gemini_model),
            max_concurrent: args
                .max_concurrent
                .or(file.max_concurrent)
                .unwrap_or(defaults.max_concurrent),
            timeout: args
                .timeout_secs
                .or(file.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            summary_interval: file
                .summary_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.summary_interval),
            max_summary_input_chars: file
                .max_summary_input_chars
                .unwrap_or(defaults.max_summary_input_chars),
        };
        debug!(
            db_path = %config.db_path.display(),
            model = %config.gemini_model,
            max_concurrent = config.max_concurrent,
            timeout_secs = config.timeout.as_secs(),
            has_api_key = config.gemini_api_key.is_some(),
            "Resolved configuration"
        );
        config
    }

    /// Load the config file named in `args` (if any) and resolve.
    pub fn load(args: &GlobalArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(args, file))
    }
}
