//! Configuration handling for flatext.
//!
//! The config file is TOML. Every field has a default, so an absent file or
//! an empty one behaves the same.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use flatext_extract::{ExtractConfig, OcrConfig};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "FLATEXT_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Input limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// OCR configuration
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LimitsConfig {
    /// Largest file accepted, in bytes (0 = unlimited)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
    52_428_800 // 50MB
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

impl LimitsConfig {
    /// Whether a file of `size` bytes is over the limit.
    #[must_use]
    pub fn exceeds(&self, size: u64) -> bool {
        self.max_file_size != 0 && size > self.max_file_size
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::read(&path),
            None => match Self::config_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Default config file location.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join(CONFIG_FILE))
    }

    /// Backend settings for the extractor registry.
    #[must_use]
    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            ocr: self.ocr.clone(),
        }
    }

    /// Annotated sample configuration file.
    #[must_use]
    pub fn sample_toml() -> &'static str {
        r#"# flatext configuration

[limits]
# Largest file accepted, in bytes (0 = unlimited)
max_file_size = 52428800

[ocr]
# Tesseract language code(s), e.g. "eng" or "eng+deu"
language = "eng"
# Directory containing *.traineddata files
# data_path = "/usr/share/tesseract-ocr/5/tessdata"

[logging]
# error, warn, info, debug or trace
level = "info"
"#
    }
}

/// Get the config directory for flatext.
pub fn config_dir() -> Option<PathBuf> {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV))
}

fn resolve_config_dir(override_dir: Option<OsString>) -> Option<PathBuf> {
    if let Some(dir) = override_dir.filter(|dir| !dir.is_empty()) {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "flatext").map(|dirs| dirs.config_dir().to_path_buf())
}
