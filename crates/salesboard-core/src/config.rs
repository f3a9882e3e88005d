//! salesboard configuration
//!
//! Stored as TOML in `<config dir>/salesboard/config.toml`. Every field has a
//! default, so a partial file (or no file at all) is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::error::CoreError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesboardConfig {
    pub api: ApiConfig,
    pub thresholds: Thresholds,
    pub export: ExportConfig,
}

/// Remote analytics API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout; 0 leaves it to the transport
    pub timeout_secs: u64,
    /// Sent as `X-User-Id` when set
    pub user_id: Option<String>,
    /// Sent as `X-User-Role` when set
    pub user_role: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 0,
            user_id: None,
            user_role: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Business thresholds used by the fallback computations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A product is low on stock below this quantity
    pub low_stock: f64,
    /// Raise a stock insight when more products than this are low
    pub low_stock_alert: usize,
    /// Daily forecast horizon on the sales page
    pub forecast_periods: usize,
    /// Monthly forecast horizon on the overview page
    pub monthly_forecast_periods: usize,
    pub best_sellers_limit: usize,
    pub top_clients_limit: usize,
    pub histogram_bins: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_stock: 5.0,
            low_stock_alert: 5,
            forecast_periods: 7,
            monthly_forecast_periods: 3,
            best_sellers_limit: 5,
            top_clients_limit: 10,
            histogram_bins: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    /// Directory holding the TTF files used for PDF reports
    pub font_dir: PathBuf,
    /// Font family name, e.g. `LiberationSans` for `LiberationSans-Regular.ttf`
    pub font_family: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
            font_dir: PathBuf::from("fonts"),
            font_family: "LiberationSans".to_string(),
        }
    }
}

impl SalesboardConfig {
    /// `<config dir>/salesboard/config.toml`, if a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("salesboard").join(CONFIG_FILE_NAME))
    }

    /// Strict load: missing or malformed files are errors
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CoreError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        toml::from_str(&content).map_err(|e| CoreError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load from `path`, returning defaults on any I/O or parse error
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(CoreError::FileNotFound { .. }) => Self::default(),
            Err(e) => {
                warn!(error = %e, "Ignoring invalid config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
