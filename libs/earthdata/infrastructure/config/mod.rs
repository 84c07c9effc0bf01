use crate::domain::{GranuleQuery, TemporalRange};
use crate::infrastructure::auth::{Credentials, URS_HOST};
use crate::infrastructure::client::cmr::CMR_OPS;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Granule fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// CMR search endpoint
    #[serde(default = "default_cmr_url")]
    pub cmr_url: String,
    /// Earthdata Login host
    #[serde(default = "default_urs_host")]
    pub urs_host: String,
    /// Collection concept ids to search
    #[serde(default = "default_collections")]
    pub collections: Vec<String>,
    #[serde(default)]
    pub temporal: TemporalConfig,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Result pages requested at once
    #[serde(default = "default_page_concurrency")]
    pub page_concurrency: usize,
    /// Upper bound on files downloaded per run (0 = no limit)
    #[serde(default = "default_max_downloads")]
    pub max_downloads: usize,
    #[serde(default = "default_download_concurrency")]
    pub download_concurrency: usize,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Credentials from EARTHDATA_USERNAME / EARTHDATA_PASSWORD (not in YAML)
    #[serde(skip)]
    pub credentials: Option<Credentials>,
}

/// Start and end of the search window, RFC 3339 or `YYYY-MM-DD`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalConfig {
    pub start: String,
    pub end: String,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            start: "2021-10-17".to_string(),
            end: "2021-10-19".to_string(),
        }
    }
}

fn default_cmr_url() -> String {
    CMR_OPS.to_string()
}

fn default_urs_host() -> String {
    URS_HOST.to_string()
}

fn default_collections() -> Vec<String> {
    vec!["C1373412034-LPDAAC_ECS".to_string()]
}

fn default_page_size() -> usize {
    10
}

fn default_page_concurrency() -> usize {
    4
}

fn default_max_downloads() -> usize {
    5
}

fn default_download_concurrency() -> usize {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cmr_url: default_cmr_url(),
            urs_host: default_urs_host(),
            collections: default_collections(),
            temporal: TemporalConfig::default(),
            page_size: default_page_size(),
            page_concurrency: default_page_concurrency(),
            max_downloads: default_max_downloads(),
            download_concurrency: default_download_concurrency(),
            output_dir: default_output_dir(),
            log_level: default_log_level(),
            credentials: None,
        }
    }
}

/// Parse an RFC 3339 timestamp or a bare date (midnight UTC)
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl FetchConfig {
    /// Load configuration from YAML file, `.env` and the environment
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;

        dotenv::dotenv().ok(); // Don't fail if .env doesn't exist

        let mut config = Self::from_yaml(&yaml_content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without touching the environment
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Apply `CMR_URL`, `EARTHDATA_OUTPUT_DIR` and credential overrides
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("CMR_URL") {
            info!("Overriding CMR URL from environment variable");
            self.cmr_url = url;
        }
        if let Some(dir) = lookup("EARTHDATA_OUTPUT_DIR") {
            info!("Overriding output directory from environment variable");
            self.output_dir = PathBuf::from(dir);
        }
        if let (Some(username), Some(password)) =
            (lookup("EARTHDATA_USERNAME"), lookup("EARTHDATA_PASSWORD"))
        {
            info!("Using Earthdata credentials from environment variables");
            self.credentials = Some(Credentials::new(username, password));
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.cmr_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "cmr_url cannot be empty".to_string(),
            ));
        }
        if self.collections.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "collections must list at least one concept id".to_string(),
            ));
        }
        if self.download_concurrency == 0 || self.page_concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "download_concurrency and page_concurrency must be greater than 0".to_string(),
            ));
        }
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }
        self.granule_query()?;
        Ok(())
    }

    pub fn temporal_range(&self) -> Result<TemporalRange> {
        let parse = |field: &str, value: &str| {
            parse_datetime(value).ok_or_else(|| {
                ConfigError::ValidationError(format!("temporal.{field} is not a date: {value}"))
            })
        };
        let start = parse("start", &self.temporal.start)?;
        let end = parse("end", &self.temporal.end)?;
        TemporalRange::new(start, end).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// Build the CMR query described by this configuration
    pub fn granule_query(&self) -> Result<GranuleQuery> {
        let collections = self
            .collections
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        GranuleQuery::with_page_size(collections, self.temporal_range()?, self.page_size)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// `None` when downloads are unlimited
    pub fn download_limit(&self) -> Option<usize> {
        (self.max_downloads > 0).then_some(self.max_downloads)
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  CMR URL: {}", self.cmr_url);
        info!("  Collections: {}", self.collections.join(", "));
        info!("  Temporal: {} .. {}", self.temporal.start, self.temporal.end);
        info!("  Page size: {} ({} concurrent)", self.page_size, self.page_concurrency);
        info!(
            "  Max downloads: {}",
            self.download_limit()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "unlimited".to_string())
        );
        info!("  Download concurrency: {}", self.download_concurrency);
        info!("  Output dir: {}", self.output_dir.display());
        info!("  Log level: {}", self.log_level);
        info!(
            "  Credentials: {}",
            if self.credentials.is_some() { "environment" } else { "netrc" }
        );
    }
}
