//! Configuration management for the body-metrics CLI
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: BM__)

use anyhow::{Context, Result};
use body_metrics_shared::CalendarDate;
use serde::{Deserialize, Serialize};
use std::env;
use validator::Validate;

/// Environment variable selecting the config file
pub const ENV_VAR: &str = "BODY_METRICS_ENV";

/// Output format of the evaluated report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    #[serde(default)]
    pub report: ReportConfig,
    #[validate(nested)]
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Report generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReportConfig {
    pub format: ReportFormat,
    /// Measurement date for rows without one; today when unset
    #[validate(custom(function = "validate_reference_date"))]
    pub default_reference_date: Option<String>,
    pub include_missing_fields: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Csv,
            default_reference_date: None,
            include_missing_fields: true,
        }
    }
}

impl ReportConfig {
    /// Parsed default reference date, if configured
    pub fn reference_date(&self) -> Result<Option<CalendarDate>> {
        self.default_reference_date
            .as_deref()
            .map(|text| {
                text.parse::<CalendarDate>()
                    .with_context(|| format!("Invalid report.default_reference_date: {}", text))
            })
            .transpose()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// JSON lines instead of pretty output
    pub json: bool,
    #[validate(length(min = 1))]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: "body_metrics_cli=info,body_metrics_shared=info".to_string(),
        }
    }
}

fn validate_reference_date(value: &str) -> Result<(), validator::ValidationError> {
    value
        .parse::<CalendarDate>()
        .map(|_| ())
        .map_err(|_| validator::ValidationError::new("calendar_date"))
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on BODY_METRICS_ENV (development.toml or production.toml)
    /// 3. Environment variables with BM__ prefix
    pub fn load() -> Result<Self> {
        let config_file = format!("config/{}.toml", Self::environment());

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., BM__REPORT__FORMAT=json sets report.format
            .add_source(config::Environment::with_prefix("BM").separator("__"))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Name of the active environment, `development` unless overridden
    pub fn environment() -> String {
        env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string())
    }

    pub fn is_production() -> bool {
        Self::environment() == "production"
    }
}
