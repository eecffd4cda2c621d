//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Log output format for the local server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("unknown log format '{}'", other)),
        }
    }
}

/// Order line limits enforced on top of the allocation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineLimitsConfig {
    pub max_projects_per_line: usize,
    pub max_range_span: u32,
    pub max_quantity_per_project: u64,
    pub max_line_total: u64,
    pub allow_zero_total: bool,
}

impl Default for LineLimitsConfig {
    fn default() -> Self {
        Self {
            max_projects_per_line: 100,
            max_range_span: 50,
            max_quantity_per_project: 10_000,
            max_line_total: 100_000,
            allow_zero_total: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Runtime configuration
    pub rust_log: String,
    pub log_format: LogFormat,
    pub port: u16,

    /// Order line policy
    pub limits: LineLimitsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rust_log: "keepsake=debug".to_string(),
            log_format: LogFormat::default(),
            port: 3000,
            limits: LineLimitsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = LineLimitsConfig::default();

        let config = Self {
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "keepsake=debug".to_string()),
            log_format: parse_var("LOG_FORMAT", LogFormat::default())?,
            port: parse_var("PORT", 3000)?,
            limits: LineLimitsConfig {
                max_projects_per_line: parse_var(
                    "MAX_PROJECTS_PER_LINE",
                    defaults.max_projects_per_line,
                )?,
                max_range_span: parse_var("MAX_RANGE_SPAN", defaults.max_range_span)?,
                max_quantity_per_project: parse_var(
                    "MAX_QUANTITY_PER_PROJECT",
                    defaults.max_quantity_per_project,
                )?,
                max_line_total: parse_var("MAX_LINE_TOTAL", defaults.max_line_total)?,
                allow_zero_total: parse_var("ALLOW_ZERO_TOTAL", defaults.allow_zero_total)?,
            },
        };

        Ok(config)
    }
}

/// Read an optional variable; a present but unparsable value is an error
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e))
}
