//! Layered configuration.
//!
//! Values are resolved in order: built-in defaults, an optional TOML file,
//! then `ACTUATOR_DASH_*` environment variables. Command-line flags are
//! applied on top by the binary.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::source::DEFAULT_BASE_URL;

const ENV_PREFIX: &str = "ACTUATOR_DASH";

pub const DEFAULT_REFRESH_INTERVAL: &str = "5s";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "10s";
pub const DEFAULT_LOG_FILE: &str = "actuator-dash.log";
pub const DEFAULT_EXPORT_PATH: &str = "dashboard_export.json";

/// Dashboard settings.
///
/// Durations are kept as humantime strings ("5s", "1m 30s") until used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    pub base_url: String,
    pub refresh_interval: String,
    pub request_timeout: String,
    pub log_file: String,
    pub export_path: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT.to_string(),
            log_file: DEFAULT_LOG_FILE.to_string(),
            export_path: DEFAULT_EXPORT_PATH.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("refresh_interval", defaults.refresh_interval)?
            .set_default("request_timeout", defaults.request_timeout)?
            .set_default("log_file", defaults.log_file)?
            .set_default("export_path", defaults.export_path)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to load configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    pub fn refresh_interval(&self) -> Result<Duration> {
        parse_nonzero("refresh_interval", &self.refresh_interval)
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        parse_nonzero("request_timeout", &self.request_timeout)
    }
}

fn parse_nonzero(key: &str, value: &str) -> Result<Duration> {
    let duration = humantime::parse_duration(value)
        .with_context(|| format!("{} is not a duration: {:?}", key, value))?;
    if duration.is_zero() {
        bail!("{} must be greater than zero", key);
    }
    Ok(duration)
}
