//! Configuration management for `skycast`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkycastError;
use crate::models::Location;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for `skycast`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkycastConfig {
    /// Upstream weather provider configuration
    pub provider: ProviderConfig,
    /// Cache configuration
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Location used when the caller does not name one
    pub location: LocationConfig,
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Forecast endpoint
    pub base_url: String,
    /// Deadline for one upstream call, in seconds
    pub timeout_seconds: u32,
    /// User-Agent sent upstream; MET Norway rejects anonymous clients
    pub user_agent: String,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Disable to bypass the cache entirely
    pub enabled: bool,
    /// Cache TTL in minutes
    pub ttl_minutes: u32,
    /// Cache directory location, `~/` is expanded
    pub directory: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// Default location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
}

// Default value functions
fn default_base_url() -> String {
    "https://api.met.no/weatherapi/locationforecast/2.0/compact".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("skycast/{} github.com/skycast/skycast", crate::VERSION)
}

fn default_cache_ttl() -> u32 {
    10
}

fn default_cache_directory() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("skycast").to_string_lossy().to_string())
        .unwrap_or_else(|| "~/.cache/skycast".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_minutes: default_cache_ttl(),
            directory: default_cache_directory(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: Some("Stavern, Norway".to_string()),
            latitude: 59.0,
            longitude: 10.0,
            timezone: Some("Europe/Oslo".to_string()),
        }
    }
}

impl ProviderConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl_minutes) * 60)
    }

    /// Cache directory with a leading `~/` resolved against the home directory
    #[must_use]
    pub fn directory_path(&self) -> PathBuf {
        match (self.directory.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.directory),
        }
    }
}

impl LocationConfig {
    /// Validated location built from these settings
    pub fn to_location(&self) -> crate::Result<Location> {
        let mut location = Location::new(self.latitude, self.longitude)?;
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            location = location.with_name(name);
        }
        if let Some(tz) = self.timezone.as_deref().filter(|tz| !tz.is_empty()) {
            location = location.with_timezone(tz);
        }
        Ok(location)
    }
}

impl SkycastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. SKYCAST_CACHE__TTL_MINUTES=30
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.provider.base_url.is_empty() {
            self.provider.base_url = default_base_url();
        }
        if self.provider.timeout_seconds == 0 {
            self.provider.timeout_seconds = default_timeout();
        }
        if self.provider.user_agent.is_empty() {
            self.provider.user_agent = default_user_agent();
        }
        if self.cache.ttl_minutes == 0 {
            self.cache.ttl_minutes = default_cache_ttl();
        }
        if self.cache.directory.is_empty() {
            self.cache.directory = default_cache_directory();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.location
            .to_location()
            .with_context(|| "Invalid default location")?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.provider.timeout_seconds > 300 {
            return Err(
                SkycastError::config("Provider timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.cache.ttl_minutes > 10_080 {
            return Err(SkycastError::config(
                "Cache TTL cannot exceed 10080 minutes (1 week)",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            return Err(SkycastError::config(
                "Provider base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
