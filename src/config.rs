//! Configuration management for the `Stormwatch` service
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings. Credentials are
//! carried in the config struct and passed into components at construction,
//! never read from ambient globals inside a component.

use crate::StormwatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Stormwatch` service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StormwatchConfig {
    /// Weather data source configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// SMS delivery channel configuration
    #[serde(default)]
    pub sms: SmsConfig,
    /// Email delivery channel configuration
    #[serde(default)]
    pub email: EmailConfig,
    /// Forecast-window schedule settings
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// User store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather data source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Weather API key; required before any user is processed
    pub api_key: Option<String>,
    /// Geocoding endpoint URL
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Forecast (one-call) endpoint URL
    #[serde(default = "default_onecall_url")]
    pub onecall_url: String,
    /// Request timeout in seconds for all outbound HTTP calls
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// SMS channel settings; any missing value makes SMS attempts fail
/// structurally rather than crash
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SmsConfig {
    /// Provider account identifier
    pub account_sid: Option<String>,
    /// Provider auth token
    pub auth_token: Option<String>,
    /// Sender phone number
    pub from_number: Option<String>,
}

/// Email channel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Sender address, also used as the relay login
    pub address: Option<String>,
    /// Relay password or app password
    pub password: Option<String>,
    /// SMTP relay host
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
}

/// Morning window during which the 12-hour forecast is evaluated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Local hour the forecast window opens (0-23)
    #[serde(default = "default_window_hour")]
    pub forecast_window_hour: u32,
    /// Minutes past the hour the window stays open (0-59)
    #[serde(default = "default_window_minutes")]
    pub forecast_window_minutes: u32,
}

/// User store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the registered-users JSON file
    #[serde(default = "default_store_path")]
    pub path: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_geocoding_url() -> String {
    "http://api.openweathermap.org/geo/1.0/direct".to_string()
}

fn default_onecall_url() -> String {
    "https://api.openweathermap.org/data/3.0/onecall".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_window_hour() -> u32 {
    5
}

fn default_window_minutes() -> u32 {
    30
}

fn default_store_path() -> String {
    "users.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            geocoding_url: default_geocoding_url(),
            onecall_url: default_onecall_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            address: None,
            password: None,
            smtp_host: default_smtp_host(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            forecast_window_hour: default_window_hour(),
            forecast_window_minutes: default_window_minutes(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl StormwatchConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified path
    ///
    /// Environment overrides use the `STORMWATCH` prefix with `__` between
    /// section and key, e.g. `STORMWATCH__WEATHER__API_KEY`.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

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

        builder = builder.add_source(
            Environment::with_prefix("STORMWATCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: StormwatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stormwatch").join("config.toml"))
    }

    /// The weather API key, or a configuration error that aborts the run
    pub fn require_api_key(&self) -> Result<&str, StormwatchError> {
        match self.weather.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(StormwatchError::config(
                "Weather API key is missing. Set STORMWATCH__WEATHER__API_KEY or add it to config.toml.",
            )),
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(StormwatchError::config(
                "Weather API timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.schedule.forecast_window_hour > 23 {
            return Err(StormwatchError::config(
                "Forecast window hour must be between 0 and 23",
            )
            .into());
        }

        if self.schedule.forecast_window_minutes > 59 {
            return Err(StormwatchError::config(
                "Forecast window minutes must be between 0 and 59",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(StormwatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("geocoding", &self.weather.geocoding_url),
            ("one-call", &self.weather.onecall_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(StormwatchError::config(format!(
                    "Weather {name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
