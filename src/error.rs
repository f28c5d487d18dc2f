//! Error types and handling for the `Stormwatch` alerting service

use thiserror::Error;

/// Main error type for the `Stormwatch` service
#[derive(Error, Debug)]
pub enum StormwatchError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Geocoding lookup errors
    #[error("Lookup error: {message}")]
    Lookup { message: String },

    /// Weather data fetch errors
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    /// Payload shape validation errors, naming the field that failed
    #[error("Malformed weather payload: missing or empty `{field}`")]
    Shape { field: String },

    /// Delivery channel errors (transport, auth, provider rejection)
    #[error("Channel error: {message}")]
    Channel { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl StormwatchError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new lookup error
    pub fn lookup<S: Into<String>>(message: S) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    /// Create a new fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a new shape validation error for a payload field
    pub fn shape<S: Into<String>>(field: S) -> Self {
        Self::Shape {
            field: field.into(),
        }
    }

    /// Create a new channel error
    pub fn channel<S: Into<String>>(message: S) -> Self {
        Self::Channel {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            StormwatchError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            StormwatchError::Lookup { message } => {
                format!("Could not resolve location: {message}")
            }
            StormwatchError::Fetch { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            StormwatchError::Shape { field } => {
                format!("Weather service returned unexpected data (missing `{field}`).")
            }
            StormwatchError::Channel { message } => {
                format!("Alert delivery failed: {message}")
            }
            StormwatchError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            StormwatchError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
