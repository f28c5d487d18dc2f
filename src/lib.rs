//! `Stormwatch` - Automated severe weather alerting
//!
//! This library provides the core functionality for severe-condition
//! classification, time-windowed forecast evaluation, and alert delivery
//! with SMS-to-email fallback.

pub mod alert;
pub mod api;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod forecast;
pub mod location;
pub mod models;
pub mod runner;
pub mod severity;
pub mod store;
pub mod validate;

// Re-export core types for public API
pub use alert::{AlertSender, EmailChannel, SmsChannel};
pub use api::{OpenWeatherClient, WeatherDataSource};
pub use config::StormwatchConfig;
pub use error::StormwatchError;
pub use evaluator::Evaluation;
pub use models::{
    AlertChannel, AlertOutcome, AlertWindow, ConditionRecord, Coordinate, Finding,
    NormalizedForecast, UserRecord,
};
pub use runner::{RunReport, UserOutcome};
pub use severity::{SeverityCategory, SeverityResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, StormwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
