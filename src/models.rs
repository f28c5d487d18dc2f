//! Core data model for weather evaluation and alert delivery
//!
//! Every value here is an ephemeral produced during a single run; nothing is
//! mutated after construction and nothing outlives the run that created it.

use serde::{Deserialize, Serialize};

use crate::severity::SeverityCategory;

/// Geographic coordinate resolved from a place name
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both fields present and finite, or the whole value is unusable
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One weather observation or forecast slot
///
/// `code` is `None` when the upstream `id` field was not an integer (or an
/// integer encoded as a string); such records classify as not severe.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConditionRecord {
    /// Numeric weather condition code from the data source
    pub code: Option<i64>,
    /// Human-readable description of the condition
    pub description: String,
}

impl ConditionRecord {
    /// Create a new condition record
    #[must_use]
    pub fn new(code: Option<i64>, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

/// Uniform forecast shape: the current condition plus up to 12 hourly slots
///
/// `upcoming` preserves chronological order from the source payload and is
/// truncated, never padded, when fewer than 12 hourly entries exist.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NormalizedForecast {
    /// Current weather condition
    pub current: ConditionRecord,
    /// Hourly conditions for the next 12 hours, in order
    pub upcoming: Vec<ConditionRecord>,
}

/// Which time window a finding applies to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AlertWindow {
    /// Severe weather right now
    Now,
    /// Severe weather expected within the next 12 hours
    Next12Hours,
}

/// One detected severe-weather instance for one subject location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Finding {
    /// The location the finding applies to (as the user registered it)
    pub location: String,
    /// Current vs forecast window
    pub window: AlertWindow,
    /// Severity category from the classifier
    pub category: SeverityCategory,
    /// Condition description from the data source
    pub description: String,
}

/// Delivery channel that ultimately handled (or failed) an alert
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AlertChannel {
    Sms,
    Email,
    Failed,
}

impl std::fmt::Display for AlertChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertChannel::Sms => write!(f, "SMS"),
            AlertChannel::Email => write!(f, "Email"),
            AlertChannel::Failed => write!(f, "Failed"),
        }
    }
}

/// Terminal outcome of one dispatch attempt
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AlertOutcome {
    /// Channel that handled the alert, or `Failed`
    pub channel: AlertChannel,
    /// Provider message id on success, error text on failure
    pub detail: String,
}

impl AlertOutcome {
    /// Successful SMS delivery with the provider message id
    #[must_use]
    pub fn sms(message_id: impl Into<String>) -> Self {
        Self {
            channel: AlertChannel::Sms,
            detail: message_id.into(),
        }
    }

    /// Successful email delivery
    #[must_use]
    pub fn email(detail: impl Into<String>) -> Self {
        Self {
            channel: AlertChannel::Email,
            detail: detail.into(),
        }
    }

    /// Both channels exhausted (or never eligible)
    #[must_use]
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            channel: AlertChannel::Failed,
            detail: detail.into(),
        }
    }

    /// True when some channel delivered the alert
    #[must_use]
    pub fn delivered(&self) -> bool {
        self.channel != AlertChannel::Failed
    }
}

/// Registered user, consumed read-only from the external store
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserRecord {
    /// City to monitor
    pub city: String,
    /// Phone number for SMS delivery
    pub phone: String,
    /// Email address for fallback delivery
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_finiteness() {
        assert!(Coordinate::new(9.07, 7.49).is_finite());
        assert!(!Coordinate::new(f64::NAN, 7.49).is_finite());
        assert!(!Coordinate::new(9.07, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_coordinate_format() {
        let coord = Coordinate::new(9.0765, 7.3986);
        assert_eq!(coord.format(), "9.0765, 7.3986");
    }

    #[test]
    fn test_alert_outcome_constructors() {
        let sms = AlertOutcome::sms("SM123");
        assert_eq!(sms.channel, AlertChannel::Sms);
        assert!(sms.delivered());

        let failed = AlertOutcome::failed("Invalid email address");
        assert_eq!(failed.channel, AlertChannel::Failed);
        assert!(!failed.delivered());
        assert_eq!(failed.detail, "Invalid email address");
    }

    #[test]
    fn test_alert_channel_display() {
        assert_eq!(AlertChannel::Sms.to_string(), "SMS");
        assert_eq!(AlertChannel::Email.to_string(), "Email");
        assert_eq!(AlertChannel::Failed.to_string(), "Failed");
    }

    #[test]
    fn test_user_record_roundtrip() {
        let json = r#"{"city": "Abuja", "phone": "+2348012345678", "email": "user@example.com"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.city, "Abuja");
        assert_eq!(user.phone, "+2348012345678");
    }
}
