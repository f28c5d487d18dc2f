//! Scheduled run orchestration
//!
//! Iterates the registered users, evaluates each one, and dispatches one
//! alert per finding. Outcomes are aggregated into a [`RunReport`] for
//! observability; a failure while processing one user never aborts the
//! remaining users. The external scheduler invokes one run per interval.

use crate::alert::AlertSender;
use crate::api::{OpenWeatherClient, WeatherDataSource};
use crate::config::{ScheduleConfig, StormwatchConfig};
use crate::evaluator::{self, Evaluation};
use crate::models::{AlertOutcome, AlertWindow, Finding, UserRecord};
use crate::{forecast, location, store, validate};
use anyhow::Result;
use chrono::{Local, Timelike};
use tracing::{info, warn};

/// Per-user result of one run
#[derive(Debug, Clone, PartialEq)]
pub enum UserOutcome {
    /// One dispatch outcome per finding, in detection order
    AlertsDispatched(Vec<AlertOutcome>),
    /// Evaluation completed without findings
    NoSevereWeather,
    /// The user's city could not be resolved
    CoordinateUnavailable,
    /// The forecast payload could not be fetched
    WeatherDataUnavailable,
    /// The forecast payload did not match the required shape
    NormalizationFailed,
}

/// Per-user report entry
#[derive(Debug, Clone, PartialEq)]
pub struct UserReport {
    pub city: String,
    pub outcome: UserOutcome,
}

/// Aggregated outcomes for one scheduled run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub users: Vec<UserReport>,
}

impl RunReport {
    /// Number of alerts actually delivered through some channel
    #[must_use]
    pub fn alerts_delivered(&self) -> usize {
        self.users
            .iter()
            .filter_map(|report| match &report.outcome {
                UserOutcome::AlertsDispatched(outcomes) => {
                    Some(outcomes.iter().filter(|o| o.delivered()).count())
                }
                _ => None,
            })
            .sum()
    }
}

/// Whether the 12-hour forecast window is open at the given time
///
/// The window opens at `forecast_window_hour:00` local time and stays open
/// through minute `forecast_window_minutes` inclusive.
pub fn forecast_window_open<T: Timelike>(now: &T, schedule: &ScheduleConfig) -> bool {
    now.hour() == schedule.forecast_window_hour && now.minute() <= schedule.forecast_window_minutes
}

/// Build the alert message for one finding
#[must_use]
pub fn build_alert_message(finding: &Finding) -> String {
    match finding.window {
        AlertWindow::Now => format!(
            "Severe weather alert for {}!\nType: {}\nCondition: {}",
            finding.location, finding.category, finding.description
        ),
        AlertWindow::Next12Hours => format!(
            "Severe weather expected in the next 12 hours for {}!\nType: {}\nCondition: {}",
            finding.location, finding.category, finding.description
        ),
    }
}

/// Process every user against the data source and alert sender
///
/// This is the orchestration core, independent of wall-clock time and real
/// transports; `run_scheduled_check` wires the production pieces around it.
pub fn run_check(
    source: &dyn WeatherDataSource,
    sender: &AlertSender,
    users: &[UserRecord],
    include_forecast_window: bool,
) -> RunReport {
    let mut report = RunReport::default();

    for user in users {
        let outcome = match evaluator::evaluate(source, &user.city, include_forecast_window) {
            Evaluation::Findings(findings) => {
                let mut dispatched = Vec::with_capacity(findings.len());
                for finding in &findings {
                    let message = build_alert_message(finding);
                    let outcome = sender.dispatch(&user.phone, &user.email, &message);
                    if outcome.delivered() {
                        info!(
                            "Alert sent via {} for '{}': {}",
                            outcome.channel, user.city, outcome.detail
                        );
                    } else {
                        warn!(
                            "Alert delivery failed for '{}': {}",
                            user.city, outcome.detail
                        );
                    }
                    dispatched.push(outcome);
                }
                UserOutcome::AlertsDispatched(dispatched)
            }
            Evaluation::NoSevereWeather => {
                info!("No severe weather detected for '{}'", user.city);
                UserOutcome::NoSevereWeather
            }
            Evaluation::CoordinateUnavailable => {
                warn!("Could not retrieve coordinates for '{}'", user.city);
                UserOutcome::CoordinateUnavailable
            }
            Evaluation::WeatherDataUnavailable => {
                warn!("Weather data fetch failed for '{}'", user.city);
                UserOutcome::WeatherDataUnavailable
            }
            Evaluation::NormalizationFailed => {
                warn!("Weather data extraction failed for '{}'", user.city);
                UserOutcome::NormalizationFailed
            }
        };

        report.users.push(UserReport {
            city: user.city.clone(),
            outcome,
        });
    }

    report
}

/// One scheduled run: load users, gate the forecast window, process everyone
///
/// Aborts before any user is processed when the weather API key is missing;
/// everything past that point is isolated per user.
pub fn run_scheduled_check(config: &StormwatchConfig) -> Result<RunReport> {
    let client = OpenWeatherClient::new(config)?;
    let sender = AlertSender::new(config)?;

    let users = store::load_users(&config.store.path);
    if users.is_empty() {
        info!("No registered users; nothing to check");
        return Ok(RunReport::default());
    }

    let now = Local::now();
    let include_forecast_window = forecast_window_open(&now, &config.schedule);
    if !include_forecast_window {
        info!("Forecast window closed at {}; checking current conditions only", now.format("%H:%M"));
    }

    let report = run_check(&client, &sender, &users, include_forecast_window);
    info!(
        "Run complete: {} user(s) processed, {} alert(s) delivered",
        report.users.len(),
        report.alerts_delivered()
    );

    Ok(report)
}

/// Interactive test-notification path
///
/// Validates the input, fetches the current conditions for the city, and
/// sends a test message through the normal dispatch fallback. Returns the
/// message that was sent and the dispatch outcome.
pub fn send_test_notification(
    config: &StormwatchConfig,
    city: &str,
    phone: &str,
    email: &str,
) -> Result<(String, AlertOutcome)> {
    validate::validate_registration(city, phone, email)?;

    let client = OpenWeatherClient::new(config)?;
    let sender = AlertSender::new(config)?;

    let coordinate = location::resolve(&client, city)
        .ok_or_else(|| crate::StormwatchError::lookup(format!("Location not found: {city}")))?;

    let payload = client
        .one_call(coordinate)
        .map_err(|e| crate::StormwatchError::fetch(format!("{e:#}")))?;

    let temperature = payload.current.as_ref().and_then(|current| current.temp);
    let normalized = forecast::normalize(&payload)
        .ok_or_else(|| crate::StormwatchError::shape("current/hourly"))?;

    let message = match temperature {
        Some(temp) => format!(
            "Weather Alert for {}:\nTemperature: {:.1}°C\nWeather: {}",
            city, temp, normalized.current.description
        ),
        None => format!(
            "Weather Alert for {}:\nWeather: {}",
            city, normalized.current.description
        ),
    };

    let outcome = sender.dispatch(phone, email, &message);
    Ok((message, outcome))
}
