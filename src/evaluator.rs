//! Forecast evaluation
//!
//! Orchestrates coordinate resolution, forecast fetch, normalization, and
//! severity classification for one city, producing severe-weather findings.
//! The evaluator is time-agnostic: whether the 12-hour forecast window is
//! checked at all is a caller decision passed in as a plain boolean.

use crate::api::WeatherDataSource;
use crate::forecast;
use crate::location;
use crate::models::{AlertWindow, Finding};
use crate::severity::SeverityResult;
use tracing::{debug, info, warn};

/// Outcome of evaluating one city
///
/// Failure variants mirror the stage that gave up; none of them is an error
/// at the call site, they are statuses for the orchestrator to report.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// One or more severe-weather findings, in detection order
    Findings(Vec<Finding>),
    /// Evaluation completed and found nothing severe
    NoSevereWeather,
    /// The place name could not be resolved to a coordinate
    CoordinateUnavailable,
    /// The forecast payload could not be fetched
    WeatherDataUnavailable,
    /// The payload did not match the required shape
    NormalizationFailed,
}

/// Evaluate current and (optionally) next-12-hours conditions for a city
///
/// Severe current weather short-circuits the forecast check: one `Now`
/// finding is emitted and the hourly sequence is not examined. The hourly
/// sequence is only examined when nothing severe is happening now AND
/// `include_forecast_window` is set.
pub fn evaluate(
    source: &dyn WeatherDataSource,
    city: &str,
    include_forecast_window: bool,
) -> Evaluation {
    let Some(coordinate) = location::resolve(source, city) else {
        return Evaluation::CoordinateUnavailable;
    };

    let payload = match source.one_call(coordinate) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Weather data fetch failed for '{}': {:#}", city, e);
            return Evaluation::WeatherDataUnavailable;
        }
    };

    let Some(normalized) = forecast::normalize(&payload) else {
        return Evaluation::NormalizationFailed;
    };

    let current = SeverityResult::from_raw_code(normalized.current.code);
    if current.is_severe {
        info!(
            "Severe weather now for '{}': {} ({})",
            city, current.category, normalized.current.description
        );
        return Evaluation::Findings(vec![Finding {
            location: city.to_string(),
            window: AlertWindow::Now,
            category: current.category,
            description: normalized.current.description,
        }]);
    }

    if !include_forecast_window {
        debug!("Forecast window closed, skipping 12-hour check for '{}'", city);
        return Evaluation::NoSevereWeather;
    }

    let mut findings = Vec::new();
    for record in normalized.upcoming {
        let result = SeverityResult::from_raw_code(record.code);
        if result.is_severe {
            info!(
                "Severe weather expected for '{}': {} ({})",
                city, result.category, record.description
            );
            findings.push(Finding {
                location: city.to_string(),
                window: AlertWindow::Next12Hours,
                category: result.category,
                description: record.description,
            });
        }
    }

    if findings.is_empty() {
        Evaluation::NoSevereWeather
    } else {
        Evaluation::Findings(findings)
    }
}
