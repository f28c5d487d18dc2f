//! Weather payload normalization
//!
//! Converts the raw one-call payload into the uniform [`NormalizedForecast`]
//! shape: one current condition plus up to 12 hourly conditions in source
//! order. Structural problems are reported by naming the field that failed,
//! and yield `None` rather than an error.

use crate::api::wire::OneCallResponse;
use crate::models::{ConditionRecord, NormalizedForecast};
use tracing::warn;

/// Number of hourly slots evaluated for the forecast window
pub const FORECAST_HOURS: usize = 12;

/// Normalize a raw forecast payload
///
/// Extracts the first weather descriptor of the current section and of each
/// of the first [`FORECAST_HOURS`] hourly entries. Returns `None` and logs
/// the offending field when the payload does not match the required shape.
pub fn normalize(payload: &OneCallResponse) -> Option<NormalizedForecast> {
    let Some(current_section) = payload.current.as_ref() else {
        warn!("Forecast payload missing `current` section");
        return None;
    };

    let Some(current_descriptor) = current_section.weather.first() else {
        warn!("Forecast payload has empty `current.weather`");
        return None;
    };

    let current = ConditionRecord::new(
        current_descriptor.code(),
        current_descriptor.description.clone(),
    );

    let Some(hourly) = payload.hourly.as_ref() else {
        warn!("Forecast payload missing `hourly` sequence");
        return None;
    };

    let mut upcoming = Vec::with_capacity(FORECAST_HOURS.min(hourly.len()));
    for (index, slot) in hourly.iter().take(FORECAST_HOURS).enumerate() {
        let Some(descriptor) = slot.weather.first() else {
            warn!("Forecast payload has empty `hourly[{index}].weather`");
            return None;
        };
        upcoming.push(ConditionRecord::new(
            descriptor.code(),
            descriptor.description.clone(),
        ));
    }

    Some(NormalizedForecast { current, upcoming })
}
