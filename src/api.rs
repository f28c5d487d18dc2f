//! Weather API client for the OpenWeatherMap endpoints
//!
//! This module provides the HTTP client for the geocoding and one-call
//! forecast endpoints, behind the [`WeatherDataSource`] trait so the
//! evaluator can be exercised with canned payloads. Every call is a single
//! blocking request with a bounded timeout; there are no retries.

use crate::StormwatchError;
use crate::config::StormwatchConfig;
use crate::models::Coordinate;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Pluggable source of geocoding and forecast data
pub trait WeatherDataSource {
    /// Look up the coordinate for a place name; first match wins
    fn coordinates(&self, place: &str) -> Result<Option<Coordinate>>;

    /// Fetch the raw forecast payload for a coordinate
    fn one_call(&self, coordinate: Coordinate) -> Result<wire::OneCallResponse>;
}

/// Weather API client for OpenWeatherMap
pub struct OpenWeatherClient {
    /// HTTP client
    client: Client,
    /// Geocoding endpoint URL
    geocoding_url: String,
    /// One-call endpoint URL
    onecall_url: String,
    /// API key appended to every request
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a new weather API client
    pub fn new(config: &StormwatchConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let timeout = Duration::from_secs(config.weather.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Stormwatch/0.1.0")
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            geocoding_url: config.weather.geocoding_url.clone(),
            onecall_url: config.weather.onecall_url.clone(),
            api_key,
        })
    }

    /// Make a single request, mapping non-success statuses to errors
    fn make_request(&self, url: &str) -> Result<Response> {
        let start = Instant::now();
        debug!("HTTP request: {}", url.split("appid=").next().unwrap_or(url));

        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| "HTTP request failed")?;

        let status = response.status();
        debug!(
            "HTTP response: {} in {:.3}s",
            status,
            start.elapsed().as_secs_f64()
        );

        if status.is_success() {
            Ok(response)
        } else if status.as_u16() == 401 {
            error!("API authentication failed (HTTP 401)");
            Err(StormwatchError::config(
                "Invalid API key. Please check your OpenWeatherMap API key.",
            )
            .into())
        } else {
            Err(StormwatchError::fetch(format!("HTTP {status} from weather service")).into())
        }
    }
}

impl WeatherDataSource for OpenWeatherClient {
    fn coordinates(&self, place: &str) -> Result<Option<Coordinate>> {
        info!("Geocoding location: '{}'", place);

        let url = format!(
            "{}?q={}&limit=1&appid={}",
            self.geocoding_url,
            urlencoding::encode(place),
            self.api_key
        );

        let response = self.make_request(&url)?;

        let matches: Vec<wire::GeoEntry> = response
            .json()
            .with_context(|| "Failed to parse geocoding response")
            .map_err(|e| {
                error!("Failed to parse geocoding response for '{}': {}", place, e);
                StormwatchError::lookup(format!("Invalid geocoding data for '{place}'"))
            })?;

        match matches.first() {
            Some(entry) => {
                let coordinate = Coordinate::new(entry.lat, entry.lon);
                debug!("Geocoded '{}' to {}", place, coordinate.format());
                Ok(Some(coordinate))
            }
            None => {
                warn!("No geocoding results for '{}'", place);
                Ok(None)
            }
        }
    }

    fn one_call(&self, coordinate: Coordinate) -> Result<wire::OneCallResponse> {
        info!("Fetching forecast for {}", coordinate.format());
        let start = Instant::now();

        let url = format!(
            "{}?lat={}&lon={}&appid={}&units=metric&exclude=minutely",
            self.onecall_url, coordinate.latitude, coordinate.longitude, self.api_key
        );

        let response = self.make_request(&url)?;

        let payload: wire::OneCallResponse = response
            .json()
            .with_context(|| "Failed to parse forecast response")
            .map_err(|e| {
                error!("Failed to parse forecast response: {}", e);
                StormwatchError::fetch("Invalid forecast data received from weather service")
            })?;

        info!(
            "Retrieved forecast with {} hourly entries in {:.3}s",
            payload.hourly.as_ref().map_or(0, Vec::len),
            start.elapsed().as_secs_f64()
        );

        Ok(payload)
    }
}

/// OpenWeatherMap wire structures
///
/// Every section is optional; the normalizer validates presence and reports
/// the exact field that is missing.
pub mod wire {
    use serde::Deserialize;
    use serde_json::Value;

    /// One geocoding match
    #[derive(Debug, Deserialize)]
    pub struct GeoEntry {
        pub lat: f64,
        pub lon: f64,
    }

    /// One-call forecast response
    #[derive(Debug, Deserialize, Default)]
    pub struct OneCallResponse {
        pub current: Option<CurrentSection>,
        pub hourly: Option<Vec<HourlySlot>>,
    }

    /// Current conditions section
    #[derive(Debug, Deserialize, Default)]
    pub struct CurrentSection {
        /// Temperature in the requested units, when present
        pub temp: Option<f64>,
        #[serde(default)]
        pub weather: Vec<WeatherDescriptor>,
    }

    /// One hourly forecast slot
    #[derive(Debug, Deserialize, Default)]
    pub struct HourlySlot {
        #[serde(default)]
        pub weather: Vec<WeatherDescriptor>,
    }

    /// One weather descriptor inside a section
    #[derive(Debug, Deserialize, Default)]
    pub struct WeatherDescriptor {
        /// Condition code; kept raw since the upstream type is untrusted
        #[serde(default)]
        pub id: Value,
        #[serde(default)]
        pub description: String,
    }

    impl WeatherDescriptor {
        /// Lenient code extraction: an integer, or an integer in a string
        #[must_use]
        pub fn code(&self) -> Option<i64> {
            self.id
                .as_i64()
                .or_else(|| self.id.as_str().and_then(|s| s.trim().parse().ok()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::wire::*;
    use super::*;

    fn _assert_object_safe(_: &dyn WeatherDataSource) {}

    #[test]
    fn test_client_requires_api_key() {
        let config = StormwatchConfig::default();
        assert!(OpenWeatherClient::new(&config).is_err());

        let mut config = StormwatchConfig::default();
        config.weather.api_key = Some("test_key_123".to_string());
        assert!(OpenWeatherClient::new(&config).is_ok());
    }

    #[test]
    fn test_geo_entry_parsing() {
        let json = r#"[{"name": "Abuja", "lat": 9.0765, "lon": 7.3986, "country": "NG"}]"#;
        let entries: Vec<GeoEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 1);
        assert!((entries[0].lat - 9.0765).abs() < f64::EPSILON);
    }

    #[test]
    fn test_onecall_parsing_full_shape() {
        let json = r#"{
            "current": {"temp": 28.4, "weather": [{"id": 201, "description": "thunderstorm with rain"}]},
            "hourly": [
                {"weather": [{"id": 800, "description": "clear sky"}]},
                {"weather": [{"id": 502, "description": "heavy intensity rain"}]}
            ]
        }"#;
        let payload: OneCallResponse = serde_json::from_str(json).unwrap();
        let current = payload.current.unwrap();
        assert_eq!(current.weather[0].code(), Some(201));
        assert_eq!(current.temp, Some(28.4));
        assert_eq!(payload.hourly.unwrap().len(), 2);
    }

    #[test]
    fn test_onecall_parsing_tolerates_missing_sections() {
        let payload: OneCallResponse = serde_json::from_str(r#"{"lat": 9.07}"#).unwrap();
        assert!(payload.current.is_none());
        assert!(payload.hourly.is_none());
    }

    #[test]
    fn test_descriptor_code_leniency() {
        let descriptor: WeatherDescriptor =
            serde_json::from_str(r#"{"id": 200, "description": "storm"}"#).unwrap();
        assert_eq!(descriptor.code(), Some(200));

        let descriptor: WeatherDescriptor =
            serde_json::from_str(r#"{"id": "531", "description": "rain"}"#).unwrap();
        assert_eq!(descriptor.code(), Some(531));

        let descriptor: WeatherDescriptor =
            serde_json::from_str(r#"{"id": "stormy", "description": "?"}"#).unwrap();
        assert_eq!(descriptor.code(), None);

        let descriptor: WeatherDescriptor =
            serde_json::from_str(r#"{"description": "no id at all"}"#).unwrap();
        assert_eq!(descriptor.code(), None);
    }
}
