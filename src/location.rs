//! Location Resolution Module
//!
//! Resolves a free-form place name into a geographic coordinate. All lookup
//! failure modes (empty match set, transport error, malformed response,
//! non-finite coordinates) become `None` plus a logged diagnostic; nothing
//! propagates to the caller.

use crate::api::WeatherDataSource;
use crate::models::Coordinate;
use tracing::{debug, warn};

/// Resolve a place name to a coordinate via the data source
///
/// Returns the first match's coordinate, or `None` when the lookup yields
/// nothing usable.
pub fn resolve(source: &dyn WeatherDataSource, place: &str) -> Option<Coordinate> {
    debug!("Resolving place name: {}", place);

    match source.coordinates(place) {
        Ok(Some(coordinate)) if coordinate.is_finite() => {
            debug!("Resolved '{}' to {}", place, coordinate.format());
            Some(coordinate)
        }
        Ok(Some(coordinate)) => {
            warn!(
                "Discarding non-finite coordinate for '{}': {:?}",
                place, coordinate
            );
            None
        }
        Ok(None) => {
            warn!("No coordinate found for '{}'", place);
            None
        }
        Err(e) => {
            warn!("Coordinate lookup failed for '{}': {:#}", place, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::wire::OneCallResponse;
    use anyhow::Result;

    struct StubSource(Result<Option<Coordinate>, String>);

    impl WeatherDataSource for StubSource {
        fn coordinates(&self, _place: &str) -> Result<Option<Coordinate>> {
            match &self.0 {
                Ok(coordinate) => Ok(*coordinate),
                Err(message) => Err(anyhow::anyhow!(message.clone())),
            }
        }

        fn one_call(&self, _coordinate: Coordinate) -> Result<OneCallResponse> {
            unreachable!("resolver never fetches forecasts")
        }
    }

    #[test]
    fn resolves_first_match() {
        let source = StubSource(Ok(Some(Coordinate::new(9.0765, 7.3986))));
        let resolved = resolve(&source, "Abuja").unwrap();
        assert!((resolved.latitude - 9.0765).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_match_set_is_absent() {
        let source = StubSource(Ok(None));
        assert!(resolve(&source, "Nowhereville").is_none());
    }

    #[test]
    fn lookup_error_is_absent_not_propagated() {
        let source = StubSource(Err("connection refused".to_string()));
        assert!(resolve(&source, "Abuja").is_none());
    }

    #[test]
    fn non_finite_coordinate_is_absent() {
        let source = StubSource(Ok(Some(Coordinate::new(f64::NAN, 7.0))));
        assert!(resolve(&source, "Abuja").is_none());
    }
}
