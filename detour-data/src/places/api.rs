//! Place service response types.

use serde::Deserialize;

/// Top-level find-place response.
#[derive(Debug, Deserialize)]
pub struct FindPlaceResponse {
    /// Status code from the place service.
    pub status: String,

    /// Matching places, best match first.
    #[serde(default)]
    pub candidates: Vec<ApiPlace>,
}

impl FindPlaceResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// One matching place.
#[derive(Debug, Deserialize)]
pub struct ApiPlace {
    /// Stable identifier for the place.
    pub place_id: String,
    /// Short human-readable name.
    pub name: String,
    /// Full postal-style address.
    pub formatted_address: String,
    /// Geometry wrapper around the position.
    pub geometry: ApiGeometry,
}

/// Geometry of a matching place.
#[derive(Debug, Deserialize)]
pub struct ApiGeometry {
    /// Geographic position.
    pub location: ApiLatLng,
}

/// A latitude/longitude pair as the service encodes it.
#[derive(Debug, Deserialize)]
pub struct ApiLatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_match() {
        let json = r#"{
            "status": "OK",
            "candidates": [{
                "place_id": "ChIJD7fiBh9u5kcRYJSMaMOCCwQ",
                "name": "Paris",
                "formatted_address": "Paris, France",
                "geometry": {"location": {"lat": 48.8566, "lng": 2.3522}}
            }]
        }"#;

        let response: FindPlaceResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let place = response.candidates.first().expect("should have a match");
        assert_eq!(place.name, "Paris");
        assert_eq!(place.geometry.location.lat, 48.8566);
    }

    #[test]
    fn deserialise_zero_results() {
        let json = r#"{"status": "ZERO_RESULTS"}"#;

        let response: FindPlaceResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert!(response.candidates.is_empty());
    }
}
