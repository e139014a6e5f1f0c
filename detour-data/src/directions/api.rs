//! Routing service response types.

use serde::Deserialize;

/// Top-level directions response.
///
/// The `status` field indicates the response outcome. Common values:
/// - `"OK"` - a route was found
/// - `"NOT_FOUND"` / `"ZERO_RESULTS"` - a stop could not be routed
/// - anything else - service-side failure
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    /// Status code from the routing service.
    pub status: String,

    /// Optional human-readable detail when `status` is not `"OK"`.
    pub error_message: Option<String>,

    /// Computed routes; the first is the recommended one.
    #[serde(default)]
    pub routes: Vec<ApiRoute>,
}

impl DirectionsResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// One computed route.
#[derive(Debug, Deserialize)]
pub struct ApiRoute {
    /// Legs in visit order, one per pair of consecutive points.
    #[serde(default)]
    pub legs: Vec<ApiLeg>,

    /// Permutation of the supplied waypoints, present when the
    /// service was asked to optimise stop order.
    pub waypoint_order: Option<Vec<usize>>,
}

/// One leg of a computed route.
#[derive(Debug, Deserialize)]
pub struct ApiLeg {
    /// Address the leg starts from.
    pub start_address: String,
    /// Address the leg ends at.
    pub end_address: String,
    /// Leg distance.
    pub distance: TextValue,
    /// Leg duration.
    pub duration: TextValue,
}

/// A human-readable measurement as the service formats it.
#[derive(Debug, Deserialize)]
pub struct TextValue {
    /// Display text, e.g. `"12.4 km"` or `"18 mins"`.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_optimised_response() {
        let json = r#"{
            "status": "OK",
            "routes": [{
                "waypoint_order": [2, 0, 1],
                "legs": [
                    {
                        "start_address": "Paris, France",
                        "end_address": "C",
                        "distance": {"text": "12.4 km", "value": 12400},
                        "duration": {"text": "18 mins", "value": 1080}
                    }
                ]
            }]
        }"#;

        let response: DirectionsResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let route = response.routes.first().expect("should have a route");
        assert_eq!(route.waypoint_order, Some(vec![2, 0, 1]));
        let leg = route.legs.first().expect("should have a leg");
        assert_eq!(leg.distance.text, "12.4 km");
        assert_eq!(leg.duration.text, "18 mins");
        assert_eq!(leg.end_address, "C");
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{
            "status": "NOT_FOUND",
            "error_message": "At least one of the waypoints could not be geocoded."
        }"#;

        let response: DirectionsResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert!(response.routes.is_empty());
        assert!(response.error_message.is_some());
    }

    #[test]
    fn deserialise_response_without_waypoint_order() {
        let json = r#"{
            "status": "OK",
            "routes": [{"legs": []}]
        }"#;

        let response: DirectionsResponse =
            serde_json::from_str(json).expect("should deserialise");

        let route = response.routes.first().expect("should have a route");
        assert_eq!(route.waypoint_order, None);
    }
}
