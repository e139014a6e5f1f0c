//! Map markers the user can promote into waypoints.

use geo::Coord;

use crate::CandidateStop;

/// A tappable map point, independent of any computed itinerary.
///
/// Markers come from a static or externally supplied point set.
/// Whether a marker is currently selected is transient UI state held
/// by the planner, not by the marker itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    /// Geospatial position (`x` = longitude, `y` = latitude).
    pub location: Coord<f64>,
    /// Optional human-readable label; may be empty.
    pub label: String,
}

impl Marker {
    /// Construct a marker at a location.
    #[must_use]
    pub fn new(location: Coord<f64>, label: impl Into<String>) -> Self {
        Self {
            location,
            label: label.into(),
        }
    }

    /// Render the marker as a candidate stop for the routing service.
    ///
    /// Uses the label when present, otherwise a `"lat,lng"` string the
    /// routing service can geocode directly.
    #[must_use]
    pub fn as_candidate(&self) -> CandidateStop {
        if self.label.is_empty() {
            CandidateStop::new(format!("{},{}", self.location.y, self.location.x))
        } else {
            CandidateStop::new(self.label.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_marker_uses_label() {
        let marker = Marker::new(Coord { x: 2.2945, y: 48.8605 }, "Trocadéro");
        assert_eq!(marker.as_candidate().name, "Trocadéro");
    }

    #[test]
    fn unlabelled_marker_falls_back_to_coordinates() {
        let marker = Marker::new(Coord { x: 2.2945, y: 48.8605 }, "");
        assert_eq!(marker.as_candidate().name, "48.8605,2.2945");
    }
}
