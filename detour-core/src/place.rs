//! Places resolved from free-text user input.
//!
//! A [`Place`] is produced by the place-resolution collaborator and is
//! immutable once resolved. The engine treats [`PlaceId`] as an opaque
//! token minted by the external provider; it is never parsed or
//! synthesised locally.

use geo::Coord;

/// Opaque identifier for a resolved place.
///
/// The wrapped string is whatever stable identifier the place provider
/// returns; the engine only ever passes it back verbatim.
///
/// # Examples
/// ```
/// use detour_core::PlaceId;
///
/// let id = PlaceId::new("ChIJD7fiBh9u5kcRYJSMaMOCCwQ");
/// assert_eq!(id.as_str(), "ChIJD7fiBh9u5kcRYJSMaMOCCwQ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceId(String);

impl PlaceId {
    /// Wrap a provider-issued identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a `&str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved place: origin, destination, or a stop along the way.
///
/// `location` follows the `geo` convention: `x` is longitude and `y`
/// is latitude.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use detour_core::{Place, PlaceId};
///
/// let place = Place::new(
///     PlaceId::new("paris"),
///     "Paris",
///     "Paris, France",
///     Coord { x: 2.3522, y: 48.8566 },
/// );
/// assert_eq!(place.display_name, "Paris");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Place {
    /// Stable identifier issued by the place provider.
    pub id: PlaceId,
    /// Short human-readable name.
    pub display_name: String,
    /// Full postal-style address.
    pub formatted_address: String,
    /// Geospatial position (`x` = longitude, `y` = latitude).
    pub location: Coord<f64>,
}

impl Place {
    /// Construct a place from resolved provider data.
    #[must_use]
    pub fn new(
        id: PlaceId,
        display_name: impl Into<String>,
        formatted_address: impl Into<String>,
        location: Coord<f64>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            formatted_address: formatted_address.into(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_id_displays_verbatim() {
        let id = PlaceId::new("place:42");
        assert_eq!(id.to_string(), "place:42");
    }

    #[test]
    fn place_preserves_fields() {
        let place = Place::new(
            PlaceId::new("lyon"),
            "Lyon",
            "Lyon, France",
            Coord { x: 4.8357, y: 45.764 },
        );
        assert_eq!(place.id.as_str(), "lyon");
        assert_eq!(place.formatted_address, "Lyon, France");
    }
}
