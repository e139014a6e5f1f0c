//! HTTP implementation of the place-resolution seam.

use detour_core::{Place, PlaceId, PlaceResolutionError, PlaceResolver, Resolution};
use geo::Coord;
use url::Url;

use super::api::FindPlaceResponse;
use crate::transport::{ClientBuildError, ClientConfig, Transport, TransportError};

/// Path of the find-place endpoint under the configured base URL.
const FIND_PLACE_PATH: &str = "findplace";

/// HTTP-based place resolver.
#[derive(Debug)]
pub struct HttpPlaceResolver {
    transport: Transport,
    base_url: Url,
    api_key: String,
}

impl HttpPlaceResolver {
    /// Create a resolver with the credential read from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is unset, the base URL does
    /// not parse, or the HTTP client or runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(ClientConfig::from_env(base_url)?)
    }

    /// Create a resolver with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP
    /// client or runtime fails to build.
    pub fn with_config(config: ClientConfig) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(&config.base_url).map_err(ClientBuildError::BaseUrl)?;
        let transport = Transport::new(&config)?;
        Ok(Self {
            transport,
            base_url,
            api_key: config.api_key,
        })
    }

    fn build_url(&self, input: &str) -> Result<Url, PlaceResolutionError> {
        let mut url = self
            .base_url
            .join(FIND_PLACE_PATH)
            .map_err(|err| PlaceResolutionError::ServiceUnavailable {
                message: format!("invalid find-place endpoint: {err}"),
            })?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("input", input);
        Ok(url)
    }
}

/// Convert a transport failure into the place-resolution taxonomy.
fn convert_transport_error(error: TransportError) -> PlaceResolutionError {
    match error {
        TransportError::Decode { message } => PlaceResolutionError::MalformedResponse { message },
        other => PlaceResolutionError::ServiceUnavailable {
            message: other.to_string(),
        },
    }
}

/// Convert a parsed response into a [`Resolution`].
fn convert_response(response: FindPlaceResponse) -> Result<Resolution, PlaceResolutionError> {
    if !response.is_ok() && response.status != "ZERO_RESULTS" {
        return Err(PlaceResolutionError::ServiceUnavailable {
            message: response.status,
        });
    }
    let Some(top) = response.candidates.into_iter().next() else {
        return Ok(Resolution::Pending);
    };
    Ok(Resolution::Resolved(Place::new(
        PlaceId::new(top.place_id),
        top.name,
        top.formatted_address,
        Coord {
            x: top.geometry.location.lng,
            y: top.geometry.location.lat,
        },
    )))
}

impl PlaceResolver for HttpPlaceResolver {
    fn resolve(&self, input: &str) -> Result<Resolution, PlaceResolutionError> {
        let url = self.build_url(input)?;
        let response: FindPlaceResponse = self
            .transport
            .get_json(&url)
            .map_err(convert_transport_error)?;
        convert_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::api::{ApiGeometry, ApiLatLng, ApiPlace};
    use rstest::{fixture, rstest};

    #[fixture]
    fn client() -> HttpPlaceResolver {
        let config = ClientConfig::new("https://places.example.com", "secret");
        HttpPlaceResolver::with_config(config).expect("client should build")
    }

    fn paris() -> ApiPlace {
        ApiPlace {
            place_id: "ChIJD7fiBh9u5kcRYJSMaMOCCwQ".to_owned(),
            name: "Paris".to_owned(),
            formatted_address: "Paris, France".to_owned(),
            geometry: ApiGeometry {
                location: ApiLatLng {
                    lat: 48.8566,
                    lng: 2.3522,
                },
            },
        }
    }

    #[rstest]
    fn build_url_carries_input(client: HttpPlaceResolver) {
        let url = client.build_url("tour eiffel").expect("url should build");

        assert_eq!(url.path(), "/findplace");
        let input = url
            .query_pairs()
            .find(|(name, _)| name == "input")
            .map(|(_, value)| value.into_owned());
        assert_eq!(input.as_deref(), Some("tour eiffel"));
    }

    #[rstest]
    fn top_candidate_becomes_a_place() {
        let response = FindPlaceResponse {
            status: "OK".to_owned(),
            candidates: vec![paris()],
        };

        let resolution = convert_response(response).expect("should convert");

        let Resolution::Resolved(place) = resolution else {
            panic!("expected a resolved place, got {resolution:?}");
        };
        assert_eq!(place.id.as_str(), "ChIJD7fiBh9u5kcRYJSMaMOCCwQ");
        assert_eq!(place.display_name, "Paris");
        assert_eq!(place.location.y, 48.8566);
    }

    #[rstest]
    #[case("OK")]
    #[case("ZERO_RESULTS")]
    fn no_candidates_is_pending(#[case] status: &str) {
        let response = FindPlaceResponse {
            status: status.to_owned(),
            candidates: Vec::new(),
        };

        let resolution = convert_response(response).expect("should convert");

        assert_eq!(resolution, Resolution::Pending);
    }

    #[rstest]
    fn failure_statuses_are_errors() {
        let response = FindPlaceResponse {
            status: "REQUEST_DENIED".to_owned(),
            candidates: Vec::new(),
        };

        let err = convert_response(response).expect_err("should fail");

        assert!(matches!(
            err,
            PlaceResolutionError::ServiceUnavailable { .. }
        ));
    }
}
