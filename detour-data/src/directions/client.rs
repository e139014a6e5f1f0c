//! HTTP implementation of the routing seam.

use detour_core::{
    CandidateStop, DirectionsProvider, Place, RouteLeg, RouteResult, RoutingError,
};
use url::Url;

use super::api::DirectionsResponse;
use crate::transport::{ClientBuildError, ClientConfig, Transport, TransportError};

/// Path of the directions endpoint under the configured base URL.
const DIRECTIONS_PATH: &str = "directions";

/// Maximum number of intermediate stops the routing service accepts.
pub const MAX_WAYPOINTS: usize = 25;

/// HTTP-based directions client.
///
/// # Example
///
/// ```no_run
/// use detour_data::directions::HttpDirectionsClient;
/// use detour_data::transport::ClientConfig;
///
/// let config = ClientConfig::new("https://maps.example.com", "secret");
/// let client = HttpDirectionsClient::with_config(config)?;
/// # Ok::<(), detour_data::transport::ClientBuildError>(())
/// ```
#[derive(Debug)]
pub struct HttpDirectionsClient {
    transport: Transport,
    base_url: Url,
    api_key: String,
}

impl HttpDirectionsClient {
    /// Create a client with the credential read from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is unset, the base URL does
    /// not parse, or the HTTP client or runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(ClientConfig::from_env(base_url)?)
    }

    /// Create a client with explicit configuration.
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

    /// Build the directions query.
    ///
    /// Waypoints are pipe-separated; an `optimize:true` prefix lets
    /// the service reorder them.
    fn build_url(
        &self,
        origin: &Place,
        destination: &Place,
        stops: &[CandidateStop],
        optimize: bool,
    ) -> Result<Url, RoutingError> {
        let mut url = self
            .base_url
            .join(DIRECTIONS_PATH)
            .map_err(|err| RoutingError::ServiceUnavailable {
                message: format!("invalid directions endpoint: {err}"),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("key", &self.api_key)
                .append_pair("origin", &format!("place_id:{}", origin.id))
                .append_pair("destination", &format!("place_id:{}", destination.id))
                .append_pair("mode", "driving");
            if !stops.is_empty() {
                let names: Vec<&str> = stops.iter().map(|stop| stop.name.as_str()).collect();
                let prefix = if optimize { "optimize:true|" } else { "" };
                pairs.append_pair("waypoints", &format!("{prefix}{}", names.join("|")));
            }
        }
        Ok(url)
    }
}

/// Convert a transport failure into the routing taxonomy.
///
/// The routing taxonomy has no malformed-response variant, so decode
/// failures also surface as `ServiceUnavailable`.
fn convert_transport_error(error: TransportError) -> RoutingError {
    RoutingError::ServiceUnavailable {
        message: error.to_string(),
    }
}

/// Convert a parsed response into a [`RouteResult`].
///
/// `stop_count` is the number of waypoints sent; `optimize` mirrors
/// the request flag. When optimisation was not requested, the visit
/// order is forced to the identity permutation regardless of what the
/// wire response carried.
fn convert_response(
    response: DirectionsResponse,
    stop_count: usize,
    optimize: bool,
) -> Result<RouteResult, RoutingError> {
    if !response.is_ok() {
        let detail = response.error_message.unwrap_or_default();
        return Err(match response.status.as_str() {
            "NOT_FOUND" | "ZERO_RESULTS" => RoutingError::UnreachablePlace {
                status: response.status,
            },
            _ => RoutingError::ServiceUnavailable {
                message: format!("{}: {detail}", response.status),
            },
        });
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::ServiceUnavailable {
            message: "response contained no routes".to_owned(),
        })?;

    let identity: Vec<usize> = (0..stop_count).collect();
    let visit_order = if optimize {
        route.waypoint_order.unwrap_or(identity)
    } else {
        identity
    };

    let legs = route
        .legs
        .into_iter()
        .map(|leg| RouteLeg {
            start_address: leg.start_address,
            end_address: leg.end_address,
            distance_text: leg.distance.text,
            duration_text: leg.duration.text,
        })
        .collect();

    Ok(RouteResult { legs, visit_order })
}

impl DirectionsProvider for HttpDirectionsClient {
    fn fetch_route(
        &self,
        origin: &Place,
        destination: &Place,
        stops: &[CandidateStop],
        optimize: bool,
    ) -> Result<RouteResult, RoutingError> {
        // Reject oversized requests locally; a round trip would only
        // come back with the same answer.
        if stops.len() > MAX_WAYPOINTS {
            return Err(RoutingError::TooManyStops {
                count: stops.len(),
                max: MAX_WAYPOINTS,
            });
        }
        let url = self.build_url(origin, destination, stops, optimize)?;
        let response: DirectionsResponse = self
            .transport
            .get_json(&url)
            .map_err(convert_transport_error)?;
        convert_response(response, stops.len(), optimize)
    }

    fn max_waypoints(&self) -> usize {
        MAX_WAYPOINTS
    }
}
