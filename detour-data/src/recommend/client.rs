//! HTTP implementation of the recommendation seam.

use detour_core::{CandidateStop, PlanRequest, RecommendationError, RecommendationProvider};
use url::Url;

use super::api::RecommendResponse;
use crate::transport::{ClientBuildError, ClientConfig, Transport, TransportError};

/// Path of the recommendation endpoint under the configured base URL.
const RECOMMEND_PATH: &str = "recommendations";

/// HTTP-based recommendation client.
///
/// # Example
///
/// ```no_run
/// use detour_data::recommend::HttpRecommendationClient;
/// use detour_data::transport::ClientConfig;
///
/// let config = ClientConfig::new("https://recs.example.com", "secret");
/// let client = HttpRecommendationClient::with_config(config)?;
/// # Ok::<(), detour_data::transport::ClientBuildError>(())
/// ```
#[derive(Debug)]
pub struct HttpRecommendationClient {
    transport: Transport,
    base_url: Url,
    api_key: String,
}

impl HttpRecommendationClient {
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

    /// Build the recommendation query for a validated request.
    fn build_url(&self, request: &PlanRequest) -> Result<Url, RecommendationError> {
        let mut url = self
            .base_url
            .join(RECOMMEND_PATH)
            .map_err(|err| RecommendationError::ServiceUnavailable {
                message: format!("invalid recommendation endpoint: {err}"),
            })?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("origin", request.origin.id.as_str())
            .append_pair("destination", request.destination.id.as_str())
            .append_pair("keyword", &request.adjective)
            .append_pair("modelWeight", &request.weights.model.to_string())
            .append_pair("distanceWeight", &request.weights.distance.to_string())
            .append_pair("popularityWeight", &request.weights.popularity.to_string())
            .append_pair("targetCount", &request.stop_count.to_string());
        Ok(url)
    }
}

/// Convert a transport failure into the recommendation taxonomy.
fn convert_transport_error(error: TransportError) -> RecommendationError {
    match error {
        TransportError::Decode { message } => RecommendationError::MalformedResponse { message },
        other => RecommendationError::ServiceUnavailable {
            message: other.to_string(),
        },
    }
}

impl RecommendationProvider for HttpRecommendationClient {
    fn fetch_candidates(
        &self,
        request: &PlanRequest,
    ) -> Result<Vec<CandidateStop>, RecommendationError> {
        let url = self.build_url(request)?;
        let response: RecommendResponse = self
            .transport
            .get_json(&url)
            .map_err(convert_transport_error)?;
        let results =
            response
                .results
                .ok_or_else(|| RecommendationError::MalformedResponse {
                    message: "response missing `results` array".to_owned(),
                })?;
        Ok(results
            .into_iter()
            .map(|stop| CandidateStop::new(stop.name))
            .collect())
    }
}
