//! Seams to the external recommendation, routing, and place services.
//!
//! The traits are synchronous to keep the core library embeddable in
//! synchronous contexts; HTTP implementations in `detour-data` bridge
//! async calls internally. Implementations convert every transport
//! failure into the matching `ServiceUnavailable` variant so callers
//! never observe raw network errors.

use thiserror::Error;

use crate::{CandidateStop, Place, PlanRequest, RouteResult};

/// Waypoint limit assumed when an implementation does not declare one.
///
/// Matches the common routing-provider cap on intermediate stops.
pub const DEFAULT_MAX_WAYPOINTS: usize = 25;

/// Errors from [`RecommendationProvider::fetch_candidates`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendationError {
    /// The service could not be reached or returned a failure status.
    #[error("recommendation service unavailable: {message}")]
    ServiceUnavailable {
        /// Transport-level detail for diagnostics.
        message: String,
    },
    /// The response body lacked the expected result list.
    #[error("recommendation response malformed: {message}")]
    MalformedResponse {
        /// What was missing or unparsable.
        message: String,
    },
}

/// Errors from [`DirectionsProvider::fetch_route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// More stops were requested than the service accepts.
    ///
    /// Surfaced before any network call to avoid a wasted round trip.
    #[error("{count} stops exceed the routing service limit of {max}")]
    TooManyStops {
        /// Stops in the rejected request.
        count: usize,
        /// The service's waypoint limit.
        max: usize,
    },
    /// The service could not route through one or more stops.
    #[error("routing service could not route through the requested stops: {status}")]
    UnreachablePlace {
        /// Service status code describing the failure.
        status: String,
    },
    /// The service could not be reached or returned a failure status.
    #[error("routing service unavailable: {message}")]
    ServiceUnavailable {
        /// Transport-level detail for diagnostics.
        message: String,
    },
}

/// Errors from [`PlaceResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceResolutionError {
    /// The service could not be reached or returned a failure status.
    #[error("place service unavailable: {message}")]
    ServiceUnavailable {
        /// Transport-level detail for diagnostics.
        message: String,
    },
    /// The response body lacked the expected candidate fields.
    #[error("place response malformed: {message}")]
    MalformedResponse {
        /// What was missing or unparsable.
        message: String,
    },
}

/// Outcome of resolving free-text input into a place.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The input resolved to a stable place.
    Resolved(Place),
    /// The input did not resolve yet; keep the field editable.
    Pending,
}

/// Fetch candidate stops matching a plan request's theme and weights.
///
/// Implementations must preserve the service's ordering and perform no
/// deduplication or name validation; unresolved names are the routing
/// service's concern. The service is not guaranteed deterministic, so
/// callers must not assume identical calls repeat their results.
pub trait RecommendationProvider {
    /// Return at most `request.stop_count` candidate stops.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendationError::ServiceUnavailable`] on
    /// transport or availability failure and
    /// [`RecommendationError::MalformedResponse`] when the body lacks
    /// the expected result list.
    fn fetch_candidates(
        &self,
        request: &PlanRequest,
    ) -> Result<Vec<CandidateStop>, RecommendationError>;
}

/// Route origin and destination through an ordered list of stops.
pub trait DirectionsProvider {
    /// Compute a multi-leg route, optionally letting the service
    /// reorder the stops.
    ///
    /// When `optimize` is false the returned visit order must be the
    /// identity permutation.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::TooManyStops`] (without a network call)
    /// when `stops` exceeds [`DirectionsProvider::max_waypoints`],
    /// [`RoutingError::UnreachablePlace`] when the service cannot
    /// route through a stop, and [`RoutingError::ServiceUnavailable`]
    /// on transport failure.
    fn fetch_route(
        &self,
        origin: &Place,
        destination: &Place,
        stops: &[CandidateStop],
        optimize: bool,
    ) -> Result<RouteResult, RoutingError>;

    /// Maximum number of intermediate stops the service accepts.
    fn max_waypoints(&self) -> usize {
        DEFAULT_MAX_WAYPOINTS
    }
}

/// Resolve free-text input into a stable [`Place`].
pub trait PlaceResolver {
    /// Resolve `input`, or report [`Resolution::Pending`] when the
    /// provider has no match yet.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceResolutionError`] on transport failure or a
    /// malformed response body.
    fn resolve(&self, input: &str) -> Result<Resolution, PlaceResolutionError>;
}
