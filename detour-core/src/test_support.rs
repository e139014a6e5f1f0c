//! Test doubles for the provider seams.
//!
//! These stubs return pre-configured responses, letting unit and
//! behaviour tests exercise the planner without any live service.

use geo::Coord;

use crate::itinerary::{CandidateStop, RouteLeg, RouteResult};
use crate::place::{Place, PlaceId};
use crate::provider::{
    DEFAULT_MAX_WAYPOINTS, DirectionsProvider, PlaceResolutionError, PlaceResolver,
    RecommendationError, RecommendationProvider, Resolution, RoutingError,
};
use crate::request::{PlanRequest, RawPlanInput};

/// Stub [`RecommendationProvider`] returning a fixed outcome.
#[derive(Debug, Clone)]
pub struct StubRecommendationProvider {
    response: Result<Vec<CandidateStop>, RecommendationError>,
}

impl StubRecommendationProvider {
    /// Create a provider that returns the given candidates.
    #[must_use]
    pub fn with_candidates(candidates: Vec<CandidateStop>) -> Self {
        Self {
            response: Ok(candidates),
        }
    }

    /// Create a provider that returns named candidates.
    #[must_use]
    pub fn with_names(names: &[&str]) -> Self {
        Self::with_candidates(names.iter().copied().map(CandidateStop::new).collect())
    }

    /// Create a provider that fails with the given error.
    #[must_use]
    pub fn with_error(error: RecommendationError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

impl RecommendationProvider for StubRecommendationProvider {
    fn fetch_candidates(
        &self,
        _request: &PlanRequest,
    ) -> Result<Vec<CandidateStop>, RecommendationError> {
        self.response.clone()
    }
}

/// Stub [`DirectionsProvider`] returning a fixed outcome.
#[derive(Debug, Clone)]
pub struct StubDirectionsProvider {
    response: Result<RouteResult, RoutingError>,
    max_waypoints: usize,
}

impl StubDirectionsProvider {
    /// Create a provider that returns the given route.
    #[must_use]
    pub fn with_route(route: RouteResult) -> Self {
        Self {
            response: Ok(route),
            max_waypoints: DEFAULT_MAX_WAYPOINTS,
        }
    }

    /// Create a provider that fails with the given error.
    #[must_use]
    pub fn with_error(error: RoutingError) -> Self {
        Self {
            response: Err(error),
            max_waypoints: DEFAULT_MAX_WAYPOINTS,
        }
    }

    /// Override the advertised waypoint limit.
    #[must_use]
    pub fn with_max_waypoints(mut self, max: usize) -> Self {
        self.max_waypoints = max;
        self
    }
}

impl DirectionsProvider for StubDirectionsProvider {
    fn fetch_route(
        &self,
        _origin: &Place,
        _destination: &Place,
        _stops: &[CandidateStop],
        _optimize: bool,
    ) -> Result<RouteResult, RoutingError> {
        self.response.clone()
    }

    fn max_waypoints(&self) -> usize {
        self.max_waypoints
    }
}

/// Stub [`PlaceResolver`] returning a fixed outcome.
#[derive(Debug, Clone)]
pub struct StubPlaceResolver {
    response: Result<Resolution, PlaceResolutionError>,
}

impl StubPlaceResolver {
    /// Create a resolver that resolves every input to `place`.
    #[must_use]
    pub fn resolving_to(place: Place) -> Self {
        Self {
            response: Ok(Resolution::Resolved(place)),
        }
    }

    /// Create a resolver that never resolves.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            response: Ok(Resolution::Pending),
        }
    }

    /// Create a resolver that fails with the given error.
    #[must_use]
    pub fn with_error(error: PlaceResolutionError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

impl PlaceResolver for StubPlaceResolver {
    fn resolve(&self, _input: &str) -> Result<Resolution, PlaceResolutionError> {
        self.response.clone()
    }
}

/// A resolved place for tests.
#[must_use]
pub fn sample_place(id: &str) -> Place {
    Place::new(
        PlaceId::new(id),
        id.to_owned(),
        format!("{id}, France"),
        Coord { x: 0.0, y: 0.0 },
    )
}

/// A complete, valid raw form for tests.
#[must_use]
pub fn sample_raw_input() -> RawPlanInput {
    RawPlanInput {
        origin: Some(sample_place("paris")),
        destination: Some(sample_place("lyon")),
        adjective: "quirky".to_owned(),
        stop_count: "3".to_owned(),
        popularity_weight: "80".to_owned(),
        model_weight: "50".to_owned(),
        distance_weight: "20".to_owned(),
    }
}

/// Uniform legs for a route visiting `stops` stops.
#[must_use]
pub fn sample_legs(stops: usize) -> Vec<RouteLeg> {
    (0..=stops)
        .map(|i| RouteLeg {
            start_address: format!("point {i}"),
            end_address: format!("point {}", i + 1),
            distance_text: "1 km".to_owned(),
            duration_text: "5 mins".to_owned(),
        })
        .collect()
}
