//! Facade crate for the Detour itinerary planning engine.
//!
//! This crate re-exports the core domain types and planner and
//! exposes the HTTP service clients behind the `client-http` feature
//! flag.

#![forbid(unsafe_code)]

pub use detour_core::{
    CandidateStop, DEFAULT_MAX_WAYPOINTS, DirectionsProvider, Effect, Itinerary, Marker,
    Place, PlaceId, PlaceResolutionError, PlaceResolver, PlanError, PlanEvent, PlanRequest,
    Planner, PlanningState, RawPlanInput, RecommendationError, RecommendationProvider,
    ReconciliationError, Resolution, RouteLeg, RouteResult, RoutingError, ValidationError,
    Weights, reconcile,
};

#[cfg(feature = "client-http")]
pub use detour_data::{
    API_KEY_ENV, ClientBuildError, ClientConfig, HttpDirectionsClient, HttpPlaceResolver,
    HttpRecommendationClient, MAX_WAYPOINTS,
};
