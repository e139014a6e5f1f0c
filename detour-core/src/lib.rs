//! Core domain types and planning logic for the Detour engine.
//!
//! Detour plans driving itineraries that are deliberately "detoured"
//! through a handful of intermediate stops picked by a recommendation
//! service to match a free-text theme. This crate owns everything
//! that does not touch the network: request validation, the provider
//! trait seams, reconciliation of routing output, and the planning
//! state machine. HTTP implementations of the seams live in
//! `detour-data`.
//!
//! Constructors and transitions return `Result` to surface invalid
//! input early; errors are recovered at the planner boundary rather
//! than panicking.

#![forbid(unsafe_code)]

pub mod itinerary;
pub mod marker;
pub mod place;
pub mod planner;
pub mod provider;
pub mod request;

#[doc(hidden)]
pub mod test_support;

pub use itinerary::{CandidateStop, Itinerary, ReconciliationError, RouteLeg, RouteResult, reconcile};
pub use marker::Marker;
pub use place::{Place, PlaceId};
pub use planner::{AttemptId, Effect, PlanError, PlanEvent, Planner, PlanningState};
pub use provider::{
    DEFAULT_MAX_WAYPOINTS, DirectionsProvider, PlaceResolutionError, PlaceResolver,
    RecommendationError, RecommendationProvider, Resolution, RoutingError,
};
pub use request::{MAX_WEIGHT, PlanRequest, RawPlanInput, ValidationError, Weights};
