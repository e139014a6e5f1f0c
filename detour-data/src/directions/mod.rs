//! HTTP client for the routing service.
//!
//! [`HttpDirectionsClient`] implements
//! [`detour_core::DirectionsProvider`]: it routes origin and
//! destination through an ordered stop list, parses the per-leg
//! distance/duration annotations, and normalises the service's
//! `waypoint_order` into the visit-order permutation the reconciler
//! expects. Requests exceeding the service's waypoint limit are
//! rejected locally, before any network round trip.

mod api;
mod client;

pub use client::{HttpDirectionsClient, MAX_WAYPOINTS};
