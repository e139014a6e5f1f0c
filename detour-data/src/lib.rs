//! HTTP adapters for the Detour engine's external services.
//!
//! Responsibilities:
//! - Implement the `detour-core` provider seams over HTTP.
//! - Encapsulate each service's wire format and status vocabulary.
//! - Convert transport failures into the domain error taxonomy.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `detour-core`).
//! - Keep blocking I/O off async executors; the transport bridges
//!   async clients behind the synchronous seams.
//!
//! Invariants:
//! - Raw network errors never escape this crate.
//! - The API credential is never logged.

#![forbid(unsafe_code)]

pub mod directions;
pub mod places;
pub mod recommend;
pub mod transport;

pub use directions::{HttpDirectionsClient, MAX_WAYPOINTS};
pub use places::HttpPlaceResolver;
pub use recommend::HttpRecommendationClient;
pub use transport::{API_KEY_ENV, ClientBuildError, ClientConfig, DEFAULT_USER_AGENT};
