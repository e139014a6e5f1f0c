//! HTTP client for the stop recommendation service.
//!
//! [`HttpRecommendationClient`] implements
//! [`detour_core::RecommendationProvider`] by serialising a validated
//! plan request into one weighted query and parsing the ordered
//! candidate list out of the response. Candidate order is preserved
//! verbatim; unresolved names are the routing service's concern.

mod api;
mod client;

pub use client::HttpRecommendationClient;
