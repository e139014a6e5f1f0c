//! HTTP client for place resolution.
//!
//! [`HttpPlaceResolver`] implements [`detour_core::PlaceResolver`]:
//! it turns free-text input into a [`detour_core::Place`] carrying
//! the provider's stable identifier, or reports
//! [`detour_core::Resolution::Pending`] when the provider has no
//! match yet.

mod api;
mod client;

pub use client::HttpPlaceResolver;
