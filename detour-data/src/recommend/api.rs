//! Recommendation service response types.

use serde::Deserialize;

/// Top-level recommendation response.
///
/// A well-formed response always carries a `results` array; its
/// absence is reported as a malformed response rather than treated as
/// an empty recommendation.
#[derive(Debug, Deserialize)]
pub struct RecommendResponse {
    /// Suggested stops in service order, best match first.
    pub results: Option<Vec<RecommendedStop>>,
}

/// One suggested stop.
#[derive(Debug, Deserialize)]
pub struct RecommendedStop {
    /// Free-text stop name.
    pub name: String,
}
