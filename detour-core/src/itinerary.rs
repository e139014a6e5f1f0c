//! Itineraries and reconciliation of routing output.
//!
//! The routing service is free to reorder the stops it is given. The
//! reconciler merges the original candidate list, the service's visit
//! order permutation, and the per-leg annotations into a single
//! [`Itinerary`] that the UI can render leg by leg. Reconciliation is
//! pure and validates the service response defensively rather than
//! trusting it to echo back exactly what it was sent.

use thiserror::Error;

use crate::Place;

/// A stop suggested by the recommendation service.
///
/// The order candidates are returned in is *not* visit order; the
/// routing service decides the actual travel sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateStop {
    /// Free-text stop name, forwarded verbatim to the routing service.
    pub name: String,
}

impl CandidateStop {
    /// Construct a candidate stop from a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One leg of a computed route, between two consecutive visited points.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteLeg {
    /// Address the leg starts from.
    pub start_address: String,
    /// Address the leg ends at.
    pub end_address: String,
    /// Human-readable leg distance, e.g. `"12.4 km"`.
    pub distance_text: String,
    /// Human-readable leg duration, e.g. `"18 mins"`.
    pub duration_text: String,
}

/// Raw routing output: annotated legs plus the stop reordering.
///
/// `visit_order[k]` is the index into the original candidate list of
/// the stop visited in position `k`. When optimisation was not
/// requested it is the identity permutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResult {
    /// Legs in visit order; one per pair of consecutive points.
    pub legs: Vec<RouteLeg>,
    /// Permutation mapping visit position to candidate index.
    pub visit_order: Vec<usize>,
}

/// Errors returned by [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    /// The service returned a leg count inconsistent with the stops.
    ///
    /// A route through `n` stops must have exactly `n + 1` legs.
    /// Failing loudly here beats silently truncating a misaligned
    /// response.
    #[error("expected {expected} route legs for the requested stops, got {actual}")]
    LegCountMismatch {
        /// Required leg count: stops plus one.
        expected: usize,
        /// Leg count actually returned.
        actual: usize,
    },
    /// The visit order was not a permutation of the candidate indices.
    #[error("visit order {order:?} is not a permutation of 0..{candidate_count}")]
    InvalidVisitOrder {
        /// Number of candidates sent to the routing service.
        candidate_count: usize,
        /// The order array as returned.
        order: Vec<usize>,
    },
}

/// A complete, display-ready itinerary.
///
/// Invariant: `legs.len() == ordered_stops.len() + 1`. Instances are
/// built once per successful plan and replaced atomically.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Itinerary {
    /// Stops in actual visit order.
    pub ordered_stops: Vec<CandidateStop>,
    /// Legs in visit order, one more than the stops.
    pub legs: Vec<RouteLeg>,
    /// Starting place.
    pub origin: Place,
    /// Final place.
    pub destination: Place,
}

/// Merge routing output with the original candidate list.
///
/// Applies the visit order permutation
/// (`ordered_stops[k] = candidates[visit_order[k]]`) and pairs each
/// leg with the transition it describes.
///
/// # Errors
///
/// Returns [`ReconciliationError::LegCountMismatch`] when the leg
/// count is not `candidates.len() + 1`, and
/// [`ReconciliationError::InvalidVisitOrder`] when `visit_order` is
/// not a permutation of `0..candidates.len()` — either indicates the
/// routing service dropped or duplicated a stop.
pub fn reconcile(
    candidates: &[CandidateStop],
    route: RouteResult,
    origin: Place,
    destination: Place,
) -> Result<Itinerary, ReconciliationError> {
    let expected = candidates.len() + 1;
    if route.legs.len() != expected {
        log::warn!(
            "routing service returned {} legs for {} stops; rejecting",
            route.legs.len(),
            candidates.len()
        );
        return Err(ReconciliationError::LegCountMismatch {
            expected,
            actual: route.legs.len(),
        });
    }
    if !is_permutation(&route.visit_order, candidates.len()) {
        log::warn!(
            "routing service returned visit order {:?} for {} stops; rejecting",
            route.visit_order,
            candidates.len()
        );
        return Err(ReconciliationError::InvalidVisitOrder {
            candidate_count: candidates.len(),
            order: route.visit_order,
        });
    }
    let ordered_stops = route
        .visit_order
        .iter()
        .filter_map(|&index| candidates.get(index).cloned())
        .collect();
    Ok(Itinerary {
        ordered_stops,
        legs: route.legs,
        origin,
        destination,
    })
}

/// Report whether `order` is a permutation of `0..len`.
fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in order {
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
