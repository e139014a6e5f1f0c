//! The itinerary planning state machine.
//!
//! [`Planner`] owns the request lifecycle (idle, validating, fetching
//! candidates, fetching the route, ready, failed), the working
//! waypoint list the user edits by hand, and transient marker
//! selection. Every transition is a pure function of the current
//! state and a [`PlanEvent`], returning the [`Effect`] the host must
//! execute; this keeps the machine deterministic and unit-testable
//! without any rendering or network layer.
//!
//! Only one planning attempt is live at a time. Each outbound effect
//! is tagged with a monotonically increasing attempt id; a response
//! event carrying a stale id is discarded without touching state, so
//! a superseded attempt can never commit its result.

use crate::itinerary::{Itinerary, RouteResult, reconcile};
use crate::provider::{DirectionsProvider, RecommendationProvider, RecommendationError, RoutingError};
use crate::request::{PlanRequest, RawPlanInput, ValidationError};
use crate::{CandidateStop, Marker, ReconciliationError};

/// Monotonically increasing tag identifying one planning attempt.
pub type AttemptId = u64;

/// Any error that can terminate a planning attempt.
///
/// Each variant wraps the component error unchanged; the planner
/// recovers all of them into [`PlanningState::Failed`] rather than
/// letting them escape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// The raw input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The recommendation service failed.
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    /// The routing service failed.
    #[error(transparent)]
    Routing(#[from] RoutingError),
    /// The routing response could not be reconciled with the stops.
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
}

/// Lifecycle of the current planning attempt.
///
/// Exactly one value is live at a time. `Validating` is transient:
/// validation is synchronous, so observers between events only ever
/// see the other five states.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanningState {
    /// No attempt in progress.
    Idle,
    /// Raw input is being validated.
    Validating,
    /// Waiting on the recommendation service.
    FetchingCandidates {
        /// The validated request in flight.
        request: PlanRequest,
    },
    /// Waiting on the routing service.
    FetchingRoute {
        /// The validated request in flight.
        request: PlanRequest,
        /// Stops sent to the routing service, recommendation order.
        candidates: Vec<CandidateStop>,
    },
    /// A plan completed; the itinerary is ready to render.
    Ready {
        /// The reconciled itinerary.
        itinerary: Itinerary,
    },
    /// The attempt failed; resubmission is user-initiated.
    Failed {
        /// Why the attempt failed.
        error: PlanError,
    },
}

/// An input to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanEvent {
    /// The user submitted the form.
    Submit(RawPlanInput),
    /// The recommendation call for `attempt` completed.
    CandidatesFetched {
        /// Attempt the response belongs to.
        attempt: AttemptId,
        /// The service outcome.
        result: Result<Vec<CandidateStop>, RecommendationError>,
    },
    /// The routing call for `attempt` completed.
    RouteFetched {
        /// Attempt the response belongs to.
        attempt: AttemptId,
        /// The service outcome.
        result: Result<RouteResult, RoutingError>,
    },
    /// Abandon the in-flight attempt, keeping waypoints and markers.
    Cancel,
    /// Reset to idle, discarding waypoints, selection, and itinerary.
    Clear,
    /// Append the marker at `marker` to the working waypoint list.
    AddWaypoint {
        /// Index into the marker set.
        marker: usize,
    },
    /// Remove the waypoint at `waypoint` from the working list.
    RemoveWaypoint {
        /// Index into the working waypoint list.
        waypoint: usize,
    },
    /// Mark the marker at `marker` as selected.
    SelectMarker {
        /// Index into the marker set.
        marker: usize,
    },
    /// Clear marker selection.
    DeselectMarker,
}

/// A side effect the host must execute after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Call the recommendation service and feed back
    /// [`PlanEvent::CandidatesFetched`] with the same attempt id.
    FetchCandidates {
        /// Tag to echo back with the response.
        attempt: AttemptId,
        /// The validated request to serialise.
        request: PlanRequest,
    },
    /// Call the routing service and feed back
    /// [`PlanEvent::RouteFetched`] with the same attempt id.
    FetchRoute {
        /// Tag to echo back with the response.
        attempt: AttemptId,
        /// The validated request (origin and destination).
        request: PlanRequest,
        /// Stops to route through, recommendation order.
        stops: Vec<CandidateStop>,
        /// Whether the service may reorder the stops.
        optimize: bool,
    },
}

/// The itinerary planning orchestrator.
///
/// # Examples
/// ```
/// use detour_core::{PlanEvent, Planner, PlanningState};
///
/// let mut planner = Planner::new();
/// let effect = planner.handle(PlanEvent::Submit(Default::default()));
/// // An empty form fails validation without any service call.
/// assert!(matches!(effect, detour_core::Effect::None));
/// assert!(matches!(planner.state(), PlanningState::Failed { .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Planner {
    state: PlanningState,
    markers: Vec<Marker>,
    waypoints: Vec<Marker>,
    selected_marker: Option<usize>,
    optimize: bool,
    attempt: AttemptId,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    /// Create an idle planner with no markers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_markers(Vec::new())
    }

    /// Create an idle planner over an externally supplied marker set.
    #[must_use]
    pub fn with_markers(markers: Vec<Marker>) -> Self {
        Self {
            state: PlanningState::Idle,
            markers,
            waypoints: Vec::new(),
            selected_marker: None,
            optimize: true,
            attempt: 0,
        }
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> &PlanningState {
        &self.state
    }

    /// The itinerary of the last successful plan, if any.
    #[must_use]
    pub fn itinerary(&self) -> Option<&Itinerary> {
        match &self.state {
            PlanningState::Ready { itinerary } => Some(itinerary),
            _ => None,
        }
    }

    /// The marker set.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The working waypoint list consumed by the next submission.
    #[must_use]
    pub fn waypoints(&self) -> &[Marker] {
        &self.waypoints
    }

    /// Index of the selected marker, if any.
    #[must_use]
    pub fn selected_marker(&self) -> Option<usize> {
        self.selected_marker
    }

    /// Whether the routing service may reorder stops.
    #[must_use]
    pub fn optimize(&self) -> bool {
        self.optimize
    }

    /// Toggle stop-order optimisation for subsequent submissions.
    pub fn set_optimize(&mut self, optimize: bool) {
        self.optimize = optimize;
    }

    /// Apply an event, returning the effect the host must execute.
    pub fn handle(&mut self, event: PlanEvent) -> Effect {
        match event {
            PlanEvent::Submit(raw) => self.on_submit(&raw),
            PlanEvent::CandidatesFetched { attempt, result } => {
                self.on_candidates(attempt, result)
            }
            PlanEvent::RouteFetched { attempt, result } => self.on_route(attempt, result),
            PlanEvent::Cancel => {
                // Invalidate any in-flight attempt so a late response
                // is dropped by the attempt guard.
                self.attempt += 1;
                self.state = PlanningState::Idle;
                Effect::None
            }
            PlanEvent::Clear => {
                self.attempt += 1;
                self.state = PlanningState::Idle;
                self.waypoints.clear();
                self.selected_marker = None;
                Effect::None
            }
            PlanEvent::AddWaypoint { marker } => {
                if self.allows_waypoint_edits() {
                    if let Some(found) = self.markers.get(marker) {
                        self.waypoints.push(found.clone());
                        self.selected_marker = None;
                    }
                }
                Effect::None
            }
            PlanEvent::RemoveWaypoint { waypoint } => {
                if self.allows_waypoint_edits() && waypoint < self.waypoints.len() {
                    self.waypoints.remove(waypoint);
                    self.selected_marker = None;
                }
                Effect::None
            }
            PlanEvent::SelectMarker { marker } => {
                if marker < self.markers.len() {
                    self.selected_marker = Some(marker);
                }
                Effect::None
            }
            PlanEvent::DeselectMarker => {
                self.selected_marker = None;
                Effect::None
            }
        }
    }

    /// Waypoint edits are permitted only while no attempt is in flight.
    fn allows_waypoint_edits(&self) -> bool {
        matches!(
            self.state,
            PlanningState::Idle | PlanningState::Ready { .. }
        )
    }

    fn on_submit(&mut self, raw: &RawPlanInput) -> Effect {
        // A new submission supersedes anything in flight; the previous
        // itinerary (if any) is discarded atomically with this
        // assignment.
        self.attempt += 1;
        self.state = PlanningState::Validating;
        match raw.validate() {
            Ok(request) => {
                self.state = PlanningState::FetchingCandidates {
                    request: request.clone(),
                };
                Effect::FetchCandidates {
                    attempt: self.attempt,
                    request,
                }
            }
            Err(error) => {
                self.state = PlanningState::Failed {
                    error: error.into(),
                };
                Effect::None
            }
        }
    }

    fn on_candidates(
        &mut self,
        attempt: AttemptId,
        result: Result<Vec<CandidateStop>, RecommendationError>,
    ) -> Effect {
        if attempt != self.attempt {
            log::warn!(
                "dropping stale recommendation response for attempt {attempt} (current {})",
                self.attempt
            );
            return Effect::None;
        }
        let previous = std::mem::replace(&mut self.state, PlanningState::Idle);
        let PlanningState::FetchingCandidates { request } = previous else {
            log::warn!("ignoring recommendation response outside candidate fetch");
            self.state = previous;
            return Effect::None;
        };
        match result {
            Ok(mut stops) => {
                // Manual waypoints travel after the recommended stops;
                // the routing service may still reorder everything.
                stops.extend(self.waypoints.iter().map(Marker::as_candidate));
                self.state = PlanningState::FetchingRoute {
                    request: request.clone(),
                    candidates: stops.clone(),
                };
                Effect::FetchRoute {
                    attempt,
                    request,
                    stops,
                    optimize: self.optimize,
                }
            }
            Err(error) => {
                self.state = PlanningState::Failed {
                    error: error.into(),
                };
                Effect::None
            }
        }
    }

    fn on_route(
        &mut self,
        attempt: AttemptId,
        result: Result<RouteResult, RoutingError>,
    ) -> Effect {
        if attempt != self.attempt {
            log::warn!(
                "dropping stale route response for attempt {attempt} (current {})",
                self.attempt
            );
            return Effect::None;
        }
        let previous = std::mem::replace(&mut self.state, PlanningState::Idle);
        let PlanningState::FetchingRoute {
            request,
            candidates,
        } = previous
        else {
            log::warn!("ignoring route response outside route fetch");
            self.state = previous;
            return Effect::None;
        };
        self.state = match result {
            Ok(route) => {
                match reconcile(&candidates, route, request.origin, request.destination) {
                    Ok(itinerary) => PlanningState::Ready { itinerary },
                    Err(error) => PlanningState::Failed {
                        error: error.into(),
                    },
                }
            }
            Err(error) => PlanningState::Failed {
                error: error.into(),
            },
        };
        Effect::None
    }

    /// Drive a full planning attempt against synchronous providers.
    ///
    /// Submits `raw`, executes each effect against the providers, and
    /// feeds the responses back until the machine settles in `Ready`
    /// or `Failed`. The waypoint-count pre-flight check happens here,
    /// before the routing provider is invoked, so an oversized request
    /// never costs a round trip.
    pub fn run_to_completion<R, D>(
        &mut self,
        raw: RawPlanInput,
        recommender: &R,
        directions: &D,
    ) -> &PlanningState
    where
        R: RecommendationProvider + ?Sized,
        D: DirectionsProvider + ?Sized,
    {
        let mut effect = self.handle(PlanEvent::Submit(raw));
        loop {
            effect = match effect {
                Effect::None => break,
                Effect::FetchCandidates { attempt, request } => {
                    let result = recommender.fetch_candidates(&request);
                    self.handle(PlanEvent::CandidatesFetched { attempt, result })
                }
                Effect::FetchRoute {
                    attempt,
                    request,
                    stops,
                    optimize,
                } => {
                    let max = directions.max_waypoints();
                    let result = if stops.len() > max {
                        Err(RoutingError::TooManyStops {
                            count: stops.len(),
                            max,
                        })
                    } else {
                        directions.fetch_route(
                            &request.origin,
                            &request.destination,
                            &stops,
                            optimize,
                        )
                    };
                    self.handle(PlanEvent::RouteFetched { attempt, result })
                }
            };
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        StubDirectionsProvider, StubRecommendationProvider, sample_legs, sample_raw_input,
    };
    use geo::Coord;
    use rstest::{fixture, rstest};

    fn marker(label: &str) -> Marker {
        Marker::new(Coord { x: 2.2945, y: 48.8605 }, label)
    }

    #[fixture]
    fn planner() -> Planner {
        Planner::with_markers(vec![marker("X"), marker("Y"), marker("Z")])
    }

    fn submit(planner: &mut Planner) -> Effect {
        planner.handle(PlanEvent::Submit(sample_raw_input()))
    }

    #[rstest]
    fn submit_emits_candidate_fetch(mut planner: Planner) {
        let effect = submit(&mut planner);
        assert!(matches!(effect, Effect::FetchCandidates { attempt: 1, .. }));
        assert!(matches!(
            planner.state(),
            PlanningState::FetchingCandidates { .. }
        ));
    }

    #[rstest]
    fn invalid_input_fails_without_effects(mut planner: Planner) {
        let mut raw = sample_raw_input();
        raw.adjective = String::new();
        let effect = planner.handle(PlanEvent::Submit(raw));
        assert_eq!(effect, Effect::None);
        assert!(matches!(
            planner.state(),
            PlanningState::Failed {
                error: PlanError::Validation(ValidationError::MissingField { field: "adjective" }),
            }
        ));
    }

    #[rstest]
    fn candidates_flow_into_route_fetch(mut planner: Planner) {
        submit(&mut planner);
        let effect = planner.handle(PlanEvent::CandidatesFetched {
            attempt: 1,
            result: Ok(vec![CandidateStop::new("A"), CandidateStop::new("B")]),
        });
        let Effect::FetchRoute { stops, optimize, .. } = effect else {
            panic!("expected a route fetch, got {effect:?}");
        };
        assert_eq!(stops.len(), 2);
        assert!(optimize);
    }

    #[rstest]
    fn manual_waypoints_follow_recommended_stops(mut planner: Planner) {
        planner.handle(PlanEvent::AddWaypoint { marker: 0 });
        submit(&mut planner);
        let effect = planner.handle(PlanEvent::CandidatesFetched {
            attempt: 1,
            result: Ok(vec![CandidateStop::new("A")]),
        });
        let Effect::FetchRoute { stops, .. } = effect else {
            panic!("expected a route fetch, got {effect:?}");
        };
        let names: Vec<&str> = stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "X"]);
    }

    #[rstest]
    fn stale_candidate_response_is_dropped(mut planner: Planner) {
        submit(&mut planner); // attempt 1
        submit(&mut planner); // attempt 2 supersedes it
        let effect = planner.handle(PlanEvent::CandidatesFetched {
            attempt: 1,
            result: Ok(vec![CandidateStop::new("A")]),
        });
        assert_eq!(effect, Effect::None);
        assert!(matches!(
            planner.state(),
            PlanningState::FetchingCandidates { .. }
        ));
    }

    #[rstest]
    fn stale_route_response_never_commits(mut planner: Planner) {
        submit(&mut planner);
        planner.handle(PlanEvent::CandidatesFetched {
            attempt: 1,
            result: Ok(vec![CandidateStop::new("A")]),
        });
        submit(&mut planner); // supersede mid-route
        let effect = planner.handle(PlanEvent::RouteFetched {
            attempt: 1,
            result: Ok(RouteResult {
                legs: sample_legs(1),
                visit_order: vec![0],
            }),
        });
        assert_eq!(effect, Effect::None);
        assert!(planner.itinerary().is_none());
    }

    #[rstest]
    fn routing_failure_surfaces_service_unavailable(mut planner: Planner) {
        let recommender = StubRecommendationProvider::with_names(&["A", "B"]);
        let directions = StubDirectionsProvider::with_error(RoutingError::ServiceUnavailable {
            message: "connection refused".to_owned(),
        });
        let state = planner.run_to_completion(sample_raw_input(), &recommender, &directions);
        assert!(matches!(
            state,
            PlanningState::Failed {
                error: PlanError::Routing(RoutingError::ServiceUnavailable { .. }),
            }
        ));
    }

    #[rstest]
    fn oversized_stop_list_is_rejected_before_routing(mut planner: Planner) {
        let recommender = StubRecommendationProvider::with_names(&["A", "B", "C"]);
        // The stub would happily return a route; the driver must not ask.
        let directions = StubDirectionsProvider::with_route(RouteResult {
            legs: sample_legs(3),
            visit_order: vec![0, 1, 2],
        })
        .with_max_waypoints(2);
        let state = planner.run_to_completion(sample_raw_input(), &recommender, &directions);
        assert!(matches!(
            state,
            PlanningState::Failed {
                error: PlanError::Routing(RoutingError::TooManyStops { count: 3, max: 2 }),
            }
        ));
    }

    #[rstest]
    fn happy_path_reaches_ready(mut planner: Planner) {
        let recommender = StubRecommendationProvider::with_names(&["A", "B", "C"]);
        let directions = StubDirectionsProvider::with_route(RouteResult {
            legs: sample_legs(3),
            visit_order: vec![2, 0, 1],
        });
        planner.run_to_completion(sample_raw_input(), &recommender, &directions);
        let itinerary = planner.itinerary().expect("plan should succeed");
        let names: Vec<&str> = itinerary
            .ordered_stops
            .iter()
            .map(|stop| stop.name.as_str())
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(itinerary.legs.len(), 4);
    }

    #[rstest]
    fn resubmission_discards_previous_itinerary(mut planner: Planner) {
        let recommender = StubRecommendationProvider::with_names(&["A"]);
        let directions = StubDirectionsProvider::with_route(RouteResult {
            legs: sample_legs(1),
            visit_order: vec![0],
        });
        planner.run_to_completion(sample_raw_input(), &recommender, &directions);
        assert!(planner.itinerary().is_some());

        submit(&mut planner);
        assert!(planner.itinerary().is_none());
    }

    #[rstest]
    fn removing_a_waypoint_clears_selection(mut planner: Planner) {
        planner.handle(PlanEvent::AddWaypoint { marker: 0 });
        planner.handle(PlanEvent::AddWaypoint { marker: 1 });
        planner.handle(PlanEvent::AddWaypoint { marker: 2 });
        planner.handle(PlanEvent::SelectMarker { marker: 2 });

        planner.handle(PlanEvent::RemoveWaypoint { waypoint: 1 });

        let labels: Vec<&str> = planner
            .waypoints()
            .iter()
            .map(|w| w.label.as_str())
            .collect();
        assert_eq!(labels, vec!["X", "Z"]);
        assert_eq!(planner.selected_marker(), None);
    }

    #[rstest]
    fn adding_a_waypoint_clears_selection(mut planner: Planner) {
        planner.handle(PlanEvent::SelectMarker { marker: 1 });
        planner.handle(PlanEvent::AddWaypoint { marker: 1 });
        assert_eq!(planner.selected_marker(), None);
        assert_eq!(planner.waypoints().len(), 1);
    }

    #[rstest]
    fn waypoint_edits_ignored_while_fetching(mut planner: Planner) {
        submit(&mut planner);
        planner.handle(PlanEvent::AddWaypoint { marker: 0 });
        assert!(planner.waypoints().is_empty());
    }

    #[rstest]
    fn cancel_returns_to_idle_and_keeps_waypoints(mut planner: Planner) {
        planner.handle(PlanEvent::AddWaypoint { marker: 0 });
        submit(&mut planner);
        planner.handle(PlanEvent::Cancel);
        assert_eq!(planner.state(), &PlanningState::Idle);
        assert_eq!(planner.waypoints().len(), 1);

        // The cancelled attempt's response must not resurrect it.
        let effect = planner.handle(PlanEvent::CandidatesFetched {
            attempt: 1,
            result: Ok(vec![CandidateStop::new("A")]),
        });
        assert_eq!(effect, Effect::None);
        assert_eq!(planner.state(), &PlanningState::Idle);
    }

    #[rstest]
    fn clear_resets_waypoints_and_selection(mut planner: Planner) {
        planner.handle(PlanEvent::AddWaypoint { marker: 0 });
        planner.handle(PlanEvent::SelectMarker { marker: 1 });
        planner.handle(PlanEvent::Clear);
        assert_eq!(planner.state(), &PlanningState::Idle);
        assert!(planner.waypoints().is_empty());
        assert_eq!(planner.selected_marker(), None);
    }

    #[rstest]
    fn selecting_out_of_range_marker_is_ignored(mut planner: Planner) {
        planner.handle(PlanEvent::SelectMarker { marker: 9 });
        assert_eq!(planner.selected_marker(), None);
    }

    #[rstest]
    fn optimize_flag_flows_into_route_effect(mut planner: Planner) {
        planner.set_optimize(false);
        submit(&mut planner);
        let effect = planner.handle(PlanEvent::CandidatesFetched {
            attempt: 1,
            result: Ok(vec![CandidateStop::new("A")]),
        });
        assert!(matches!(
            effect,
            Effect::FetchRoute { optimize: false, .. }
        ));
    }
}
