//! Plan requests and their validation.
//!
//! [`RawPlanInput`] carries the user's fields exactly as the form
//! collaborator read them. [`RawPlanInput::validate`] either promotes
//! them into an immutable [`PlanRequest`] or reports the first
//! offending field. Validation is pure: no network, no side effects.

use thiserror::Error;

use crate::Place;

/// Inclusive upper bound for each preference weight.
pub const MAX_WEIGHT: f32 = 100.0;

/// Errors returned by [`RawPlanInput::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was empty or unset.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// A numeric field failed to parse or was out of range.
    #[error("field `{field}` is not a valid number: `{value}`")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value as entered.
        value: String,
    },
}

/// Preference weights steering the recommendation service.
///
/// Each weight lies in `[0.0, 100.0]`. Construction validates the
/// range so downstream components never see an out-of-range weight.
///
/// # Examples
/// ```
/// use detour_core::Weights;
///
/// let weights = Weights::new(80.0, 50.0, 20.0)?;
/// assert_eq!(weights.popularity, 80.0);
/// # Ok::<(), detour_core::ValidationError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    /// How strongly popular stops are favoured.
    pub popularity: f32,
    /// How strongly thematic relevance to the adjective is favoured.
    pub model: f32,
    /// How strongly detour distance is penalised.
    pub distance: f32,
}

impl Weights {
    /// Validate and construct a set of weights.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNumber`] when any weight is
    /// outside `[0.0, 100.0]` or not a finite number.
    pub fn new(popularity: f32, model: f32, distance: f32) -> Result<Self, ValidationError> {
        check_weight("popularity weight", popularity)?;
        check_weight("model weight", model)?;
        check_weight("distance weight", distance)?;
        Ok(Self {
            popularity,
            model,
            distance,
        })
    }
}

fn check_weight(field: &'static str, value: f32) -> Result<(), ValidationError> {
    if value.is_finite() && (0.0..=MAX_WEIGHT).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidNumber {
            field,
            value: value.to_string(),
        })
    }
}

/// A validated, immutable planning request.
///
/// Constructed only via [`RawPlanInput::validate`]; a new submission
/// replaces the request wholesale rather than mutating it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRequest {
    /// Starting place.
    pub origin: Place,
    /// Final place.
    pub destination: Place,
    /// Free-text theme steering the recommendations.
    pub adjective: String,
    /// Number of intermediate stops requested, at least one.
    pub stop_count: usize,
    /// Preference weights forwarded to the recommendation service.
    pub weights: Weights,
}

/// Unvalidated form fields as read from the UI collaborator.
///
/// Origin and destination arrive already resolved (or not at all);
/// the numeric fields arrive as the raw strings the user typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPlanInput {
    /// Resolved origin, if the user picked one.
    pub origin: Option<Place>,
    /// Resolved destination, if the user picked one.
    pub destination: Option<Place>,
    /// Theme adjective as typed.
    pub adjective: String,
    /// Requested stop count as typed.
    pub stop_count: String,
    /// Popularity weight as typed.
    pub popularity_weight: String,
    /// Model (thematic relevance) weight as typed.
    pub model_weight: String,
    /// Distance penalty weight as typed.
    pub distance_weight: String,
}

impl RawPlanInput {
    /// Validate the raw fields into a [`PlanRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] when origin,
    /// destination, adjective, or stop count is empty, and
    /// [`ValidationError::InvalidNumber`] when the stop count is not a
    /// positive integer or a weight is not a number in `[0.0, 100.0]`.
    pub fn validate(&self) -> Result<PlanRequest, ValidationError> {
        let origin = self
            .origin
            .clone()
            .ok_or(ValidationError::MissingField { field: "origin" })?;
        let destination = self.destination.clone().ok_or(ValidationError::MissingField {
            field: "destination",
        })?;
        let adjective = self.adjective.trim();
        if adjective.is_empty() {
            return Err(ValidationError::MissingField { field: "adjective" });
        }
        let stop_count = parse_stop_count(&self.stop_count)?;
        let weights = Weights::new(
            parse_weight("popularity weight", &self.popularity_weight)?,
            parse_weight("model weight", &self.model_weight)?,
            parse_weight("distance weight", &self.distance_weight)?,
        )?;
        Ok(PlanRequest {
            origin,
            destination,
            adjective: adjective.to_owned(),
            stop_count,
            weights,
        })
    }
}

impl From<&PlanRequest> for RawPlanInput {
    /// Render a validated request back into raw form fields.
    ///
    /// Used to re-populate the form on resubmission; validating the
    /// result yields a request equal to the original.
    fn from(request: &PlanRequest) -> Self {
        Self {
            origin: Some(request.origin.clone()),
            destination: Some(request.destination.clone()),
            adjective: request.adjective.clone(),
            stop_count: request.stop_count.to_string(),
            popularity_weight: request.weights.popularity.to_string(),
            model_weight: request.weights.model.to_string(),
            distance_weight: request.weights.distance.to_string(),
        }
    }
}

fn parse_stop_count(raw: &str) -> Result<usize, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField {
            field: "stop count",
        });
    }
    trimmed
        .parse::<usize>()
        .ok()
        .filter(|count| *count >= 1)
        .ok_or_else(|| ValidationError::InvalidNumber {
            field: "stop count",
            value: raw.to_owned(),
        })
}

fn parse_weight(field: &'static str, raw: &str) -> Result<f32, ValidationError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_owned(),
        })
        .and_then(|value| check_weight(field, value).map(|()| value))
}
