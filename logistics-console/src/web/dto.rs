//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Location, LocationId, RouteStep, RouteSummary, TransportationId};

/// Query string of the location list page.
#[derive(Debug, Default, Deserialize)]
pub struct LocationListQuery {
    /// Filter text for the table
    pub q: Option<String>,

    /// Notice code to show after a redirect
    pub notice: Option<String>,
}

/// Location create/edit form.
///
/// Everything arrives as text; validation happens in
/// [`LocationDraft::validate`](crate::domain::LocationDraft::validate).
#[derive(Debug, Default, Deserialize)]
pub struct LocationForm {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// Query string of the transportation list page.
#[derive(Debug, Default, Deserialize)]
pub struct TransportationListQuery {
    /// Sort column (`id`, `type`, `origin`, `destination`)
    pub sort: Option<String>,

    /// `asc` or `desc`
    pub dir: Option<String>,

    pub notice: Option<String>,
}

/// Transportation create/edit form.
#[derive(Debug, Default, Deserialize)]
pub struct TransportationForm {
    #[serde(rename = "type", default)]
    pub transport_type: String,

    /// Selected origin id; empty when nothing is selected
    #[serde(default)]
    pub origin_id: String,

    #[serde(default)]
    pub destination_id: String,

    /// Comma-separated day names, e.g. `"Pzt, Çar"`. Empty means every day.
    #[serde(default)]
    pub operating_days: String,

    /// Version the edit was based on; only sent by the edit form
    pub version: Option<i64>,
}

/// Query string of the route finder page.
///
/// The two `*_q` fields filter the origin and destination pick lists
/// independently; the `*_id` fields hold the current picks.
#[derive(Debug, Default, Deserialize)]
pub struct RouteFinderQuery {
    #[serde(default)]
    pub origin_q: String,
    #[serde(default)]
    pub destination_q: String,
    #[serde(default)]
    pub origin_id: String,
    #[serde(default)]
    pub destination_id: String,

    /// `YYYY-MM-DD`; empty for any day
    #[serde(default)]
    pub date: String,

    /// Checkbox: present when only single-leg routes should be shown
    pub direct_only: Option<String>,
}

/// Parse a select box value into an id. Empty or non-numeric is no selection.
pub fn parse_location_id(raw: &str) -> Option<LocationId> {
    raw.trim().parse().ok().map(LocationId)
}

/// Parse a date input value. Empty or malformed is no date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Request to search locations.
#[derive(Debug, Deserialize)]
pub struct LocationSearchRequest {
    /// Search query (matches name, code or city)
    #[serde(default)]
    pub q: String,

    /// Maximum results (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// A location in JSON responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationResult {
    pub id: i64,
    /// Null when the location has no code
    pub code: Option<String>,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl LocationResult {
    pub fn from_location(location: &Location) -> Self {
        Self {
            id: location.id.0,
            code: location.code.map(|c| c.as_str().to_string()),
            name: location.name.clone(),
            city: location.city.clone(),
            country: location.country.clone(),
        }
    }
}

/// Response from location search.
#[derive(Debug, Serialize)]
pub struct LocationSearchResponse {
    pub locations: Vec<LocationResult>,
}

/// Request to search routes via the JSON API.
#[derive(Debug, Deserialize)]
pub struct RouteSearchRequest {
    pub origin_id: Option<i64>,
    pub destination_id: Option<i64>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub direct_only: bool,
}

/// One leg of a route in JSON responses.
#[derive(Debug, Serialize)]
pub struct RouteStepResult {
    pub transportation_id: i64,
    pub transport_type: String,
    pub origin: LocationResult,
    pub destination: LocationResult,
    /// Display form, e.g. `"Pzt, Çar"` or `"All Days"`
    pub operating_days: String,
}

impl RouteStepResult {
    pub fn from_step(step: &RouteStep) -> Self {
        let TransportationId(transportation_id) = step.transportation_id;
        Self {
            transportation_id,
            transport_type: step.transport_type.to_string(),
            origin: LocationResult::from_location(&step.origin),
            destination: LocationResult::from_location(&step.destination),
            operating_days: step.operating_days.display(),
        }
    }
}

/// A summarized route in JSON responses.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub origin: LocationResult,
    pub destination: LocationResult,
    pub total_steps: usize,
    pub transport_types: Vec<String>,
    pub is_direct: bool,
    pub steps: Vec<RouteStepResult>,
}

impl RouteResult {
    pub fn new(summary: &RouteSummary, steps: &[RouteStep]) -> Self {
        Self {
            origin: LocationResult::from_location(&summary.origin),
            destination: LocationResult::from_location(&summary.destination),
            total_steps: summary.total_steps,
            transport_types: summary
                .transport_types
                .iter()
                .map(ToString::to_string)
                .collect(),
            is_direct: summary.is_direct,
            steps: steps.iter().map(RouteStepResult::from_step).collect(),
        }
    }
}

/// Response from route search.
#[derive(Debug, Serialize)]
pub struct RouteSearchResponse {
    pub routes: Vec<RouteResult>,
}

/// A single field problem in an error response.
#[derive(Debug, Serialize)]
pub struct FieldErrorResult {
    pub field: String,
    pub message: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorResult>,
}
