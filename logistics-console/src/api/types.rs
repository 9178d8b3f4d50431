//! Logistics API wire types.
//!
//! These map directly to the backend's JSON. List endpoints return a bare
//! JSON array of these records; anything else is rejected when decoding.

use serde::{Deserialize, Serialize};

/// A location as returned by `/locations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub id: i64,
    /// 3-letter code. Absent, null or empty when the location has none.
    #[serde(default)]
    pub location_code: Option<String>,
    pub name: String,
    pub city: String,
    pub country: String,
}

/// Body of `POST /locations` and `PUT /locations/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRequest {
    /// Empty string when the location has no code.
    pub code: String,
    pub name: String,
    pub city: String,
    pub country: String,
}

/// A transportation leg as returned by `/transportations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportationDto {
    pub id: i64,
    #[serde(rename = "type")]
    pub transport_type: String,
    pub origin: LocationDto,
    pub destination: LocationDto,
    #[serde(default)]
    pub operating_days: Vec<u8>,
    #[serde(default)]
    pub version: i64,
}

/// Body of `POST /transportations` and `PUT /transportations/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportationRequest {
    #[serde(rename = "type")]
    pub transport_type: String,
    pub origin_id: i64,
    pub destination_id: i64,
    pub operating_days: Vec<u8>,
    /// Only sent on update.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<i64>,
}

/// One leg of a route returned by `/routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStepDto {
    pub transportation_id: i64,
    #[serde(rename = "type")]
    pub transport_type: String,
    pub origin: LocationDto,
    pub destination: LocationDto,
    #[serde(default)]
    pub operating_days: Vec<u8>,
}

/// A route returned by `/routes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDto {
    pub steps: Vec<RouteStepDto>,
}

/// Error body the backend sends with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "error")]
    pub message: String,
}
