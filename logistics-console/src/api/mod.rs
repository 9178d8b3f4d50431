//! Logistics backend REST client.
//!
//! The backend owns all persistence: locations, transportation legs and
//! route computation. This module is a typed client for it.
//!
//! Every list endpoint returns a bare JSON array. The client decodes
//! exactly that shape; a wrapped or otherwise unexpected body is reported
//! as [`ApiError::Json`] rather than guessed at.

mod client;
mod convert;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod types;

pub use client::{ApiClient, ApiConfig, DEFAULT_BASE_URL};
pub use convert::ConversionError;
pub use error::ApiError;
pub use types::{
    LocationDto, LocationRequest, RouteDto, RouteStepDto, TransportationDto,
    TransportationRequest,
};
