//! Domain types for the logistics console.
//!
//! This module contains the core domain model: locations, transportation
//! legs, routes, and the operating-day codec. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod days;
mod error;
mod location;
mod route;
mod transport;
mod transportation;

pub use days::{
    ALL_DAYS_LABEL, DecodedDays, OperatingDays, day_abbreviation, day_number, decode_days,
    encode_days,
};
pub use error::{DomainError, FieldError, ValidationErrors};
pub use location::{InvalidLocationCode, Location, LocationCode, LocationDraft, LocationId};
pub use route::{Route, RouteStep, RouteSummary, summarize};
pub use transport::TransportType;
pub use transportation::{Transportation, TransportationDraft, TransportationId};
