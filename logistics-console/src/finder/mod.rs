//! Route finder support.
//!
//! The backend computes routes; this module covers what happens on our
//! side of the call: narrowing the location pickers, validating the
//! (origin, destination) pair before any request is made, and holding the
//! results for display.

mod matcher;
mod query;

pub use matcher::match_locations;
pub use query::{RouteQuery, RouteSearchResult, SearchError};
