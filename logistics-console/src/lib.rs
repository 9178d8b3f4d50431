//! Logistics console server.
//!
//! A web console for a cargo-logistics REST API: manage locations and
//! transportation legs, and look up routes between two locations.

pub mod api;
pub mod cache;
pub mod domain;
pub mod finder;
pub mod listing;
pub mod web;
