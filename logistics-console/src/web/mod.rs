//! Web layer for the logistics console.
//!
//! Server-rendered pages for locations, transportations and the route
//! finder, plus a small JSON API for location search and route summaries.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
