//! Routes and route summaries.
//!
//! A `Route` is an ordered chain of legs returned by the backend for an
//! (origin, destination) query. Routes are read-only here: they are
//! summarized and displayed, never stored.

use super::{DomainError, Location, OperatingDays, TransportType, TransportationId};

/// One leg of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStep {
    pub transportation_id: TransportationId,
    pub transport_type: TransportType,
    pub origin: Location,
    pub destination: Location,
    pub operating_days: OperatingDays,
}

/// Presentation-ready aggregates over a route's legs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    /// Origin of the first leg
    pub origin: Location,
    /// Destination of the last leg
    pub destination: Location,
    pub total_steps: usize,
    /// Each leg's type, in leg order
    pub transport_types: Vec<TransportType>,
    /// True iff the route has exactly one leg
    pub is_direct: bool,
}

impl RouteSummary {
    /// Transport types with duplicates removed, first occurrence first.
    pub fn distinct_types(&self) -> Vec<TransportType> {
        let mut distinct: Vec<TransportType> = Vec::with_capacity(self.transport_types.len());
        for ty in &self.transport_types {
            if !distinct.contains(ty) {
                distinct.push(ty.clone());
            }
        }
        distinct
    }

    /// Number of intermediate stops.
    pub fn transfers(&self) -> usize {
        self.total_steps.saturating_sub(1)
    }
}

/// Summarize an ordered list of legs.
///
/// Consecutive legs are not checked for contiguity; the backend is trusted
/// to return chained routes. See [`Route::is_contiguous`].
///
/// # Errors
///
/// Returns [`DomainError::EmptyRoute`] if `steps` is empty.
pub fn summarize(steps: &[RouteStep]) -> Result<RouteSummary, DomainError> {
    let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
        return Err(DomainError::EmptyRoute);
    };
    Ok(summary_of(first, last, steps))
}

fn summary_of(first: &RouteStep, last: &RouteStep, steps: &[RouteStep]) -> RouteSummary {
    RouteSummary {
        origin: first.origin.clone(),
        destination: last.destination.clone(),
        total_steps: steps.len(),
        transport_types: steps.iter().map(|s| s.transport_type.clone()).collect(),
        is_direct: steps.len() == 1,
    }
}

/// A non-empty, ordered chain of legs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    steps: Vec<RouteStep>,
}

impl Route {
    /// Constructs a route.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyRoute`] if `steps` is empty.
    pub fn new(steps: Vec<RouteStep>) -> Result<Self, DomainError> {
        if steps.is_empty() {
            return Err(DomainError::EmptyRoute);
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    pub fn summary(&self) -> RouteSummary {
        // Non-empty by construction
        let first = &self.steps[0];
        let last = &self.steps[self.steps.len() - 1];
        summary_of(first, last, &self.steps)
    }

    /// Every stop on the route: the origin, then each leg's destination.
    pub fn stops(&self) -> Vec<&Location> {
        std::iter::once(&self.steps[0].origin)
            .chain(self.steps.iter().map(|s| &s.destination))
            .collect()
    }

    /// Whether each leg starts where the previous one ended.
    pub fn is_contiguous(&self) -> bool {
        self.steps
            .windows(2)
            .all(|pair| pair[0].destination.id == pair[1].origin.id)
    }
}
