//! Route search requests and results.

use chrono::NaiveDate;

use crate::domain::{LocationId, Route, RouteSummary};

/// Error from building a route search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Origin or destination has not been picked yet
    #[error("please select both an origin and a destination")]
    MissingSelection,

    /// Origin and destination are the same location
    #[error("origin and destination must be different locations")]
    SameOriginAndDestination,
}

/// A validated (origin, destination) route search.
///
/// The only way to obtain one is [`RouteQuery::new`], so code holding a
/// `RouteQuery` never sees identical endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteQuery {
    origin: LocationId,
    destination: LocationId,
    date: Option<NaiveDate>,
}

impl RouteQuery {
    /// Validate the user's picks.
    pub fn new(
        origin: Option<LocationId>,
        destination: Option<LocationId>,
        date: Option<NaiveDate>,
    ) -> Result<Self, SearchError> {
        let (Some(origin), Some(destination)) = (origin, destination) else {
            return Err(SearchError::MissingSelection);
        };

        if origin == destination {
            return Err(SearchError::SameOriginAndDestination);
        }

        Ok(Self {
            origin,
            destination,
            date,
        })
    }

    pub fn origin(&self) -> LocationId {
        self.origin
    }

    pub fn destination(&self) -> LocationId {
        self.destination
    }

    /// Travel date, if the search is restricted to one day.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Routes found for a query, in the order the backend returned them.
#[derive(Debug, Clone)]
pub struct RouteSearchResult {
    pub query: RouteQuery,
    pub routes: Vec<Route>,
}

impl RouteSearchResult {
    pub fn new(query: RouteQuery, routes: Vec<Route>) -> Self {
        Self { query, routes }
    }

    /// Keep only single-leg routes.
    pub fn direct_only(mut self) -> Self {
        self.routes.retain(|r| r.steps().len() == 1);
        self
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.routes.iter().map(Route::summary).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Location, LocationCode, OperatingDays, RouteStep, TransportType, TransportationId,
    };

    fn location(id: i64, code: &str) -> Location {
        Location {
            id: LocationId(id),
            code: LocationCode::parse(code).ok(),
            name: code.to_string(),
            city: code.to_string(),
            country: "Test".to_string(),
        }
    }

    fn route(legs: &[(i64, &str, i64, &str)]) -> Route {
        let steps = legs
            .iter()
            .enumerate()
            .map(|(i, (o, oc, d, dc))| RouteStep {
                transportation_id: TransportationId(i as i64),
                transport_type: TransportType::Flight,
                origin: location(*o, oc),
                destination: location(*d, dc),
                operating_days: OperatingDays::default(),
            })
            .collect();
        Route::new(steps).unwrap()
    }

    #[test]
    fn same_origin_and_destination_rejected() {
        let err = RouteQuery::new(Some(LocationId(7)), Some(LocationId(7)), None).unwrap_err();
        assert_eq!(err, SearchError::SameOriginAndDestination);
        assert_eq!(
            err.to_string(),
            "origin and destination must be different locations"
        );
    }

    #[test]
    fn missing_selection_rejected() {
        assert_eq!(
            RouteQuery::new(None, Some(LocationId(1)), None),
            Err(SearchError::MissingSelection)
        );
        assert_eq!(
            RouteQuery::new(Some(LocationId(1)), None, None),
            Err(SearchError::MissingSelection)
        );
    }

    #[test]
    fn valid_query_keeps_fields() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19);
        let query = RouteQuery::new(Some(LocationId(1)), Some(LocationId(2)), date).unwrap();
        assert_eq!(query.origin(), LocationId(1));
        assert_eq!(query.destination(), LocationId(2));
        assert_eq!(query.date(), date);
    }

    #[test]
    fn direct_only_filters_multi_leg_routes() {
        let query = RouteQuery::new(Some(LocationId(1)), Some(LocationId(2)), None).unwrap();
        let result = RouteSearchResult::new(
            query,
            vec![
                route(&[(1, "IST", 3, "DXB"), (3, "DXB", 2, "JFK")]),
                route(&[(1, "IST", 2, "JFK")]),
            ],
        );

        let summaries = result.summaries();
        assert_eq!(summaries.len(), 2);
        assert!(!summaries[0].is_direct);

        let direct = result.direct_only();
        assert_eq!(direct.routes.len(), 1);
        assert!(direct.summaries()[0].is_direct);
    }
}
