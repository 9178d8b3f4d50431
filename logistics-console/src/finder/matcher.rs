//! Location matching for the origin/destination pickers and the location
//! table search box.

use crate::domain::Location;

/// Filter locations whose name, code or city contains `query`.
///
/// Matching is a case-insensitive substring test, OR-ed across the three
/// fields. An empty or whitespace-only query matches everything. The
/// result preserves input order; there is no relevance ranking.
///
/// # Examples
///
/// ```
/// use logistics_console::domain::{Location, LocationCode, LocationId};
/// use logistics_console::finder::match_locations;
///
/// let locations = vec![
///     Location {
///         id: LocationId(1),
///         code: LocationCode::parse("IST").ok(),
///         name: "Istanbul Airport".into(),
///         city: "Istanbul".into(),
///         country: "Turkey".into(),
///     },
///     Location {
///         id: LocationId(2),
///         code: LocationCode::parse("CDG").ok(),
///         name: "Paris".into(),
///         city: "Paris".into(),
///         country: "France".into(),
///     },
/// ];
///
/// let found = match_locations("ist", &locations);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].id, LocationId(1));
/// ```
pub fn match_locations<'a>(query: &str, locations: &'a [Location]) -> Vec<&'a Location> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return locations.iter().collect();
    }

    locations
        .iter()
        .filter(|loc| matches_location(&needle, loc))
        .collect()
}

/// Whether a lowercased, non-empty needle occurs in any searchable field.
fn matches_location(needle: &str, location: &Location) -> bool {
    [location.name.as_str(), location.code_str(), location.city.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
