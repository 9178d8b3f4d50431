//! Sorting for the transportation table.
//!
//! The table header links carry `sort` and `dir` query parameters; clicking
//! the active column flips its direction, clicking another column sorts it
//! ascending.

use std::cmp::Ordering;

use crate::domain::Transportation;

/// Column the transportation table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Type,
    Origin,
    Destination,
}

impl SortKey {
    /// Parse a query parameter value. Unknown values fall back to `Id`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "type" => SortKey::Type,
            "origin" => SortKey::Origin,
            "destination" => SortKey::Destination,
            _ => SortKey::Id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Type => "type",
            SortKey::Origin => "origin",
            SortKey::Destination => "destination",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse a query parameter value. Anything but `desc` is ascending.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Current sort of the transportation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn parse(key: Option<&str>, direction: Option<&str>) -> Self {
        Self {
            key: key.map(SortKey::parse).unwrap_or_default(),
            direction: direction.map(SortDirection::parse).unwrap_or_default(),
        }
    }

    /// The config a click on `key`'s header should switch to.
    pub fn toggled(&self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.reversed(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Ascending,
            }
        }
    }

    /// Query string for this config, e.g. `sort=type&dir=desc`.
    pub fn query(&self) -> String {
        format!("sort={}&dir={}", self.key.as_str(), self.direction.as_str())
    }
}

/// Sort transportations in place. The sort is stable; ties keep their
/// original relative order in both directions.
pub fn sort_transportations(items: &mut [Transportation], config: SortConfig) {
    items.sort_by(|a, b| {
        let ordering = compare(a, b, config.key);
        match config.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &Transportation, b: &Transportation, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Type => a.transport_type.as_str().cmp(b.transport_type.as_str()),
        SortKey::Origin => a
            .origin
            .name
            .to_lowercase()
            .cmp(&b.origin.name.to_lowercase()),
        SortKey::Destination => a
            .destination
            .name
            .to_lowercase()
            .cmp(&b.destination.name.to_lowercase()),
    }
}
