//! Transportation legs.

use std::fmt;

use super::error::{FieldError, ValidationErrors};
use super::{Location, LocationId, OperatingDays, TransportType};

/// Identifier assigned to a transportation by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransportationId(pub i64);

impl fmt::Display for TransportationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single point-to-point leg: one mode, one origin, one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transportation {
    pub id: TransportationId,
    pub transport_type: TransportType,
    pub origin: Location,
    pub destination: Location,
    pub operating_days: OperatingDays,
    /// Optimistic-concurrency counter. Sent back unchanged on update.
    pub version: i64,
}

/// A validated create/update payload for a transportation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportationDraft {
    pub transport_type: TransportType,
    pub origin: LocationId,
    pub destination: LocationId,
    /// Canonical (ascending, deduplicated) weekday numbers, never empty.
    pub operating_days: Vec<u8>,
}

impl TransportationDraft {
    /// Apply the transportation form rules.
    ///
    /// `known_types` is the list served by the backend. An empty day set
    /// means "All Days" and is expanded to all seven weekdays.
    pub fn validate(
        transport_type: &str,
        origin: Option<LocationId>,
        destination: Option<LocationId>,
        operating_days: &OperatingDays,
        known_types: &[TransportType],
    ) -> Result<Self, ValidationErrors> {
        let mut errors = Vec::new();

        let transport_type = TransportType::parse(transport_type.trim());
        if !known_types.contains(&transport_type) {
            errors.push(FieldError::new("type", "Transportation type is required"));
        }

        if origin.is_none() {
            errors.push(FieldError::new("origin", "Origin is required"));
        }
        if destination.is_none() {
            errors.push(FieldError::new("destination", "Destination is required"));
        }
        if origin.is_some() && origin == destination {
            errors.push(FieldError::new(
                "destination",
                "Origin and destination must be different",
            ));
        }

        let (Some(origin), Some(destination), true) = (origin, destination, errors.is_empty())
        else {
            return Err(ValidationErrors::new(errors));
        };

        let operating_days = if operating_days.is_every_day() {
            OperatingDays::every_day().canonical()
        } else {
            operating_days.canonical()
        };

        Ok(Self {
            transport_type,
            origin,
            destination,
            operating_days,
        })
    }
}
