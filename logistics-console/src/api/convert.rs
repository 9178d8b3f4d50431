//! Conversion from API wire types to domain types.

use tracing::warn;

use crate::domain::{
    DomainError, Location, LocationCode, LocationDraft, LocationId, OperatingDays, Route,
    RouteStep, Transportation, TransportationDraft, TransportationId, TransportType,
};

use super::types::{
    LocationDto, LocationRequest, RouteDto, RouteStepDto, TransportationDto,
    TransportationRequest,
};

/// Error converting a backend record into a domain value.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    #[error("location {id}: {source}")]
    Location { id: i64, source: DomainError },

    #[error("transportation {id}: {source}")]
    Transportation {
        id: i64,
        source: Box<ConversionError>,
    },

    #[error("route {index}: {source}")]
    Route { index: usize, source: DomainError },
}

pub fn convert_location(dto: &LocationDto) -> Result<Location, ConversionError> {
    // The backend stores codes as typed, so normalize on the way in
    let code = match dto.location_code.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            LocationCode::parse_normalized(raw).map_err(|e| ConversionError::Location {
                id: dto.id,
                source: e.into(),
            })?,
        ),
    };

    Ok(Location {
        id: LocationId(dto.id),
        code,
        name: dto.name.clone(),
        city: dto.city.clone(),
        country: dto.country.clone(),
    })
}

/// Convert a location list, skipping records that fail to convert.
pub fn convert_locations(dtos: &[LocationDto]) -> Vec<Location> {
    keep_valid(dtos.iter().map(convert_location))
}

pub fn convert_transportation(dto: &TransportationDto) -> Result<Transportation, ConversionError> {
    Ok(Transportation {
        id: TransportationId(dto.id),
        transport_type: TransportType::parse(&dto.transport_type),
        origin: convert_location(&dto.origin)?,
        destination: convert_location(&dto.destination)?,
        operating_days: OperatingDays::new(dto.operating_days.clone()),
        version: dto.version,
    })
}

pub fn convert_transportations(dtos: &[TransportationDto]) -> Vec<Transportation> {
    keep_valid(dtos.iter().map(|dto| {
        convert_transportation(dto).map_err(|e| ConversionError::Transportation {
            id: dto.id,
            source: Box::new(e),
        })
    }))
}

fn convert_step(dto: &RouteStepDto) -> Result<RouteStep, ConversionError> {
    Ok(RouteStep {
        transportation_id: TransportationId(dto.transportation_id),
        transport_type: TransportType::parse(&dto.transport_type),
        origin: convert_location(&dto.origin)?,
        destination: convert_location(&dto.destination)?,
        operating_days: OperatingDays::new(dto.operating_days.clone()),
    })
}

fn convert_route(index: usize, dto: &RouteDto) -> Result<Route, ConversionError> {
    let steps = dto
        .steps
        .iter()
        .map(convert_step)
        .collect::<Result<Vec<_>, _>>()?;
    Route::new(steps).map_err(|source| ConversionError::Route { index, source })
}

/// Convert the `/routes` response. Routes with no steps or a bad leg are
/// skipped.
pub fn convert_routes(dtos: &[RouteDto]) -> Vec<Route> {
    keep_valid(
        dtos.iter()
            .enumerate()
            .map(|(index, dto)| convert_route(index, dto)),
    )
}

/// Collect the records that converted, logging and dropping the rest so one
/// bad record does not hide the whole list.
fn keep_valid<T>(results: impl Iterator<Item = Result<T, ConversionError>>) -> Vec<T> {
    results
        .filter_map(|result| match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("skipping backend record: {e}");
                None
            }
        })
        .collect()
}

pub fn location_request(draft: &LocationDraft) -> LocationRequest {
    LocationRequest {
        code: draft
            .code
            .map(|c| c.as_str().to_string())
            .unwrap_or_default(),
        name: draft.name.clone(),
        city: draft.city.clone(),
        country: draft.country.clone(),
    }
}

pub fn transportation_request(
    draft: &TransportationDraft,
    version: Option<i64>,
) -> TransportationRequest {
    TransportationRequest {
        transport_type: draft.transport_type.as_str().to_string(),
        origin_id: draft.origin.0,
        destination_id: draft.destination.0,
        operating_days: draft.operating_days.clone(),
        version,
    }
}
