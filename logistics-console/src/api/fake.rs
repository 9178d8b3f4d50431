//! In-process stand-in for the logistics backend, for tests.
//!
//! Serves the same endpoints as the real API from in-memory data on a
//! random local port.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::types::{
    LocationDto, LocationRequest, RouteDto, RouteStepDto, TransportationDto,
    TransportationRequest,
};

/// Handle to a running fake backend.
pub(crate) struct FakeBackend {
    pub base_url: String,
    pub state: Arc<FakeState>,
}

#[derive(Default)]
pub(crate) struct FakeState {
    locations: Mutex<Vec<LocationDto>>,
    transportations: Mutex<Vec<TransportationDto>>,
    next_id: AtomicI64,
    /// Number of requests served, per endpoint family.
    pub location_list_calls: AtomicUsize,
    pub route_calls: AtomicUsize,
}

fn location(id: i64, code: Option<&str>, name: &str, city: &str, country: &str) -> LocationDto {
    LocationDto {
        id,
        location_code: code.map(String::from),
        name: name.to_string(),
        city: city.to_string(),
        country: country.to_string(),
    }
}

impl FakeState {
    fn seeded() -> Self {
        let ist = location(1, Some("IST"), "Istanbul Airport", "Istanbul", "Turkey");
        let jfk = location(2, Some("JFK"), "John F. Kennedy", "New York", "USA");
        let dxb = location(3, Some("DXB"), "Dubai International", "Dubai", "UAE");
        let taksim = location(4, None, "Taksim Square", "Istanbul", "Turkey");

        let leg = |id, ty: &str, origin: &LocationDto, destination: &LocationDto, days: &[u8]| {
            TransportationDto {
                id,
                transport_type: ty.to_string(),
                origin: origin.clone(),
                destination: destination.clone(),
                operating_days: days.to_vec(),
                version: 0,
            }
        };

        let transportations = vec![
            leg(1, "FLIGHT", &ist, &jfk, &[1, 2, 3, 4, 5, 6, 7]),
            leg(2, "FLIGHT", &ist, &dxb, &[1, 3, 5]),
            leg(3, "FLIGHT", &dxb, &jfk, &[2, 4]),
        ];

        Self {
            locations: Mutex::new(vec![ist, jfk, dxb, taksim]),
            transportations: Mutex::new(transportations),
            next_id: AtomicI64::new(100),
            ..Default::default()
        }
    }

    /// Store a location as-is, bypassing request validation.
    pub fn insert_raw_location(&self, id: i64, code: &str, name: &str) {
        self.locations
            .lock()
            .unwrap()
            .push(location(id, Some(code), name, "Istanbul", "Turkey"));
    }

    fn find_location(&self, id: i64) -> Option<LocationDto> {
        self.locations
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }
}

/// Start a seeded fake backend.
pub(crate) async fn spawn() -> FakeBackend {
    let state = Arc::new(FakeState::seeded());

    let app = Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route(
            "/locations/:id",
            get(get_location).put(update_location).delete(delete_location),
        )
        .route(
            "/transportations",
            get(list_transportations).post(create_transportation),
        )
        .route("/transportations/types", get(transportation_types))
        .route(
            "/transportations/:id",
            get(get_transportation)
                .put(update_transportation)
                .delete(delete_transportation),
        )
        .route("/routes", get(find_routes))
        .with_state(state.clone());

    let base_url = serve(app).await;
    FakeBackend { base_url, state }
}

/// Serve an arbitrary router on a random local port, returning its base URL.
pub(crate) async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn list_locations(State(state): State<Arc<FakeState>>) -> Json<Vec<LocationDto>> {
    state.location_list_calls.fetch_add(1, Ordering::SeqCst);
    Json(state.locations.lock().unwrap().clone())
}

async fn get_location(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> Response {
    match state.find_location(id) {
        Some(loc) => Json(loc).into_response(),
        None => error(StatusCode::NOT_FOUND, "location not found"),
    }
}

fn location_from_request(id: i64, req: LocationRequest) -> Result<LocationDto, Response> {
    if !req.code.is_empty() && req.code.len() != 3 {
        return Err(error(StatusCode::BAD_REQUEST, "code must be 3 letters"));
    }
    let code = (!req.code.is_empty()).then_some(req.code);
    Ok(LocationDto {
        id,
        location_code: code,
        name: req.name,
        city: req.city,
        country: req.country,
    })
}

async fn create_location(
    State(state): State<Arc<FakeState>>,
    Json(req): Json<LocationRequest>,
) -> Response {
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    match location_from_request(id, req) {
        Ok(loc) => {
            state.locations.lock().unwrap().push(loc.clone());
            (StatusCode::CREATED, Json(loc)).into_response()
        }
        Err(resp) => resp,
    }
}

async fn update_location(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
    Json(req): Json<LocationRequest>,
) -> Response {
    let updated = match location_from_request(id, req) {
        Ok(loc) => loc,
        Err(resp) => return resp,
    };
    let mut locations = state.locations.lock().unwrap();
    match locations.iter_mut().find(|l| l.id == id) {
        Some(slot) => {
            *slot = updated.clone();
            Json(updated).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "location not found"),
    }
}

async fn delete_location(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> Response {
    let mut locations = state.locations.lock().unwrap();
    let before = locations.len();
    locations.retain(|l| l.id != id);
    if locations.len() == before {
        return error(StatusCode::NOT_FOUND, "location not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_transportations(
    State(state): State<Arc<FakeState>>,
) -> Json<Vec<TransportationDto>> {
    Json(state.transportations.lock().unwrap().clone())
}

async fn get_transportation(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
) -> Response {
    let legs = state.transportations.lock().unwrap();
    match legs.iter().find(|t| t.id == id) {
        Some(t) => Json(t.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "transportation not found"),
    }
}

async fn transportation_types() -> Json<Vec<&'static str>> {
    Json(vec!["FLIGHT", "BUS", "UBER", "SUBWAY"])
}

fn resolve_ends(
    state: &FakeState,
    req: &TransportationRequest,
) -> Result<(LocationDto, LocationDto), Response> {
    let origin = state
        .find_location(req.origin_id)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "unknown origin"))?;
    let destination = state
        .find_location(req.destination_id)
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "unknown destination"))?;
    Ok((origin, destination))
}

async fn create_transportation(
    State(state): State<Arc<FakeState>>,
    Json(req): Json<TransportationRequest>,
) -> Response {
    let (origin, destination) = match resolve_ends(&state, &req) {
        Ok(ends) => ends,
        Err(resp) => return resp,
    };
    let leg = TransportationDto {
        id: state.next_id.fetch_add(1, Ordering::SeqCst),
        transport_type: req.transport_type,
        origin,
        destination,
        operating_days: req.operating_days,
        version: 0,
    };
    state.transportations.lock().unwrap().push(leg.clone());
    (StatusCode::CREATED, Json(leg)).into_response()
}

async fn update_transportation(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
    Json(req): Json<TransportationRequest>,
) -> Response {
    let (origin, destination) = match resolve_ends(&state, &req) {
        Ok(ends) => ends,
        Err(resp) => return resp,
    };
    let mut legs = state.transportations.lock().unwrap();
    let Some(slot) = legs.iter_mut().find(|t| t.id == id) else {
        return error(StatusCode::NOT_FOUND, "transportation not found");
    };
    if req.version != Some(slot.version) {
        return error(StatusCode::CONFLICT, "stale version");
    }
    slot.transport_type = req.transport_type;
    slot.origin = origin;
    slot.destination = destination;
    slot.operating_days = req.operating_days;
    slot.version += 1;
    Json(slot.clone()).into_response()
}

async fn delete_transportation(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
) -> Response {
    let mut legs = state.transportations.lock().unwrap();
    let before = legs.len();
    legs.retain(|t| t.id != id);
    if legs.len() == before {
        return error(StatusCode::NOT_FOUND, "transportation not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteParams {
    origin_id: i64,
    destination_id: i64,
}

fn step(leg: &TransportationDto) -> RouteStepDto {
    RouteStepDto {
        transportation_id: leg.id,
        transport_type: leg.transport_type.clone(),
        origin: leg.origin.clone(),
        destination: leg.destination.clone(),
        operating_days: leg.operating_days.clone(),
    }
}

/// Direct legs first, then two-leg connections.
async fn find_routes(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<RouteParams>,
) -> Json<Vec<RouteDto>> {
    state.route_calls.fetch_add(1, Ordering::SeqCst);
    let legs = state.transportations.lock().unwrap();

    let mut routes: Vec<RouteDto> = legs
        .iter()
        .filter(|t| t.origin.id == params.origin_id && t.destination.id == params.destination_id)
        .map(|t| RouteDto {
            steps: vec![step(t)],
        })
        .collect();

    for first in legs.iter().filter(|t| t.origin.id == params.origin_id) {
        for second in legs.iter().filter(|t| {
            t.origin.id == first.destination.id && t.destination.id == params.destination_id
        }) {
            routes.push(RouteDto {
                steps: vec![step(first), step(second)],
            });
        }
    }

    Json(routes)
}
