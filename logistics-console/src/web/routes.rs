//! HTTP route handlers.

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::api::ApiError;
use crate::domain::{
    LocationDraft, LocationId, OperatingDays, TransportationDraft, TransportationId,
    ValidationErrors, decode_days, summarize,
};
use crate::finder::{RouteQuery, RouteSearchResult, SearchError, match_locations};
use crate::listing::{SortConfig, sort_transportations};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(locations_page))
        .route("/health", get(health))
        .route("/locations", get(locations_page).post(create_location))
        .route("/locations/:id/edit", get(edit_location_page))
        .route("/locations/:id", post(update_location))
        .route("/locations/:id/delete", post(delete_location))
        .route(
            "/transportations",
            get(transportations_page).post(create_transportation),
        )
        .route("/transportations/:id/edit", get(edit_transportation_page))
        .route("/transportations/:id", post(update_transportation))
        .route("/transportations/:id/delete", post(delete_transportation))
        .route("/routes", get(routes_page))
        .route("/api/locations/search", get(search_locations))
        .route("/api/routes", get(search_routes))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn redirect_with_notice(path: &str, notice: Notice) -> Response {
    Redirect::to(&format!("{path}?notice={}", notice.code())).into_response()
}

fn parse_notice(code: Option<&str>) -> Option<Notice> {
    code.and_then(Notice::from_code)
}

// ============================================================================
// Locations
// ============================================================================

async fn locations_listing(
    state: &AppState,
    query: String,
    notice: Option<Notice>,
    form: LocationFormView,
    errors: FormErrors,
) -> Result<LocationsTemplate, AppError> {
    let all = state.api.locations().await?;
    let locations = match_locations(&query, &all)
        .into_iter()
        .map(LocationView::from_location)
        .collect();

    Ok(LocationsTemplate {
        notice,
        query,
        locations,
        total: all.len(),
        form,
        errors,
    })
}

/// Location table, filtered by `q`.
async fn locations_page(
    State(state): State<AppState>,
    Query(req): Query<LocationListQuery>,
) -> Result<Response, HtmlError> {
    let template = locations_listing(
        &state,
        req.q.unwrap_or_default(),
        parse_notice(req.notice.as_deref()),
        LocationFormView::default(),
        FormErrors::default(),
    )
    .await?;

    Ok(template.into_response())
}

fn location_form_view(form: &LocationForm) -> LocationFormView {
    LocationFormView {
        code: form.code.clone(),
        name: form.name.clone(),
        city: form.city.clone(),
        country: form.country.clone(),
    }
}

async fn create_location(
    State(state): State<AppState>,
    Form(form): Form<LocationForm>,
) -> Result<Response, HtmlError> {
    let draft = match LocationDraft::validate(&form.code, &form.name, &form.city, &form.country)
    {
        Ok(draft) => draft,
        Err(errors) => {
            warn!(%errors, "location form rejected");
            let template = locations_listing(
                &state,
                String::new(),
                None,
                location_form_view(&form),
                FormErrors::from(&errors),
            )
            .await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let notice = match state.api.create_location(&draft).await {
        Ok(location) => {
            info!(id = %location.id, name = %location.name, "location created");
            Notice::LocationCreated
        }
        Err(e) => {
            warn!(error = %e, "location create failed");
            Notice::LocationCreateFailed
        }
    };

    Ok(redirect_with_notice("/locations", notice))
}

async fn edit_location_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, HtmlError> {
    let location = state.api.get_location(LocationId(id)).await?;

    Ok(LocationEditTemplate {
        location_id: id,
        form: LocationFormView::from_location(&location),
        errors: FormErrors::default(),
    }
    .into_response())
}

async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<LocationForm>,
) -> Result<Response, HtmlError> {
    let draft = match LocationDraft::validate(&form.code, &form.name, &form.city, &form.country)
    {
        Ok(draft) => draft,
        Err(errors) => {
            warn!(%id, %errors, "location form rejected");
            let template = LocationEditTemplate {
                location_id: id,
                form: location_form_view(&form),
                errors: FormErrors::from(&errors),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let notice = match state.api.update_location(LocationId(id), &draft).await {
        Ok(_) => {
            info!(%id, "location updated");
            Notice::LocationUpdated
        }
        Err(e) => {
            warn!(%id, error = %e, "location update failed");
            Notice::LocationUpdateFailed
        }
    };

    Ok(redirect_with_notice("/locations", notice))
}

async fn delete_location(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let notice = match state.api.delete_location(LocationId(id)).await {
        Ok(()) => {
            info!(%id, "location deleted");
            Notice::LocationDeleted
        }
        Err(e) => {
            warn!(%id, error = %e, "location delete failed");
            Notice::LocationDeleteFailed
        }
    };

    redirect_with_notice("/locations", notice)
}

// ============================================================================
// Transportations
// ============================================================================

/// Decode the free-text day list. Unrecognized names are dropped, but
/// logged so a typo does not silently widen a schedule unnoticed.
fn form_days(raw: &str) -> OperatingDays {
    let decoded = decode_days(raw);
    if !decoded.unmatched.is_empty() {
        warn!(unmatched = ?decoded.unmatched, "ignoring unrecognized day names");
    }
    OperatingDays::new(decoded.days)
}

/// Text to pre-fill the day field with. Every-day legs get an empty field,
/// which the form reads back as every day.
fn days_field(days: &OperatingDays) -> String {
    if days.is_every_day() {
        String::new()
    } else {
        days.display()
    }
}

async fn transportations_listing(
    state: &AppState,
    sort: SortConfig,
    notice: Option<Notice>,
    form: Option<&TransportationForm>,
    errors: FormErrors,
) -> Result<TransportationsTemplate, AppError> {
    let (legs, locations, types) = futures::try_join!(
        state.api.transportations(),
        state.api.locations(),
        state.api.transportation_types(),
    )?;

    let mut legs = legs.as_ref().clone();
    sort_transportations(&mut legs, sort);

    let form = match form {
        Some(f) => TransportationFormView::new(
            &types,
            &locations,
            &f.transport_type,
            parse_location_id(&f.origin_id).map(|id| id.0),
            parse_location_id(&f.destination_id).map(|id| id.0),
            f.operating_days.clone(),
        ),
        None => TransportationFormView::new(&types, &locations, "", None, None, String::new()),
    };

    Ok(TransportationsTemplate {
        notice,
        headers: sort_headers(sort),
        transportations: legs
            .iter()
            .map(TransportationView::from_transportation)
            .collect(),
        form,
        errors,
    })
}

/// Transportation table, sorted by `sort`/`dir`.
async fn transportations_page(
    State(state): State<AppState>,
    Query(req): Query<TransportationListQuery>,
) -> Result<Response, HtmlError> {
    let sort = SortConfig::parse(req.sort.as_deref(), req.dir.as_deref());
    let template = transportations_listing(
        &state,
        sort,
        parse_notice(req.notice.as_deref()),
        None,
        FormErrors::default(),
    )
    .await?;

    Ok(template.into_response())
}

async fn validate_transportation_form(
    state: &AppState,
    form: &TransportationForm,
) -> Result<Result<TransportationDraft, ValidationErrors>, AppError> {
    let types = state.api.transportation_types().await?;
    Ok(TransportationDraft::validate(
        &form.transport_type,
        parse_location_id(&form.origin_id),
        parse_location_id(&form.destination_id),
        &form_days(&form.operating_days),
        &types,
    ))
}

async fn create_transportation(
    State(state): State<AppState>,
    Form(form): Form<TransportationForm>,
) -> Result<Response, HtmlError> {
    let draft = match validate_transportation_form(&state, &form).await? {
        Ok(draft) => draft,
        Err(errors) => {
            warn!(%errors, "transportation form rejected");
            let template = transportations_listing(
                &state,
                SortConfig::default(),
                None,
                Some(&form),
                FormErrors::from(&errors),
            )
            .await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let notice = match state.api.create_transportation(&draft).await {
        Ok(leg) => {
            info!(id = %leg.id, kind = %leg.transport_type, "transportation created");
            Notice::TransportationCreated
        }
        Err(e) => {
            warn!(error = %e, "transportation create failed");
            Notice::TransportationCreateFailed
        }
    };

    Ok(redirect_with_notice("/transportations", notice))
}

async fn edit_transportation_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, HtmlError> {
    let (leg, locations, types) = futures::try_join!(
        state.api.get_transportation(TransportationId(id)),
        state.api.locations(),
        state.api.transportation_types(),
    )?;

    let form = TransportationFormView::new(
        &types,
        &locations,
        leg.transport_type.as_str(),
        Some(leg.origin.id.0),
        Some(leg.destination.id.0),
        days_field(&leg.operating_days),
    );

    Ok(TransportationEditTemplate {
        transportation_id: id,
        version: leg.version,
        form,
        errors: FormErrors::default(),
    }
    .into_response())
}

async fn update_transportation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<TransportationForm>,
) -> Result<Response, HtmlError> {
    let version = form.version.ok_or_else(|| AppError::BadRequest {
        message: "missing version".to_string(),
    })?;

    let draft = match validate_transportation_form(&state, &form).await? {
        Ok(draft) => draft,
        Err(errors) => {
            warn!(%id, %errors, "transportation form rejected");
            let (locations, types) = futures::try_join!(
                state.api.locations(),
                state.api.transportation_types(),
            )?;
            let template = TransportationEditTemplate {
                transportation_id: id,
                version,
                form: TransportationFormView::new(
                    &types,
                    &locations,
                    &form.transport_type,
                    parse_location_id(&form.origin_id).map(|id| id.0),
                    parse_location_id(&form.destination_id).map(|id| id.0),
                    form.operating_days.clone(),
                ),
                errors: FormErrors::from(&errors),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let notice = match state
        .api
        .update_transportation(TransportationId(id), &draft, version)
        .await
    {
        Ok(leg) => {
            info!(%id, version = leg.version, "transportation updated");
            Notice::TransportationUpdated
        }
        Err(ApiError::Conflict { message }) => {
            warn!(%id, version, %message, "transportation update conflict");
            Notice::TransportationConflict
        }
        Err(e) => {
            warn!(%id, error = %e, "transportation update failed");
            Notice::TransportationUpdateFailed
        }
    };

    Ok(redirect_with_notice("/transportations", notice))
}

async fn delete_transportation(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let notice = match state.api.delete_transportation(TransportationId(id)).await {
        Ok(()) => {
            info!(%id, "transportation deleted");
            Notice::TransportationDeleted
        }
        Err(e) => {
            warn!(%id, error = %e, "transportation delete failed");
            Notice::TransportationDeleteFailed
        }
    };

    redirect_with_notice("/transportations", notice)
}

// ============================================================================
// Routes
// ============================================================================

/// Route finder page.
///
/// Each side's pick list is filtered by its own query. Once both sides
/// are picked the backend is asked for routes; picking the same location
/// twice is rejected before any request is made.
async fn routes_page(
    State(state): State<AppState>,
    Query(req): Query<RouteFinderQuery>,
) -> Result<Response, HtmlError> {
    let locations = state.api.locations().await?;

    let origin = parse_location_id(&req.origin_id);
    let destination = parse_location_id(&req.destination_id);
    let date = parse_date(&req.date);
    let direct_only = req.direct_only.is_some();

    // The current pick stays listed even when the filter no longer matches it
    let options = |q: &str, selected: Option<LocationId>| -> Vec<LocationOption> {
        let mut shown = match_locations(q, &locations);
        if let Some(id) = selected {
            if !shown.iter().any(|l| l.id == id) {
                if let Some(picked) = locations.iter().find(|l| l.id == id) {
                    shown.insert(0, picked);
                }
            }
        }
        shown
            .into_iter()
            .map(|l| LocationOption::new(l, selected.map(|id| id.0)))
            .collect()
    };

    let mut template = RoutesTemplate {
        origin_options: options(&req.origin_q, origin),
        destination_options: options(&req.destination_q, destination),
        origin_q: req.origin_q,
        destination_q: req.destination_q,
        date: req.date,
        direct_only,
        error: None,
        routes: None,
    };

    let query = match RouteQuery::new(origin, destination, date) {
        Ok(query) => query,
        Err(SearchError::MissingSelection) => return Ok(template.into_response()),
        Err(e) => {
            warn!(?origin, ?destination, "route search rejected: {e}");
            template.error = Some(e.to_string());
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response());
        }
    };

    let mut result = RouteSearchResult::new(query, state.api.find_routes(&query).await?);
    if direct_only {
        result = result.direct_only();
    }
    info!(
        origin = %query.origin(),
        destination = %query.destination(),
        found = result.routes.len(),
        "route search"
    );

    template.routes = Some(
        result
            .routes
            .iter()
            .enumerate()
            .map(|(i, route)| RouteView::new(i + 1, route, date))
            .collect(),
    );

    Ok(template.into_response())
}

/// Search locations by name, code or city.
async fn search_locations(
    State(state): State<AppState>,
    Query(req): Query<LocationSearchRequest>,
) -> Result<Json<LocationSearchResponse>, AppError> {
    let limit = req.limit.unwrap_or(10).min(50);
    let all = state.api.locations().await?;

    let locations = match_locations(&req.q, &all)
        .into_iter()
        .take(limit)
        .map(LocationResult::from_location)
        .collect();

    Ok(Json(LocationSearchResponse { locations }))
}

/// Route summaries as JSON.
async fn search_routes(
    State(state): State<AppState>,
    Query(req): Query<RouteSearchRequest>,
) -> Result<Json<RouteSearchResponse>, AppError> {
    let query = RouteQuery::new(
        req.origin_id.map(LocationId),
        req.destination_id.map(LocationId),
        req.date,
    )?;

    let mut result = RouteSearchResult::new(query, state.api.find_routes(&query).await?);
    if req.direct_only {
        result = result.direct_only();
    }

    let routes = result
        .routes
        .iter()
        .map(|route| {
            let summary = summarize(route.steps()).map_err(|e| AppError::Internal {
                message: e.to_string(),
            })?;
            Ok(RouteResult::new(&summary, route.steps()))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(Json(RouteSearchResponse { routes }))
}

// ============================================================================
// Errors
// ============================================================================

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Validation(ValidationErrors),
    Search(SearchError),
    NotFound { message: String },
    Conflict { message: String },
    /// The logistics API failed or was unreachable
    Upstream(ApiError),
    Internal { message: String },
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound => AppError::NotFound {
                message: "not found".to_string(),
            },
            ApiError::Conflict { message } => AppError::Conflict { message },
            // The backend rejected what we sent
            ApiError::Api { status, message } if (400..500).contains(&status) => {
                AppError::BadRequest { message }
            }
            other => AppError::Upstream(other),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        AppError::Search(e)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(e)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Search(SearchError::MissingSelection) => StatusCode::BAD_REQUEST,
            AppError::Search(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Upstream(e) if e.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::Conflict { message }
            | AppError::Internal { message } => message.clone(),
            AppError::Validation(e) => e.to_string(),
            AppError::Search(e) => e.to_string(),
            AppError::Upstream(e) => e.to_string(),
        }
    }

    fn log(&self, status: StatusCode) {
        let message = self.message();
        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        self.log(status);

        let fields = match &self {
            AppError::Validation(errors) => errors
                .iter()
                .map(|e| FieldErrorResult {
                    field: e.field.to_string(),
                    message: e.message.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let body = Json(ErrorResponse {
            error: self.message(),
            fields,
        });
        (status, body).into_response()
    }
}

/// An [`AppError`] rendered as the HTML error page.
#[derive(Debug)]
pub struct HtmlError(AppError);

impl From<AppError> for HtmlError {
    fn from(e: AppError) -> Self {
        HtmlError(e)
    }
}

impl From<ApiError> for HtmlError {
    fn from(e: ApiError) -> Self {
        HtmlError(e.into())
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        self.0.log(status);

        let details = match &self.0 {
            AppError::Upstream(_) => {
                Some("The logistics API could not complete the request.".to_string())
            }
            _ => None,
        };

        let template = ErrorTemplate {
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.0.message(),
            details,
        };
        (status, template).into_response()
    }
}
