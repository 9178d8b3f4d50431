//! Logistics API HTTP client.
//!
//! Provides async methods for the backend's location, transportation and
//! route endpoints. Handles authentication, concurrency limiting, status
//! mapping and conversion to domain types.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{
    Location, LocationDraft, LocationId, Route, Transportation, TransportationDraft,
    TransportationId, TransportType,
};
use crate::finder::RouteQuery;

use super::convert::{
    ConversionError, convert_location, convert_locations, convert_routes,
    convert_transportation, convert_transportations, location_request, transportation_request,
};
use super::error::ApiError;
use super::types::{ErrorBody, LocationDto, RouteDto, TransportationDto};

/// Default base URL for the logistics API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// How much of an unparseable body to keep for error messages.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the logistics API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, without trailing slash (e.g. `http://localhost:8080/api`)
    pub base_url: String,
    /// HTTP Basic credentials, if the backend requires them
    pub credentials: Option<(String, String)>,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Authenticate with HTTP Basic credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Logistics API client.
///
/// Uses a semaphore to limit concurrent requests to the backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if let Some((username, password)) = &config.credentials {
            let token = BASE64.encode(format!("{username}:{password}"));
            let mut value = HeaderValue::from_str(&format!("Basic {token}"))
                .map_err(|_| ApiError::Config("invalid credentials format".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        if config.max_concurrent == 0 {
            return Err(ApiError::Config(
                "max_concurrent must be at least 1".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------

    pub async fn list_locations(&self) -> Result<Vec<Location>, ApiError> {
        let dtos: Vec<LocationDto> = self.fetch(self.http.get(self.url("/locations"))).await?;
        Ok(convert_locations(&dtos))
    }

    pub async fn get_location(&self, id: LocationId) -> Result<Location, ApiError> {
        let dto: LocationDto = self
            .fetch(self.http.get(self.url(&format!("/locations/{id}"))))
            .await?;
        convert_location(&dto).map_err(conversion_error)
    }

    pub async fn create_location(&self, draft: &LocationDraft) -> Result<Location, ApiError> {
        let body = location_request(draft);
        let dto: LocationDto = self
            .fetch(self.http.post(self.url("/locations")).json(&body))
            .await?;
        convert_location(&dto).map_err(conversion_error)
    }

    pub async fn update_location(
        &self,
        id: LocationId,
        draft: &LocationDraft,
    ) -> Result<Location, ApiError> {
        let body = location_request(draft);
        let dto: LocationDto = self
            .fetch(
                self.http
                    .put(self.url(&format!("/locations/{id}")))
                    .json(&body),
            )
            .await?;
        convert_location(&dto).map_err(conversion_error)
    }

    pub async fn delete_location(&self, id: LocationId) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.url(&format!("/locations/{id}"))))
            .await
    }

    // ------------------------------------------------------------------
    // Transportations
    // ------------------------------------------------------------------

    pub async fn list_transportations(&self) -> Result<Vec<Transportation>, ApiError> {
        let dtos: Vec<TransportationDto> = self
            .fetch(self.http.get(self.url("/transportations")))
            .await?;
        Ok(convert_transportations(&dtos))
    }

    pub async fn get_transportation(
        &self,
        id: TransportationId,
    ) -> Result<Transportation, ApiError> {
        let dto: TransportationDto = self
            .fetch(self.http.get(self.url(&format!("/transportations/{id}"))))
            .await?;
        convert_transportation(&dto).map_err(conversion_error)
    }

    /// The transport type names the backend accepts.
    pub async fn transportation_types(&self) -> Result<Vec<TransportType>, ApiError> {
        let names: Vec<String> = self
            .fetch(self.http.get(self.url("/transportations/types")))
            .await?;
        Ok(names.iter().map(|n| TransportType::parse(n)).collect())
    }

    pub async fn create_transportation(
        &self,
        draft: &TransportationDraft,
    ) -> Result<Transportation, ApiError> {
        let body = transportation_request(draft, None);
        let dto: TransportationDto = self
            .fetch(self.http.post(self.url("/transportations")).json(&body))
            .await?;
        convert_transportation(&dto).map_err(conversion_error)
    }

    /// Update a transportation. `version` must be the version the edit was
    /// based on; a stale version yields [`ApiError::Conflict`].
    pub async fn update_transportation(
        &self,
        id: TransportationId,
        draft: &TransportationDraft,
        version: i64,
    ) -> Result<Transportation, ApiError> {
        let body = transportation_request(draft, Some(version));
        let dto: TransportationDto = self
            .fetch(
                self.http
                    .put(self.url(&format!("/transportations/{id}")))
                    .json(&body),
            )
            .await?;
        convert_transportation(&dto).map_err(conversion_error)
    }

    pub async fn delete_transportation(&self, id: TransportationId) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.url(&format!("/transportations/{id}"))))
            .await
    }

    // ------------------------------------------------------------------
    // Routes
    // ------------------------------------------------------------------

    /// Find routes for a validated query.
    pub async fn find_routes(&self, query: &RouteQuery) -> Result<Vec<Route>, ApiError> {
        let mut params = vec![
            ("originId", query.origin().to_string()),
            ("destinationId", query.destination().to_string()),
        ];
        if let Some(date) = query.date() {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }

        let dtos: Vec<RouteDto> = self
            .fetch(self.http.get(self.url("/routes")).query(&params))
            .await?;
        Ok(convert_routes(&dtos))
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    /// Send a request and decode its JSON body as `T`.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;

        serde_json::from_str(&body).map_err(|e| ApiError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }

    /// Send a request whose response body is not needed.
    async fn execute(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ApiError::Config("semaphore closed".to_string()))?;

        let request = request.build()?;
        debug!(method = %request.method(), url = %request.url(), "logistics API request");

        let response = self.http.execute(request).await?;
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ApiError::Unauthorized);
            }
            StatusCode::NOT_FOUND => return Err(ApiError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => return Err(ApiError::RateLimited),
            StatusCode::CONFLICT => {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::Conflict {
                    message: error_message(&body),
                });
            }
            _ => {}
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response.text().await?)
    }
}

/// Extract the `message` of a JSON error body, or fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.chars().take(BODY_SNIPPET_CHARS).collect())
}

fn conversion_error(e: ConversionError) -> ApiError {
    ApiError::Json {
        message: e.to_string(),
        body: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake;
    use crate::domain::OperatingDays;
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::get};

    #[test]
    fn config_builder() {
        let config = ApiConfig::new("http://localhost:9000/api/")
            .with_credentials("ops", "secret")
            .with_max_concurrent(10)
            .with_timeout(60);

        assert_eq!(config.base_url, "http://localhost:9000/api");
        assert_eq!(
            config.credentials,
            Some(("ops".to_string(), "secret".to_string()))
        );
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = ApiConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.credentials, None);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn client_creation() {
        assert!(ApiClient::new(ApiConfig::default()).is_ok());
        assert!(matches!(
            ApiClient::new(ApiConfig::default().with_max_concurrent(0)),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(error_message(r#"{"message": "stale version"}"#), "stale version");
        assert_eq!(error_message("plain text"), "plain text");
    }

    #[tokio::test]
    async fn list_and_get_locations() {
        let backend = fake::spawn().await;
        let client = ApiClient::new(ApiConfig::new(&backend.base_url)).unwrap();

        let locations = client.list_locations().await.unwrap();
        assert_eq!(locations.len(), 4);
        assert_eq!(locations[0].code_str(), "IST");

        let taksim = client.get_location(LocationId(4)).await.unwrap();
        assert_eq!(taksim.code, None);

        assert!(matches!(
            client.get_location(LocationId(999)).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn location_crud() {
        let backend = fake::spawn().await;
        let client = ApiClient::new(ApiConfig::new(&backend.base_url)).unwrap();

        let draft = LocationDraft::validate("saw", "Sabiha Gökçen", "Istanbul", "Turkey").unwrap();
        let created = client.create_location(&draft).await.unwrap();
        assert_eq!(created.code_str(), "SAW");

        let draft = LocationDraft::validate("SAW", "Sabiha Gökçen Airport", "Istanbul", "Turkey")
            .unwrap();
        let updated = client.update_location(created.id, &draft).await.unwrap();
        assert_eq!(updated.name, "Sabiha Gökçen Airport");

        client.delete_location(created.id).await.unwrap();
        assert_eq!(client.list_locations().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn transportations_and_types() {
        let backend = fake::spawn().await;
        let client = ApiClient::new(ApiConfig::new(&backend.base_url)).unwrap();

        let types = client.transportation_types().await.unwrap();
        assert_eq!(types.len(), 4);

        let legs = client.list_transportations().await.unwrap();
        assert_eq!(legs.len(), 3);
        assert_eq!(legs[1].operating_days.display(), "Pzt, Çar, Cum");
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let backend = fake::spawn().await;
        let client = ApiClient::new(ApiConfig::new(&backend.base_url)).unwrap();

        let leg = client
            .get_transportation(TransportationId(2))
            .await
            .unwrap();
        let types = client.transportation_types().await.unwrap();
        let draft = TransportationDraft::validate(
            "BUS",
            Some(leg.origin.id),
            Some(leg.destination.id),
            &OperatingDays::new(vec![2]),
            &types,
        )
        .unwrap();

        let updated = client
            .update_transportation(leg.id, &draft, leg.version)
            .await
            .unwrap();
        assert_eq!(updated.version, leg.version + 1);

        // Re-using the old version must fail
        let err = client
            .update_transportation(leg.id, &draft, leg.version)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    #[tokio::test]
    async fn find_routes_direct_and_via_hub() {
        let backend = fake::spawn().await;
        let client = ApiClient::new(ApiConfig::new(&backend.base_url)).unwrap();

        let query = RouteQuery::new(Some(LocationId(1)), Some(LocationId(2)), None).unwrap();
        let routes = client.find_routes(&query).await.unwrap();

        assert_eq!(routes.len(), 2);
        assert!(routes[0].summary().is_direct);
        let via = routes[1].summary();
        assert_eq!(via.total_steps, 2);
        assert_eq!(via.origin.code_str(), "IST");
        assert_eq!(via.destination.code_str(), "JFK");
    }

    #[tokio::test]
    async fn wrapped_list_shape_is_rejected() {
        let app = Router::new().route(
            "/locations",
            get(|| async { Json(serde_json::json!({"data": []})) }),
        );
        let base_url = fake::serve(app).await;
        let client = ApiClient::new(ApiConfig::new(base_url)).unwrap();

        let err = client.list_locations().await.unwrap_err();
        match err {
            ApiError::Json { body, .. } => assert_eq!(body.as_deref(), Some(r#"{"data":[]}"#)),
            other => panic!("expected Json error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_message_is_extracted() {
        let app = Router::new().route(
            "/transportations",
            get(|| async {
                (
                    AxumStatus::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"message": "database unavailable"})),
                )
            }),
        );
        let base_url = fake::serve(app).await;
        let client = ApiClient::new(ApiConfig::new(base_url)).unwrap();

        let err = client.list_transportations().await.unwrap_err();
        assert_eq!(err.to_string(), "API error 500: database unavailable");
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn credentials_are_sent_as_basic_auth() {
        let app = Router::new().route(
            "/transportations/types",
            get(|headers: axum::http::HeaderMap| async move {
                let expected = format!("Basic {}", BASE64.encode("ops:secret"));
                if headers.get("authorization").and_then(|v| v.to_str().ok())
                    == Some(expected.as_str())
                {
                    (AxumStatus::OK, Json(serde_json::json!(["FLIGHT"])))
                } else {
                    (AxumStatus::UNAUTHORIZED, Json(serde_json::json!([])))
                }
            }),
        );
        let base_url = fake::serve(app).await;

        let anonymous = ApiClient::new(ApiConfig::new(&base_url)).unwrap();
        assert!(matches!(
            anonymous.transportation_types().await,
            Err(ApiError::Unauthorized)
        ));

        let authed =
            ApiClient::new(ApiConfig::new(&base_url).with_credentials("ops", "secret")).unwrap();
        assert_eq!(
            authed.transportation_types().await.unwrap(),
            vec![TransportType::Flight]
        );
    }
}
