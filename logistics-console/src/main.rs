use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use logistics_console::api::{ApiClient, ApiConfig, DEFAULT_BASE_URL};
use logistics_console::cache::{CacheConfig, CachedApiClient};
use logistics_console::web::{AppState, create_router};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "static";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("logistics_console=info,tower_http=info")),
        )
        .init();

    let base_url =
        std::env::var("LOGISTICS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let mut api_config = ApiConfig::new(base_url);

    // Credentials are optional; a backend that needs them answers 401
    match (
        std::env::var("LOGISTICS_API_USERNAME"),
        std::env::var("LOGISTICS_API_PASSWORD"),
    ) {
        (Ok(username), Ok(password)) => {
            api_config = api_config.with_credentials(username, password);
        }
        (Ok(_), Err(_)) | (Err(_), Ok(_)) => {
            warn!("only one of LOGISTICS_API_USERNAME / LOGISTICS_API_PASSWORD is set; ignoring");
        }
        (Err(_), Err(_)) => {}
    }

    info!(base_url = %api_config.base_url, "using logistics API");
    let client = ApiClient::new(api_config).expect("Failed to create logistics API client");
    let cached = CachedApiClient::new(client, &CacheConfig::default());

    let state = AppState::new(cached);
    let static_dir =
        std::env::var("CONSOLE_STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());
    let app = create_router(state, &static_dir);

    let addr: SocketAddr = std::env::var("CONSOLE_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .expect("CONSOLE_ADDR must be a socket address, e.g. 127.0.0.1:3000");

    info!("Logistics console listening on http://{addr}");
    info!("  GET  /locations                 - Locations");
    info!("  GET  /transportations           - Transportations");
    info!("  GET  /routes                    - Route finder");
    info!("  GET  /api/locations/search?q=   - Location search (JSON)");
    info!("  GET  /api/routes                - Route summaries (JSON)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind console address");
    axum::serve(listener, app).await.expect("Server error");
}
