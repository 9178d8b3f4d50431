//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedApiClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached logistics API client
    pub api: Arc<CachedApiClient>,
}

impl AppState {
    pub fn new(api: CachedApiClient) -> Self {
        Self { api: Arc::new(api) }
    }
}
