//! Caching layer for logistics API list responses.
//!
//! The console re-reads the full location and transportation lists on
//! almost every page, so those lists (and the transport type list) are
//! kept for a short TTL. Anything written through [`CachedApiClient`]
//! drops the lists it could have changed, so the next read refetches.
//!
//! Route searches are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::domain::{
    Location, LocationDraft, LocationId, Route, Transportation, TransportationDraft,
    TransportationId, TransportType,
};
use crate::finder::RouteQuery;

/// Which list an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ListKey {
    Locations,
    Transportations,
    Types,
}

#[derive(Clone)]
enum ListEntry {
    Locations(Arc<Vec<Location>>),
    Transportations(Arc<Vec<Transportation>>),
    Types(Arc<Vec<TransportType>>),
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            max_capacity: 16,
        }
    }
}

/// Logistics API client with cached list reads.
pub struct CachedApiClient {
    client: ApiClient,
    lists: MokaCache<ListKey, ListEntry>,
}

impl CachedApiClient {
    /// Create a new cached client.
    pub fn new(client: ApiClient, config: &CacheConfig) -> Self {
        let lists = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { client, lists }
    }

    async fn cached(&self, key: ListKey) -> Option<ListEntry> {
        let hit = self.lists.get(&key).await;
        debug!(?key, hit = hit.is_some(), "list cache lookup");
        hit
    }

    /// All locations, in backend order.
    pub async fn locations(&self) -> Result<Arc<Vec<Location>>, ApiError> {
        if let Some(ListEntry::Locations(cached)) = self.cached(ListKey::Locations).await {
            return Ok(cached);
        }

        let entry = Arc::new(self.client.list_locations().await?);
        self.lists
            .insert(ListKey::Locations, ListEntry::Locations(entry.clone()))
            .await;
        Ok(entry)
    }

    /// All transportation legs, in backend order.
    pub async fn transportations(&self) -> Result<Arc<Vec<Transportation>>, ApiError> {
        if let Some(ListEntry::Transportations(cached)) =
            self.cached(ListKey::Transportations).await
        {
            return Ok(cached);
        }

        let entry = Arc::new(self.client.list_transportations().await?);
        self.lists
            .insert(
                ListKey::Transportations,
                ListEntry::Transportations(entry.clone()),
            )
            .await;
        Ok(entry)
    }

    /// Transport types the backend accepts.
    pub async fn transportation_types(&self) -> Result<Arc<Vec<TransportType>>, ApiError> {
        if let Some(ListEntry::Types(cached)) = self.cached(ListKey::Types).await {
            return Ok(cached);
        }

        let entry = Arc::new(self.client.transportation_types().await?);
        self.lists
            .insert(ListKey::Types, ListEntry::Types(entry.clone()))
            .await;
        Ok(entry)
    }

    pub async fn get_location(&self, id: LocationId) -> Result<Location, ApiError> {
        self.client.get_location(id).await
    }

    pub async fn get_transportation(
        &self,
        id: TransportationId,
    ) -> Result<Transportation, ApiError> {
        self.client.get_transportation(id).await
    }

    // Legs embed their origin and destination, so any location change
    // stales the transportation list as well.
    async fn locations_changed(&self) {
        self.lists.invalidate(&ListKey::Locations).await;
        self.lists.invalidate(&ListKey::Transportations).await;
    }

    async fn transportations_changed(&self) {
        self.lists.invalidate(&ListKey::Transportations).await;
    }

    pub async fn create_location(&self, draft: &LocationDraft) -> Result<Location, ApiError> {
        let result = self.client.create_location(draft).await;
        self.locations_changed().await;
        result
    }

    pub async fn update_location(
        &self,
        id: LocationId,
        draft: &LocationDraft,
    ) -> Result<Location, ApiError> {
        let result = self.client.update_location(id, draft).await;
        self.locations_changed().await;
        result
    }

    pub async fn delete_location(&self, id: LocationId) -> Result<(), ApiError> {
        let result = self.client.delete_location(id).await;
        self.locations_changed().await;
        result
    }

    pub async fn create_transportation(
        &self,
        draft: &TransportationDraft,
    ) -> Result<Transportation, ApiError> {
        let result = self.client.create_transportation(draft).await;
        self.transportations_changed().await;
        result
    }

    pub async fn update_transportation(
        &self,
        id: TransportationId,
        draft: &TransportationDraft,
        version: i64,
    ) -> Result<Transportation, ApiError> {
        let result = self.client.update_transportation(id, draft, version).await;
        self.transportations_changed().await;
        result
    }

    pub async fn delete_transportation(&self, id: TransportationId) -> Result<(), ApiError> {
        let result = self.client.delete_transportation(id).await;
        self.transportations_changed().await;
        result
    }

    /// Route search. Always goes to the backend.
    pub async fn find_routes(&self, query: &RouteQuery) -> Result<Vec<Route>, ApiError> {
        self.client.find_routes(query).await
    }
}
