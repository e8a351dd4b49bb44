//! HTTP API serving the map front end.
//!
//! Reads are answered from the cached location collection; writes go to the
//! archive API first and are mirrored locally only after it confirms them.

mod handlers;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::store::{LocationStore, VillagerIdCache};

/// Application state shared across handlers
pub struct AppState {
    pub client: ApiClient,
    pub store: RwLock<LocationStore>,
    pub villagers: Mutex<VillagerIdCache>,
}

impl AppState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            store: RwLock::new(LocationStore::default()),
            villagers: Mutex::new(VillagerIdCache::new()),
        }
    }

    /// Refetch the location set. The villager cache is dropped with it.
    pub async fn reload(&self) -> Result<usize, ApiError> {
        let locations = self.client.fetch_locations().await?;
        let count = locations.len();

        self.store.write().await.replace_all(locations);
        self.villagers.lock().await.clear();

        info!("Loaded {} locations", count);
        Ok(count)
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/filters", get(handlers::filters))
        .route("/v1/search", get(handlers::search))
        .route("/v1/reload", post(handlers::reload))
        .route(
            "/v1/locations",
            get(handlers::list_locations).post(handlers::create_location),
        )
        .route(
            "/v1/locations/{id}",
            get(handlers::get_location)
                .put(handlers::update_location)
                .delete(handlers::delete_location),
        )
        .route("/v1/locations/{id}/records", get(handlers::location_records))
        .route("/v1/records", post(handlers::create_record))
        .route(
            "/v1/records/{id}",
            put(handlers::update_record).delete(handlers::delete_record),
        )
        .route("/v1/villagers/lookup", get(handlers::villager_lookup))
        .route("/v1/villagers/{id}", get(handlers::villager))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
