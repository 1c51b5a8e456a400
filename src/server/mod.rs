//! HTTP API.

mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::MemoryStore;

pub use handlers::{ApiError, SearchResult};

/// Application state shared across handlers
pub struct AppState {
    pub store: MemoryStore,
    pub default_radius_km: f64,
}

impl AppState {
    pub fn new(store: MemoryStore, default_radius_km: f64) -> Self {
        Self {
            store,
            default_radius_km,
        }
    }
}

/// Build the router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/entities", post(handlers::create_entity))
        .route("/v1/entities/search", get(handlers::search_entities))
        .route("/v1/listings", post(handlers::create_listing))
        .route("/v1/listings/search", get(handlers::search_listings))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
