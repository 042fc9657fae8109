//! Read-only query surface over the persisted entity graph.

pub mod health;
pub mod positions;
pub mod vaults;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::db::Repository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/vaults", get(vaults::list_vaults))
        .route("/vaults/:address", get(vaults::get_vault))
        .route("/vaults/:address/updates", get(vaults::list_updates))
        .route("/vaults/:address/day-data", get(vaults::list_day_data))
        .route("/accounts/:address/positions", get(positions::list_positions))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
