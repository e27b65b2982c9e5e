//! API Route Modules
//!
//! One directory per resource (`mod.rs` router + `handler.rs`):
//!
//! - [`health`] - liveness probe
//! - [`employees`] - staff registry
//! - [`rides`] - rides and availability events
//! - [`stores`] - stores, status and online flag
//! - [`items`] - merchandise catalog
//! - [`stock`] - per-store stock ledger
//! - [`orders`] - ride-ticket and merchandise order placement
//! - [`maintenance`] - maintenance jobs and crew assignments
//! - [`rain_outs`] - park-wide weather disruptions

pub mod employees;
pub mod health;
pub mod items;
pub mod maintenance;
pub mod orders;
pub mod rain_outs;
pub mod rides;
pub mod stock;
pub mod stores;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .merge(employees::router())
        .merge(rides::router())
        .merge(stores::router())
        .merge(items::router())
        .merge(stock::router())
        .merge(orders::router())
        .merge(maintenance::router())
        .merge(rain_outs::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
