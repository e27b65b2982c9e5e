//! Stock Ledger API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

/// Stock router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/stock", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/{store_id}", get(handler::list_for_store))
        .route("/{store_id}/{item_id}/restock", post(handler::restock))
}
