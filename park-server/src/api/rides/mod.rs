//! Ride API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::AppState;

/// Ride router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/rides", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::set_status))
}
