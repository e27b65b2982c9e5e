//! Maintenance API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::AppState;

/// Maintenance router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/maintenance", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::schedule).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::set_status))
        .route("/{id}/assignments", post(handler::add_assignment))
}
