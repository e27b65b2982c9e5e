//! Rain-Out API Module

mod handler;

use axum::{Router, routing::post};

use crate::core::AppState;

/// Rain-out router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/rain-outs", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::declare).get(handler::list))
        .route("/{id}/clear", post(handler::clear))
}
