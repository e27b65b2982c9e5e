//! Order API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

/// Order router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/rides", post(handler::place_ride_order))
        .route("/rides/{id}", get(handler::get_ride_order))
        // POST takes the store to order against; GET takes the order id
        .route(
            "/stores/{id}",
            post(handler::place_store_order).get(handler::get_store_order),
        )
}
