//! Order API Handlers
//!
//! Thin wrappers over the fulfillment coordinator; every placement response
//! is the committed order with its lines, read back after commit.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::AppState;
use crate::db::models::{RideOrderCreate, RideOrderDetail, StoreOrderCreate, StoreOrderDetail};
use crate::db::repository::order;
use crate::orders;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Place a ride-ticket order
pub async fn place_ride_order(
    State(state): State<AppState>,
    Json(payload): Json<RideOrderCreate>,
) -> AppResult<Json<AppResponse<RideOrderDetail>>> {
    let detail = orders::place_ride_order(&state.pool, payload).await?;
    Ok(ok(detail))
}

/// Get a committed ride order with its lines
pub async fn get_ride_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<RideOrderDetail>>> {
    let detail = order::find_ride_order(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ride order {id} not found")))?;
    Ok(ok(detail))
}

/// Place a merchandise order against one store
pub async fn place_store_order(
    State(state): State<AppState>,
    Path(store_id): Path<i64>,
    Json(payload): Json<StoreOrderCreate>,
) -> AppResult<Json<AppResponse<StoreOrderDetail>>> {
    let detail = orders::place_store_order(&state.pool, store_id, payload).await?;
    Ok(ok(detail))
}

/// Get a committed store order with its lines
pub async fn get_store_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<StoreOrderDetail>>> {
    let detail = order::find_store_order(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store order {id} not found")))?;
    Ok(ok(detail))
}
