//! Store API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::AppState;
use crate::db::models::{Store, StoreCreate, StoreStatus};
use crate::db::repository::facility;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Create a new store
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<StoreCreate>,
) -> AppResult<Json<AppResponse<Store>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let store = facility::create_store(&state.pool, payload).await?;
    Ok(ok(store))
}

/// Get store by id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Store>>> {
    let store = facility::find_store(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {id} not found")))?;
    Ok(ok(store))
}

/// PUT /api/stores/{id}/status
#[derive(Deserialize)]
pub struct StoreStatusUpdate {
    pub status: StoreStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StoreStatusUpdate>,
) -> AppResult<Json<AppResponse<Store>>> {
    let store = facility::set_store_status(&state.pool, id, payload.status).await?;
    Ok(ok(store))
}

/// PUT /api/stores/{id}/online
#[derive(Deserialize)]
pub struct StoreOnlineUpdate {
    pub available_online: bool,
}

pub async fn set_online(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StoreOnlineUpdate>,
) -> AppResult<Json<AppResponse<Store>>> {
    let store = facility::set_store_online(&state.pool, id, payload.available_online).await?;
    Ok(ok(store))
}
