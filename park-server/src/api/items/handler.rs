//! Catalog Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::AppState;
use crate::db::models::{CatalogItem, ItemCreate};
use crate::db::repository::item;
use crate::utils::validation::{MAX_NAME_LEN, validate_price, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Create a catalog item
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ItemCreate>,
) -> AppResult<Json<AppResponse<CatalogItem>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_price(payload.price, "price")?;
    let item = item::create(&state.pool, payload).await?;
    Ok(ok(item))
}

/// Get item by id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<CatalogItem>>> {
    let item = item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Item {id} not found")))?;
    Ok(ok(item))
}
