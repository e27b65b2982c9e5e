//! Stock Ledger API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::AppState;
use crate::db::models::StockRecord;
use crate::db::repository::{facility, item};
use crate::stock;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// List the stock ledger for one store
pub async fn list_for_store(
    State(state): State<AppState>,
    Path(store_id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<StockRecord>>>> {
    if facility::find_store(&state.pool, store_id).await?.is_none() {
        return Err(AppError::not_found(format!("Store {store_id} not found")));
    }
    let records = item::list_stock_for_store(&state.pool, store_id).await?;
    Ok(ok(records))
}

/// POST /api/stock/{store_id}/{item_id}/restock
#[derive(Deserialize)]
pub struct RestockRequest {
    /// Positive for deliveries, negative for shrinkage write-offs
    pub delta: i64,
}

pub async fn restock(
    State(state): State<AppState>,
    Path((store_id, item_id)): Path<(i64, i64)>,
    Json(payload): Json<RestockRequest>,
) -> AppResult<Json<AppResponse<StockRecord>>> {
    let record = stock::restock(&state.pool, store_id, item_id, payload.delta).await?;
    Ok(ok(record))
}
