//! Rain-Out API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::AppState;
use crate::db::models::{RainOutClear, RainOutDeclare, RainOutEvent};
use crate::rainout::{self, ClearOutcome, DeclareOutcome};
use crate::utils::{AppResponse, AppResult, ok};

/// Declare a rain-out (closes every open ride)
pub async fn declare(
    State(state): State<AppState>,
    Json(payload): Json<RainOutDeclare>,
) -> AppResult<Json<AppResponse<DeclareOutcome>>> {
    let outcome = rainout::declare(&state.pool, payload).await?;
    Ok(ok(outcome))
}

/// List rain-out events, newest first
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<AppResponse<Vec<RainOutEvent>>>> {
    let events = rainout::list(&state.pool).await?;
    Ok(ok(events))
}

/// Clear a rain-out (reopens rides not held by maintenance)
pub async fn clear(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RainOutClear>,
) -> AppResult<Json<AppResponse<ClearOutcome>>> {
    let outcome = rainout::clear(&state.pool, id, payload).await?;
    Ok(ok(outcome))
}
