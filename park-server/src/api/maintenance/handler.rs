//! Maintenance API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::AppState;
use crate::db::models::{
    AssignmentCreate, EmployeeAssignment, MaintenanceCreate, MaintenanceJob, MaintenanceStatus,
};
use crate::maintenance::{self, MaintenanceDetail};
use crate::utils::{AppResponse, AppResult, ok};

/// Schedule a maintenance job with its first crew assignment
pub async fn schedule(
    State(state): State<AppState>,
    Json(payload): Json<MaintenanceCreate>,
) -> AppResult<Json<AppResponse<MaintenanceDetail>>> {
    let detail = maintenance::schedule(&state.pool, payload).await?;
    Ok(ok(detail))
}

/// GET /api/maintenance?ride_id=
#[derive(Deserialize)]
pub struct ListQuery {
    pub ride_id: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<MaintenanceJob>>>> {
    let jobs = maintenance::list_jobs(&state.pool, query.ride_id).await?;
    Ok(ok(jobs))
}

/// Get one job with its crew
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<MaintenanceDetail>>> {
    let detail = maintenance::find_job(&state.pool, id).await?;
    Ok(ok(detail))
}

/// PUT /api/maintenance/{id}/status
#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: MaintenanceStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<AppResponse<MaintenanceDetail>>> {
    let detail = maintenance::set_status(&state.pool, id, payload.status).await?;
    Ok(ok(detail))
}

/// Attach another crew member to a job
pub async fn add_assignment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignmentCreate>,
) -> AppResult<Json<AppResponse<EmployeeAssignment>>> {
    let assignment = maintenance::add_assignment(&state.pool, id, payload).await?;
    Ok(ok(assignment))
}
