//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::AppState;
use crate::db::models::{Employee, EmployeeCreate};
use crate::db::repository::employee;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// List active employees
pub async fn list(State(state): State<AppState>) -> AppResult<Json<AppResponse<Vec<Employee>>>> {
    let employees = employee::find_all(&state.pool).await?;
    Ok(ok(employees))
}

/// Get employee by id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Employee>>> {
    let employee = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {id} not found")))?;
    Ok(ok(employee))
}

/// Create a new employee
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<AppResponse<Employee>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let employee = employee::create(&state.pool, payload).await?;
    Ok(ok(employee))
}
