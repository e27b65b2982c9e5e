//! Ride API Handlers
//!
//! Status changes go through the availability state machine; this layer only
//! accepts the admin-driven events. Weather and maintenance events are
//! applied by their own operations, never via this endpoint.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::availability::{self, RideEvent};
use crate::core::AppState;
use crate::db;
use crate::db::models::{Ride, RideCreate};
use crate::db::repository::facility;
use crate::utils::validation::{MAX_NAME_LEN, validate_price, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Create a new ride (opens immediately)
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<RideCreate>,
) -> AppResult<Json<AppResponse<Ride>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if payload.capacity <= 0 {
        return Err(AppError::validation(format!(
            "capacity must be positive, got {}",
            payload.capacity
        )));
    }
    validate_price(payload.ticket_price, "ticket_price")?;

    let ride = facility::create_ride(&state.pool, payload).await?;
    Ok(ok(ride))
}

/// Get ride by id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Ride>>> {
    let ride = facility::find_ride(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ride {id} not found")))?;
    Ok(ok(ride))
}

/// PUT /api/rides/{id}/status
#[derive(Deserialize)]
pub struct RideStatusUpdate {
    pub event: RideEvent,
}

/// Apply an admin availability event to a ride
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RideStatusUpdate>,
) -> AppResult<Json<AppResponse<Ride>>> {
    match payload.event {
        RideEvent::Close
        | RideEvent::Reopen
        | RideEvent::RequestExpansion
        | RideEvent::ApproveExpansion
        | RideEvent::RejectExpansion => {}
        other => {
            return Err(AppError::validation(format!(
                "Event {other} is applied by maintenance/rain-out operations, not directly"
            )));
        }
    }

    let mut tx = db::begin_immediate(&state.pool).await?;
    match availability::apply_ride_event(&mut tx, id, payload.event).await {
        Ok(_) => tx.commit().await?,
        Err(e) => {
            db::rollback(tx).await;
            return Err(e);
        }
    }

    let ride = facility::find_ride(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ride {id} not found")))?;
    Ok(ok(ride))
}
