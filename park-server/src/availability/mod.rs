//! Availability State Machine
//!
//! The ride lifecycle lives here and nowhere else: callers request a
//! transition by event, and only the pairs in [`next_status`] are legal.
//! Illegal pairs are rejected with [`TransitionError`] and the row is left
//! untouched. Store status has no lifecycle table (admin-settable enum).

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::db::models::RideStatus;
use crate::utils::AppError;
use crate::utils::time::now_millis;

/// Events that drive ride availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideEvent {
    /// Admin closure
    Close,
    /// Admin reopen of a closed or expansion-settled ride
    Reopen,
    /// Rain-out hold: forces/keeps the ride closed
    WeatherHold,
    /// Maintenance crew starts work
    BeginMaintenance,
    /// Last maintenance job on the ride completed
    FinishMaintenance,
    /// Capacity-expansion request filed
    RequestExpansion,
    /// Expansion approved (appends an audit record)
    ApproveExpansion,
    /// Expansion rejected
    RejectExpansion,
}

impl RideEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideEvent::Close => "close",
            RideEvent::Reopen => "reopen",
            RideEvent::WeatherHold => "weather_hold",
            RideEvent::BeginMaintenance => "begin_maintenance",
            RideEvent::FinishMaintenance => "finish_maintenance",
            RideEvent::RequestExpansion => "request_expansion",
            RideEvent::ApproveExpansion => "approve_expansion",
            RideEvent::RejectExpansion => "reject_expansion",
        }
    }
}

impl std::fmt::Display for RideEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected (state, event) pair
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {from} -> {event}")]
pub struct TransitionError {
    pub from: RideStatus,
    pub event: RideEvent,
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        AppError::InvalidTransition {
            from: e.from.to_string(),
            event: e.event.to_string(),
        }
    }
}

/// The legal transition table.
///
/// `(Maintenance, BeginMaintenance)` is a legal no-op so a second crew on a
/// ride already under maintenance does not fail.
pub fn next_status(current: RideStatus, event: RideEvent) -> Result<RideStatus, TransitionError> {
    use RideEvent as E;
    use RideStatus as S;

    let next = match (current, event) {
        (S::Open, E::Close) => S::Closed,
        (S::Open, E::WeatherHold) => S::Closed,
        (S::Open, E::BeginMaintenance) => S::Maintenance,
        (S::Open, E::RequestExpansion) => S::PendingExpandRequest,

        (S::Closed, E::Reopen) => S::Open,
        (S::Closed, E::BeginMaintenance) => S::Maintenance,

        (S::Maintenance, E::BeginMaintenance) => S::Maintenance,
        (S::Maintenance, E::FinishMaintenance) => S::Open,
        // Work finished while a rain-out is active: the ride stays held
        (S::Maintenance, E::WeatherHold) => S::Closed,

        (S::PendingExpandRequest, E::ApproveExpansion) => S::ApproveExpand,
        (S::PendingExpandRequest, E::RejectExpansion) => S::RejectExpand,

        // Terminal for the request, but re-enterable by explicit admin reopen
        (S::ApproveExpand, E::Reopen) => S::Open,
        (S::RejectExpand, E::Reopen) => S::Open,

        (from, event) => return Err(TransitionError { from, event }),
    };
    Ok(next)
}

/// Apply an event to a ride row inside a caller-owned transaction.
///
/// Reads the current status, consults the table, writes the next status, and
/// appends the expansion-history audit record on approval. Returns the new
/// status.
pub async fn apply_ride_event(
    conn: &mut SqliteConnection,
    ride_id: i64,
    event: RideEvent,
) -> Result<RideStatus, AppError> {
    let row: Option<(RideStatus,)> = sqlx::query_as("SELECT status FROM ride WHERE id = ?")
        .bind(ride_id)
        .fetch_optional(&mut *conn)
        .await?;
    let (current,) = row.ok_or_else(|| AppError::not_found(format!("Ride {ride_id} not found")))?;

    let next = next_status(current, event)?;

    let now = now_millis();
    sqlx::query("UPDATE ride SET status = ?, updated_at = ? WHERE id = ?")
        .bind(next)
        .bind(now)
        .bind(ride_id)
        .execute(&mut *conn)
        .await?;

    if event == RideEvent::ApproveExpansion {
        sqlx::query("INSERT INTO expansion_history (ride_id, approved_at) VALUES (?, ?)")
            .bind(ride_id)
            .bind(now)
            .execute(&mut *conn)
            .await?;
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use RideEvent as E;
    use RideStatus as S;

    #[test]
    fn test_open_transitions() {
        assert_eq!(next_status(S::Open, E::Close).unwrap(), S::Closed);
        assert_eq!(next_status(S::Open, E::WeatherHold).unwrap(), S::Closed);
        assert_eq!(next_status(S::Open, E::BeginMaintenance).unwrap(), S::Maintenance);
        assert_eq!(
            next_status(S::Open, E::RequestExpansion).unwrap(),
            S::PendingExpandRequest
        );
    }

    #[test]
    fn test_closed_transitions() {
        assert_eq!(next_status(S::Closed, E::Reopen).unwrap(), S::Open);
        assert_eq!(next_status(S::Closed, E::BeginMaintenance).unwrap(), S::Maintenance);
    }

    #[test]
    fn test_maintenance_transitions() {
        assert_eq!(next_status(S::Maintenance, E::FinishMaintenance).unwrap(), S::Open);
        assert_eq!(next_status(S::Maintenance, E::WeatherHold).unwrap(), S::Closed);
        // Second crew on an already-held ride is a legal no-op
        assert_eq!(
            next_status(S::Maintenance, E::BeginMaintenance).unwrap(),
            S::Maintenance
        );
    }

    #[test]
    fn test_expansion_lifecycle() {
        assert_eq!(
            next_status(S::PendingExpandRequest, E::ApproveExpansion).unwrap(),
            S::ApproveExpand
        );
        assert_eq!(
            next_status(S::PendingExpandRequest, E::RejectExpansion).unwrap(),
            S::RejectExpand
        );
        assert_eq!(next_status(S::ApproveExpand, E::Reopen).unwrap(), S::Open);
        assert_eq!(next_status(S::RejectExpand, E::Reopen).unwrap(), S::Open);
    }

    #[test]
    fn test_illegal_pairs_rejected() {
        // closed -> approve_expand is the canonical illegal pair
        let err = next_status(S::Closed, E::ApproveExpansion).unwrap_err();
        assert_eq!(err.from, S::Closed);
        assert_eq!(err.event, E::ApproveExpansion);

        assert!(next_status(S::Open, E::Reopen).is_err());
        assert!(next_status(S::Open, E::FinishMaintenance).is_err());
        assert!(next_status(S::Closed, E::WeatherHold).is_err());
        assert!(next_status(S::Maintenance, E::Close).is_err());
        assert!(next_status(S::ApproveExpand, E::RequestExpansion).is_err());
        assert!(next_status(S::PendingExpandRequest, E::Close).is_err());
    }
}
