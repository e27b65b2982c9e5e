//! Rain-Out Controller
//!
//! Park-wide weather disruptions. Declaring a rain-out records the event and
//! closes every open ride in the same transaction; clearing it marks the
//! event resolved and reopens the closed rides that are not tied up by
//! unfinished maintenance. Both operations are explicit single calls, so the
//! ride sweep can never run without its event row (or vice versa).

use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::db;
use crate::db::models::{RainOutClear, RainOutDeclare, RainOutEvent, RainOutStatus};
use crate::db::repository::employee;
use crate::utils::time::{now_millis, parse_date};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// Declare outcome: the recorded event plus the sweep count
#[derive(Debug, Clone, Serialize)]
pub struct DeclareOutcome {
    pub event: RainOutEvent,
    pub rides_closed: u64,
}

/// Clear outcome: the resolved event plus the reopen count
#[derive(Debug, Clone, Serialize)]
pub struct ClearOutcome {
    pub event: RainOutEvent,
    pub rides_reopened: u64,
}

/// Declare a rain-out for a calendar date.
///
/// One event per date: a second declaration for the same date is a conflict,
/// whether the first is still active or already cleared. The event insert and
/// the bulk closure of open rides commit together.
pub async fn declare(pool: &SqlitePool, req: RainOutDeclare) -> AppResult<DeclareOutcome> {
    parse_date(&req.rain_out_date)?;
    validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;
    if !employee::exists_active(pool, req.employee_id).await? {
        return Err(AppError::not_found(format!(
            "Employee {} not found",
            req.employee_id
        )));
    }

    let mut tx = db::begin_immediate(pool).await?;
    match declare_in_tx(&mut tx, &req).await {
        Ok(outcome) => {
            tx.commit().await?;
            Ok(outcome)
        }
        Err(e) => {
            db::rollback(tx).await;
            Err(e)
        }
    }
}

async fn declare_in_tx(
    conn: &mut SqliteConnection,
    req: &RainOutDeclare,
) -> AppResult<DeclareOutcome> {
    // At most one active event park-wide: the reopen-on-clear rule is only
    // sound when exactly one disruption owns the closed rides
    if active_exists(&mut *conn).await? {
        return Err(AppError::conflict(
            "A rain-out is already active; clear it before declaring another",
        ));
    }

    let now = now_millis();
    let insert = sqlx::query(
        "INSERT INTO rain_out_event (rain_out_date, status, declared_by, note, created_at) \
         VALUES (?, 'active', ?, ?, ?)",
    )
    .bind(&req.rain_out_date)
    .bind(req.employee_id)
    .bind(&req.note)
    .bind(now)
    .execute(&mut *conn)
    .await;

    let event_id = match insert {
        Ok(r) => r.last_insert_rowid(),
        Err(e) if e.as_database_error().is_some_and(|d| d.is_unique_violation()) => {
            return Err(AppError::conflict(format!(
                "Rain-out already declared for {}",
                req.rain_out_date
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let rides_closed = sqlx::query(
        "UPDATE ride SET status = 'closed', updated_at = ? WHERE status = 'open'",
    )
    .bind(now)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    let event: RainOutEvent = sqlx::query_as("SELECT * FROM rain_out_event WHERE id = ?")
        .bind(event_id)
        .fetch_one(&mut *conn)
        .await?;

    tracing::info!(
        date = %event.rain_out_date,
        rides_closed,
        "Rain-out declared"
    );
    Ok(DeclareOutcome {
        event,
        rides_closed,
    })
}

/// Clear a declared rain-out event.
///
/// Reopens closed rides, except those with an unfinished maintenance job;
/// those stay closed until the work completes. Idempotency is explicit: a
/// second clear of the same event is a conflict, not a silent repeat of the
/// reopen sweep.
pub async fn clear(pool: &SqlitePool, event_id: i64, req: RainOutClear) -> AppResult<ClearOutcome> {
    validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;
    if !employee::exists_active(pool, req.employee_id).await? {
        return Err(AppError::not_found(format!(
            "Employee {} not found",
            req.employee_id
        )));
    }

    let mut tx = db::begin_immediate(pool).await?;
    match clear_in_tx(&mut tx, event_id, &req).await {
        Ok(outcome) => {
            tx.commit().await?;
            Ok(outcome)
        }
        Err(e) => {
            db::rollback(tx).await;
            Err(e)
        }
    }
}

async fn clear_in_tx(
    conn: &mut SqliteConnection,
    event_id: i64,
    req: &RainOutClear,
) -> AppResult<ClearOutcome> {
    let existing: Option<RainOutEvent> =
        sqlx::query_as("SELECT * FROM rain_out_event WHERE id = ?")
            .bind(event_id)
            .fetch_optional(&mut *conn)
            .await?;
    let existing = existing
        .ok_or_else(|| AppError::not_found(format!("Rain-out event {event_id} not found")))?;
    if existing.status == RainOutStatus::Cleared {
        return Err(AppError::conflict(format!(
            "Rain-out for {} is already cleared",
            existing.rain_out_date
        )));
    }

    let now = now_millis();
    sqlx::query(
        "UPDATE rain_out_event SET status = 'cleared', cleared_by = ?, note = COALESCE(?, note), \
         resolved_at = ? WHERE id = ?",
    )
    .bind(req.employee_id)
    .bind(&req.note)
    .bind(now)
    .bind(existing.id)
    .execute(&mut *conn)
    .await?;

    // Rides under unfinished maintenance stay closed until the work is done
    let rides_reopened = sqlx::query(
        "UPDATE ride SET status = 'open', updated_at = ? \
         WHERE status = 'closed' \
           AND id NOT IN (SELECT ride_id FROM maintenance_job WHERE status != 'done')",
    )
    .bind(now)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    let event: RainOutEvent = sqlx::query_as("SELECT * FROM rain_out_event WHERE id = ?")
        .bind(existing.id)
        .fetch_one(&mut *conn)
        .await?;

    tracing::info!(date = %event.rain_out_date, rides_reopened, "Rain-out cleared");
    Ok(ClearOutcome {
        event,
        rides_reopened,
    })
}

/// True while any rain-out event is still active. Runs on the caller's
/// transaction so maintenance completion sees a consistent answer.
pub(crate) async fn active_exists(conn: &mut SqliteConnection) -> Result<bool, AppError> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM rain_out_event WHERE status = 'active' LIMIT 1")
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.is_some())
}

/// All rain-out events, newest first.
pub async fn list(pool: &SqlitePool) -> AppResult<Vec<RainOutEvent>> {
    let events = sqlx::query_as::<_, RainOutEvent>(
        "SELECT * FROM rain_out_event ORDER BY rain_out_date DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::RideStatus;
    use crate::db::test_util::memory_pool;

    async fn seed(pool: &SqlitePool) {
        sqlx::query(
            "INSERT INTO employee (id, name, is_active) VALUES (5, 'Dana Reyes', 1)",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO ride (id, name, capacity, ticket_price, status) VALUES \
             (1, 'Thunder Coaster', 24, 12.50, 'open'), \
             (2, 'Splash Canyon', 16, 9.75, 'open'), \
             (3, 'Sky Drop', 12, 15.00, 'maintenance'), \
             (4, 'Ghost Manor', 20, 11.00, 'closed')",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn declare_req(date: &str) -> RainOutDeclare {
        RainOutDeclare {
            rain_out_date: date.into(),
            employee_id: 5,
            note: Some("Thunderstorm warning".into()),
        }
    }

    fn clear_req() -> RainOutClear {
        RainOutClear {
            employee_id: 5,
            note: None,
        }
    }

    async fn ride_status(pool: &SqlitePool, id: i64) -> RideStatus {
        let (s,): (RideStatus,) = sqlx::query_as("SELECT status FROM ride WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap();
        s
    }

    #[tokio::test]
    async fn test_declare_closes_open_rides_only() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let outcome = declare(&pool, declare_req("2025-07-14")).await.unwrap();
        assert_eq!(outcome.rides_closed, 2);
        assert_eq!(outcome.event.status, RainOutStatus::Active);

        assert_eq!(ride_status(&pool, 1).await, RideStatus::Closed);
        assert_eq!(ride_status(&pool, 2).await, RideStatus::Closed);
        // Maintenance and already-closed rides untouched
        assert_eq!(ride_status(&pool, 3).await, RideStatus::Maintenance);
        assert_eq!(ride_status(&pool, 4).await, RideStatus::Closed);
    }

    #[tokio::test]
    async fn test_declare_same_date_twice_conflicts() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let declared = declare(&pool, declare_req("2025-07-14")).await.unwrap();
        let err = declare(&pool, declare_req("2025-07-14")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // A cleared day may not be re-declared either
        clear(&pool, declared.event.id, clear_req()).await.unwrap();
        let err = declare(&pool, declare_req("2025-07-14")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // The failed declarations must not re-sweep or add events
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rain_out_event")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn test_second_active_declaration_conflicts() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let first = declare(&pool, declare_req("2025-07-14")).await.unwrap();

        // A second active event, even for another date, must be rejected:
        // otherwise clearing either one would reopen rides still held by the
        // other
        let err = declare(&pool, declare_req("2025-07-15")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM rain_out_event")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(ride_status(&pool, 1).await, RideStatus::Closed);

        // Once the active event clears, a fresh date is accepted
        clear(&pool, first.event.id, clear_req()).await.unwrap();
        declare(&pool, declare_req("2025-07-15")).await.unwrap();
    }

    #[tokio::test]
    async fn test_declare_unknown_employee() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let mut req = declare_req("2025-07-14");
        req.employee_id = 99;
        let err = declare(&pool, req).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_declare_bad_date() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = declare(&pool, declare_req("14/07/2025")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_clear_reopens_swept_rides() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let declared = declare(&pool, declare_req("2025-07-14")).await.unwrap();
        let outcome = clear(&pool, declared.event.id, clear_req()).await.unwrap();

        // Rides 1, 2 were swept closed; ride 4 was closed before the rain-out
        // but carries no unfinished maintenance, so the sweep reopens it too
        assert_eq!(outcome.rides_reopened, 3);
        assert_eq!(outcome.event.status, RainOutStatus::Cleared);
        assert!(outcome.event.resolved_at.is_some());
        assert_eq!(outcome.event.cleared_by, Some(5));

        assert_eq!(ride_status(&pool, 1).await, RideStatus::Open);
        assert_eq!(ride_status(&pool, 4).await, RideStatus::Open);
        assert_eq!(ride_status(&pool, 3).await, RideStatus::Maintenance);
    }

    #[tokio::test]
    async fn test_clear_skips_rides_with_unfinished_maintenance() {
        let pool = memory_pool().await;
        seed(&pool).await;

        sqlx::query(
            "INSERT INTO maintenance_job (ride_id, description, scheduled_date, status, created_at, updated_at) \
             VALUES (4, 'Brake overhaul', 0, 'in_progress', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let declared = declare(&pool, declare_req("2025-07-14")).await.unwrap();
        let outcome = clear(&pool, declared.event.id, clear_req()).await.unwrap();

        assert_eq!(outcome.rides_reopened, 2);
        assert_eq!(ride_status(&pool, 4).await, RideStatus::Closed);
    }

    #[tokio::test]
    async fn test_clear_twice_conflicts() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let declared = declare(&pool, declare_req("2025-07-14")).await.unwrap();
        clear(&pool, declared.event.id, clear_req()).await.unwrap();

        // Close a ride between the two clears; the second clear must not
        // reopen it as a side effect
        sqlx::query("UPDATE ride SET status = 'closed' WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let err = clear(&pool, declared.event.id, clear_req()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(ride_status(&pool, 1).await, RideStatus::Closed);
    }

    #[tokio::test]
    async fn test_clear_unknown_event() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = clear(&pool, 99, clear_req()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_declare_then_redeclare_next_day() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let declared = declare(&pool, declare_req("2025-07-14")).await.unwrap();
        clear(&pool, declared.event.id, clear_req()).await.unwrap();

        // A different date is a fresh event, not a conflict
        let outcome = declare(&pool, declare_req("2025-07-15")).await.unwrap();
        assert_eq!(outcome.rides_closed, 3);

        let events = list(&pool).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].rain_out_date, "2025-07-15");
    }
}
