//! Maintenance Scheduler
//!
//! Work orders against rides, each with one or more employee assignments.
//! Scheduling a job never changes the ride by itself; the ride only moves
//! when a job actually starts (`in_progress`) and only reopens when its last
//! unfinished job completes. Completion during an active rain-out lands the
//! ride in `closed` instead of `open`.

use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::availability::{self, RideEvent};
use crate::db;
use crate::db::models::{
    AssignmentCreate, EmployeeAssignment, MaintenanceCreate, MaintenanceJob, MaintenanceStatus,
    RideStatus,
};
use crate::db::repository::{employee, facility};
use crate::rainout;
use crate::utils::time::{date_to_millis, now_millis, parse_date};
use crate::utils::validation::{MAX_NOTE_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// A job together with its crew records
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceDetail {
    pub job: MaintenanceJob,
    pub assignments: Vec<EmployeeAssignment>,
}

/// Largest plausible shift length
const MAX_WORKED_HOURS: f64 = 24.0;

fn validate_worked_hours(hours: f64) -> AppResult<()> {
    if !hours.is_finite() || hours <= 0.0 || hours > MAX_WORKED_HOURS {
        return Err(AppError::validation(format!(
            "worked_hours must be in (0, {MAX_WORKED_HOURS}], got {hours}"
        )));
    }
    Ok(())
}

/// Schedule a maintenance job with its first crew assignment.
///
/// The job is recorded as `scheduled`; the ride keeps its current status
/// until work begins.
pub async fn schedule(pool: &SqlitePool, req: MaintenanceCreate) -> AppResult<MaintenanceDetail> {
    validate_required_text(&req.description, "description", MAX_NOTE_LEN)?;
    validate_worked_hours(req.worked_hours)?;
    let scheduled = date_to_millis(parse_date(&req.scheduled_date)?);

    if !facility::ride_exists(pool, req.ride_id).await? {
        return Err(AppError::not_found(format!("Ride {} not found", req.ride_id)));
    }
    if !employee::exists_active(pool, req.employee_id).await? {
        return Err(AppError::not_found(format!(
            "Employee {} not found",
            req.employee_id
        )));
    }

    let mut tx = db::begin_immediate(pool).await?;
    let result: AppResult<i64> = async {
        let now = now_millis();
        let job_id = sqlx::query(
            "INSERT INTO maintenance_job (ride_id, description, scheduled_date, status, created_at, updated_at) \
             VALUES (?, ?, ?, 'scheduled', ?, ?)",
        )
        .bind(req.ride_id)
        .bind(&req.description)
        .bind(scheduled)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query(
            "INSERT INTO employee_assignment (maintenance_id, employee_id, work_date, worked_hours) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(job_id)
        .bind(req.employee_id)
        .bind(scheduled)
        .bind(req.worked_hours)
        .execute(&mut *tx)
        .await?;

        Ok(job_id)
    }
    .await;

    let job_id = match result {
        Ok(id) => {
            tx.commit().await?;
            id
        }
        Err(e) => {
            db::rollback(tx).await;
            return Err(e);
        }
    };

    tracing::info!(job_id, ride_id = req.ride_id, "Maintenance scheduled");
    find_job(pool, job_id).await
}

/// Move a job to `new_status` and apply the ride-side effects.
///
/// Job status only moves forward: `scheduled` -> `in_progress` -> `done`,
/// with `scheduled` -> `done` allowed for work closed out in one step.
pub async fn set_status(
    pool: &SqlitePool,
    job_id: i64,
    new_status: MaintenanceStatus,
) -> AppResult<MaintenanceDetail> {
    let mut tx = db::begin_immediate(pool).await?;
    match set_status_in_tx(&mut tx, job_id, new_status).await {
        Ok(()) => tx.commit().await?,
        Err(e) => {
            db::rollback(tx).await;
            return Err(e);
        }
    }

    find_job(pool, job_id).await
}

async fn set_status_in_tx(
    conn: &mut SqliteConnection,
    job_id: i64,
    new_status: MaintenanceStatus,
) -> AppResult<()> {
    let job: Option<MaintenanceJob> =
        sqlx::query_as("SELECT * FROM maintenance_job WHERE id = ?")
            .bind(job_id)
            .fetch_optional(&mut *conn)
            .await?;
    let job = job.ok_or_else(|| AppError::not_found(format!("Maintenance job {job_id} not found")))?;

    use MaintenanceStatus as M;
    let legal = matches!(
        (job.status, new_status),
        (M::Scheduled, M::InProgress) | (M::Scheduled, M::Done) | (M::InProgress, M::Done)
    );
    if !legal {
        return Err(AppError::conflict(format!(
            "Maintenance job {job_id} cannot move from {} to {}",
            job.status, new_status
        )));
    }

    sqlx::query("UPDATE maintenance_job SET status = ?, updated_at = ? WHERE id = ?")
        .bind(new_status)
        .bind(now_millis())
        .bind(job_id)
        .execute(&mut *conn)
        .await?;

    match new_status {
        M::InProgress => {
            availability::apply_ride_event(conn, job.ride_id, RideEvent::BeginMaintenance).await?;
        }
        M::Done => finish_ride_if_last(conn, &job).await?,
        M::Scheduled => {}
    }
    Ok(())
}

/// On job completion, release the ride if this was its last unfinished job.
/// A job closed out straight from `scheduled` never moved the ride, so there
/// is nothing to release then.
async fn finish_ride_if_last(conn: &mut SqliteConnection, job: &MaintenanceJob) -> AppResult<()> {
    let (open_jobs,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM maintenance_job WHERE ride_id = ? AND status != 'done' AND id != ?",
    )
    .bind(job.ride_id)
    .bind(job.id)
    .fetch_one(&mut *conn)
    .await?;
    if open_jobs > 0 {
        return Ok(());
    }

    let row: Option<(RideStatus,)> = sqlx::query_as("SELECT status FROM ride WHERE id = ?")
        .bind(job.ride_id)
        .fetch_optional(&mut *conn)
        .await?;
    let Some((RideStatus::Maintenance,)) = row else {
        return Ok(());
    };

    let event = if rainout::active_exists(conn).await? {
        RideEvent::WeatherHold
    } else {
        RideEvent::FinishMaintenance
    };
    availability::apply_ride_event(conn, job.ride_id, event).await?;
    Ok(())
}

/// Attach another crew member to an unfinished job.
pub async fn add_assignment(
    pool: &SqlitePool,
    job_id: i64,
    req: AssignmentCreate,
) -> AppResult<EmployeeAssignment> {
    validate_worked_hours(req.worked_hours)?;
    let work_date = date_to_millis(parse_date(&req.work_date)?);

    let job: Option<MaintenanceJob> =
        sqlx::query_as("SELECT * FROM maintenance_job WHERE id = ?")
            .bind(job_id)
            .fetch_optional(pool)
            .await?;
    let job = job.ok_or_else(|| AppError::not_found(format!("Maintenance job {job_id} not found")))?;
    if job.status.is_terminal() {
        return Err(AppError::conflict(format!(
            "Maintenance job {job_id} is already done"
        )));
    }
    if !employee::exists_active(pool, req.employee_id).await? {
        return Err(AppError::not_found(format!(
            "Employee {} not found",
            req.employee_id
        )));
    }

    let id = sqlx::query(
        "INSERT INTO employee_assignment (maintenance_id, employee_id, work_date, worked_hours) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(job_id)
    .bind(req.employee_id)
    .bind(work_date)
    .bind(req.worked_hours)
    .execute(pool)
    .await?
    .last_insert_rowid();

    let assignment = sqlx::query_as::<_, EmployeeAssignment>(
        "SELECT * FROM employee_assignment WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(assignment)
}

/// One job with its crew.
pub async fn find_job(pool: &SqlitePool, job_id: i64) -> AppResult<MaintenanceDetail> {
    let job: Option<MaintenanceJob> =
        sqlx::query_as("SELECT * FROM maintenance_job WHERE id = ?")
            .bind(job_id)
            .fetch_optional(pool)
            .await?;
    let job = job.ok_or_else(|| AppError::not_found(format!("Maintenance job {job_id} not found")))?;

    let assignments = sqlx::query_as::<_, EmployeeAssignment>(
        "SELECT * FROM employee_assignment WHERE maintenance_id = ? ORDER BY id",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;

    Ok(MaintenanceDetail { job, assignments })
}

/// All jobs, optionally narrowed to one ride. Newest first.
pub async fn list_jobs(pool: &SqlitePool, ride_id: Option<i64>) -> AppResult<Vec<MaintenanceJob>> {
    let jobs = match ride_id {
        Some(ride_id) => {
            sqlx::query_as::<_, MaintenanceJob>(
                "SELECT * FROM maintenance_job WHERE ride_id = ? ORDER BY id DESC",
            )
            .bind(ride_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, MaintenanceJob>("SELECT * FROM maintenance_job ORDER BY id DESC")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(jobs)
}
