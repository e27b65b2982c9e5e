//! Facility Repository — rides and stores

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::{Ride, RideCreate, Store, StoreCreate, StoreStatus};
use crate::utils::time::now_millis;

// ── Rides ───────────────────────────────────────────────────────────

pub async fn find_ride(pool: &SqlitePool, id: i64) -> RepoResult<Option<Ride>> {
    let row = sqlx::query_as::<_, Ride>(
        "SELECT id, name, capacity, ticket_price, status, created_at, updated_at FROM ride WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn ride_exists(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM ride WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// New rides open immediately; onboarding a ride in any other state is an
/// explicit admin action afterwards.
pub async fn create_ride(pool: &SqlitePool, data: RideCreate) -> RepoResult<Ride> {
    let now = now_millis();
    let id = sqlx::query(
        "INSERT INTO ride (name, capacity, ticket_price, status, created_at, updated_at) \
         VALUES (?, ?, ?, 'open', ?, ?)",
    )
    .bind(&data.name)
    .bind(data.capacity)
    .bind(data.ticket_price)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_ride(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create ride".into()))
}

// ── Stores ──────────────────────────────────────────────────────────

pub async fn find_store(pool: &SqlitePool, id: i64) -> RepoResult<Option<Store>> {
    let row = sqlx::query_as::<_, Store>(
        "SELECT id, name, store_type, status, available_online, created_at, updated_at \
         FROM store WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create_store(pool: &SqlitePool, data: StoreCreate) -> RepoResult<Store> {
    let available_online = data
        .available_online
        .unwrap_or_else(|| data.store_type.default_available_online());
    let now = now_millis();
    let id = sqlx::query(
        "INSERT INTO store (name, store_type, status, available_online, created_at, updated_at) \
         VALUES (?, ?, 'open', ?, ?, ?)",
    )
    .bind(&data.name)
    .bind(data.store_type)
    .bind(available_online)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_store(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create store".into()))
}

/// Store status is admin-settable directly; the enum itself is the only rule.
pub async fn set_store_status(pool: &SqlitePool, id: i64, status: StoreStatus) -> RepoResult<Store> {
    let updated = sqlx::query("UPDATE store SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    if updated == 0 {
        return Err(RepoError::NotFound(format!("Store {id} not found")));
    }
    find_store(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Store {id} not found")))
}

pub async fn set_store_online(
    pool: &SqlitePool,
    id: i64,
    available_online: bool,
) -> RepoResult<Store> {
    let updated = sqlx::query("UPDATE store SET available_online = ?, updated_at = ? WHERE id = ?")
        .bind(available_online)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    if updated == 0 {
        return Err(RepoError::NotFound(format!("Store {id} not found")));
    }
    find_store(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Store {id} not found")))
}
