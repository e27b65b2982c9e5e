//! Employee Repository

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::{Employee, EmployeeCreate};
use crate::utils::time::now_millis;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let rows = sqlx::query_as::<_, Employee>(
        "SELECT id, name, is_active, created_at, updated_at FROM employee WHERE is_active = 1 ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let row = sqlx::query_as::<_, Employee>(
        "SELECT id, name, is_active, created_at, updated_at FROM employee WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// True when the employee exists and has not been deactivated.
pub async fn exists_active(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM employee WHERE id = ? AND is_active = 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn create(pool: &SqlitePool, data: EmployeeCreate) -> RepoResult<Employee> {
    let now = now_millis();
    let id = sqlx::query(
        "INSERT INTO employee (name, is_active, created_at, updated_at) VALUES (?, 1, ?, ?)",
    )
    .bind(&data.name)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}
