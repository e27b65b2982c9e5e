//! Stock Ledger
//!
//! The authoritative per-(store, item) quantity on hand. The counter is only
//! ever decremented by a committed order (through [`reserve_line`] inside the
//! coordinator's transaction) and increased by [`restock`]. The
//! `stock_quantity >= 0` CHECK constraint makes a negative counter
//! unrepresentable even if a caller bypasses the conditional updates.

use sqlx::{SqliteConnection, SqlitePool};

use crate::db;
use crate::db::models::StockRecord;
use crate::db::repository::item;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

/// Adjust the counter by `delta`, creating the ledger row at zero first if the
/// store has never carried the item. A delta that would drive the counter
/// negative is rejected and the row is left unchanged.
pub async fn restock(
    pool: &SqlitePool,
    store_id: i64,
    item_id: i64,
    delta: i64,
) -> AppResult<StockRecord> {
    if delta == 0 {
        return Err(AppError::validation("delta must be non-zero"));
    }

    // Referential pre-checks so the client sees NotFound, not an FK failure
    let store: Option<(i64,)> = sqlx::query_as("SELECT id FROM store WHERE id = ?")
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    if store.is_none() {
        return Err(AppError::not_found(format!("Store {store_id} not found")));
    }
    if item::find_by_id(pool, item_id).await?.is_none() {
        return Err(AppError::not_found(format!("Item {item_id} not found")));
    }

    let now = now_millis();
    let mut tx = db::begin_immediate(pool).await?;

    let result: AppResult<()> = async {
        sqlx::query(
            "INSERT OR IGNORE INTO stock_record (store_id, item_id, stock_quantity, updated_at) \
             VALUES (?, ?, 0, ?)",
        )
        .bind(store_id)
        .bind(item_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            "UPDATE stock_record SET stock_quantity = stock_quantity + ?, updated_at = ? \
             WHERE store_id = ? AND item_id = ? AND stock_quantity + ? >= 0",
        )
        .bind(delta)
        .bind(now)
        .bind(store_id)
        .bind(item_id)
        .bind(delta)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::validation(format!(
                "Restock of {delta} for item {item_id} at store {store_id} would drive stock negative"
            )));
        }
        Ok(())
    }
    .await;

    match result {
        Ok(()) => tx.commit().await?,
        Err(e) => {
            db::rollback(tx).await;
            return Err(e);
        }
    }

    item::find_stock(pool, store_id, item_id)
        .await?
        .ok_or_else(|| AppError::database("Stock record missing after restock"))
}

/// Conditionally decrement one ledger row inside the caller's transaction.
///
/// The predicate `stock_quantity >= requested` plus the affected-row check
/// keeps check-and-decrement atomic: if the row was not
/// decremented, the caller learns whether the item is not carried at all or
/// short, with the pre-decrement quantity for the error report.
pub async fn reserve_line(
    conn: &mut SqliteConnection,
    store_id: i64,
    item_id: i64,
    requested: i64,
) -> AppResult<()> {
    let updated = sqlx::query(
        "UPDATE stock_record SET stock_quantity = stock_quantity - ?, updated_at = ? \
         WHERE store_id = ? AND item_id = ? AND stock_quantity >= ?",
    )
    .bind(requested)
    .bind(now_millis())
    .bind(store_id)
    .bind(item_id)
    .bind(requested)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    if updated == 1 {
        return Ok(());
    }

    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT stock_quantity FROM stock_record WHERE store_id = ? AND item_id = ?",
    )
    .bind(store_id)
    .bind(item_id)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        None => Err(AppError::ItemNotCarried { item_id }),
        Some((available,)) => Err(AppError::InsufficientStock {
            item_id,
            requested,
            available,
        }),
    }
}
