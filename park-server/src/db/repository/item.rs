//! Catalog Item Repository

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use crate::db::models::{CatalogItem, ItemCreate, StockRecord};
use crate::utils::time::now_millis;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CatalogItem>> {
    let row = sqlx::query_as::<_, CatalogItem>(
        "SELECT id, name, price, created_at, updated_at FROM item WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ItemCreate) -> RepoResult<CatalogItem> {
    let now = now_millis();
    let id = sqlx::query("INSERT INTO item (name, price, created_at, updated_at) VALUES (?, ?, ?, ?)")
        .bind(&data.name)
        .bind(data.price)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?
        .last_insert_rowid();

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create item".into()))
}

pub async fn find_stock(
    pool: &SqlitePool,
    store_id: i64,
    item_id: i64,
) -> RepoResult<Option<StockRecord>> {
    let row = sqlx::query_as::<_, StockRecord>(
        "SELECT store_id, item_id, stock_quantity, updated_at FROM stock_record \
         WHERE store_id = ? AND item_id = ?",
    )
    .bind(store_id)
    .bind(item_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list_stock_for_store(pool: &SqlitePool, store_id: i64) -> RepoResult<Vec<StockRecord>> {
    let rows = sqlx::query_as::<_, StockRecord>(
        "SELECT store_id, item_id, stock_quantity, updated_at FROM stock_record \
         WHERE store_id = ? ORDER BY item_id",
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
