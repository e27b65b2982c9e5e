//! Order Repository — read-back of committed orders
//!
//! Writes happen only through the coordinator's transactions; this module
//! reads committed orders back with their lines.

use sqlx::SqlitePool;

use super::RepoResult;
use crate::db::models::{
    RideOrder, RideOrderDetail, RideOrderLine, StoreOrder, StoreOrderDetail, StoreOrderLine,
};

pub async fn find_ride_order(pool: &SqlitePool, id: i64) -> RepoResult<Option<RideOrderDetail>> {
    let order = sqlx::query_as::<_, RideOrder>(
        "SELECT id, customer_id, order_date, total_amount, status FROM ride_order WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(order) = order else {
        return Ok(None);
    };

    let lines = sqlx::query_as::<_, RideOrderLine>(
        "SELECT id, order_id, ride_id, quantity, unit_price, subtotal \
         FROM ride_order_line WHERE order_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(RideOrderDetail { order, lines }))
}

pub async fn find_store_order(pool: &SqlitePool, id: i64) -> RepoResult<Option<StoreOrderDetail>> {
    let order = sqlx::query_as::<_, StoreOrder>(
        "SELECT id, customer_id, store_id, channel, payment_method, order_date, total_amount, status \
         FROM store_order WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(order) = order else {
        return Ok(None);
    };

    let lines = sqlx::query_as::<_, StoreOrderLine>(
        "SELECT id, order_id, item_id, quantity, unit_price, subtotal \
         FROM store_order_line WHERE order_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(StoreOrderDetail { order, lines }))
}
