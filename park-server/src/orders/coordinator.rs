//! Order Fulfillment Coordinator
//!
//! The single entry point for committing orders against shared park
//! resources. Each placement is one IMMEDIATE transaction: header insert,
//! availability re-check, catalog pricing, conditional stock decrement, line
//! inserts and the exact total all commit together or not at all. A reader
//! can never observe an order without its lines, and two carts racing for the
//! last unit cannot both win.
//!
//! Prices always come from the catalog inside the transaction. A
//! client-echoed unit price is a consistency check against a stale cart, not
//! an input.

use sqlx::{SqliteConnection, SqlitePool};

use crate::db;
use crate::db::models::{
    OrderChannel, RideOrderCreate, RideOrderDetail, RideStatus, StoreOrderCreate, StoreOrderDetail,
    StoreStatus, StoreType,
};
use crate::db::repository::order as order_repo;
use crate::orders::money;
use crate::stock;
use crate::utils::validation::{
    MAX_ORDER_LINES, MAX_TOKEN_LEN, validate_price, validate_quantity, validate_required_text,
};
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

/// Place a ride-ticket order.
///
/// Every referenced ride must be `open`; capacity is not decremented per
/// ticket.
pub async fn place_ride_order(
    pool: &SqlitePool,
    req: RideOrderCreate,
) -> AppResult<RideOrderDetail> {
    validate_lines(req.lines.len())?;
    for line in &req.lines {
        validate_quantity(line.quantity, "quantity")?;
        if let Some(p) = line.unit_price {
            validate_price(p, "unit_price")?;
        }
    }

    let mut tx = db::begin_immediate(pool).await?;
    let order_id = match insert_ride_order(&mut tx, &req).await {
        Ok(id) => {
            tx.commit().await?;
            id
        }
        Err(e) => {
            db::rollback(tx).await;
            return Err(e);
        }
    };

    order_repo::find_ride_order(pool, order_id)
        .await?
        .ok_or_else(|| AppError::internal("Committed ride order vanished"))
}

async fn insert_ride_order(conn: &mut SqliteConnection, req: &RideOrderCreate) -> AppResult<i64> {
    let order_date = now_millis();
    let order_id = sqlx::query(
        "INSERT INTO ride_order (customer_id, order_date, total_amount, status) \
         VALUES (?, ?, 0, 'completed')",
    )
    .bind(req.customer_id)
    .bind(order_date)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    let mut subtotals = Vec::with_capacity(req.lines.len());
    for line in &req.lines {
        let row: Option<(RideStatus, f64)> =
            sqlx::query_as("SELECT status, ticket_price FROM ride WHERE id = ?")
                .bind(line.ride_id)
                .fetch_optional(&mut *conn)
                .await?;
        let (status, ticket_price) =
            row.ok_or_else(|| AppError::not_found(format!("Ride {} not found", line.ride_id)))?;

        if status != RideStatus::Open {
            return Err(AppError::FacilityUnavailable {
                facility: format!("ride {}", line.ride_id),
            });
        }

        check_submitted_price(line.unit_price, ticket_price, &format!("ride {}", line.ride_id))?;

        let subtotal = money::line_subtotal(ticket_price, line.quantity)?;
        sqlx::query(
            "INSERT INTO ride_order_line (order_id, ride_id, quantity, unit_price, subtotal) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(line.ride_id)
        .bind(line.quantity)
        .bind(ticket_price)
        .bind(subtotal)
        .execute(&mut *conn)
        .await?;
        subtotals.push(subtotal);
    }

    let total = money::order_total(&subtotals)?;
    sqlx::query("UPDATE ride_order SET total_amount = ? WHERE id = ?")
        .bind(total)
        .bind(order_id)
        .execute(&mut *conn)
        .await?;

    Ok(order_id)
}

/// Place a merchandise order against one store.
///
/// The store must be `open` (and `available_online` for the online channel);
/// every line decrements its stock record conditionally, all-or-nothing.
pub async fn place_store_order(
    pool: &SqlitePool,
    store_id: i64,
    req: StoreOrderCreate,
) -> AppResult<StoreOrderDetail> {
    validate_lines(req.lines.len())?;
    validate_required_text(&req.payment_method, "payment_method", MAX_TOKEN_LEN)?;
    for line in &req.lines {
        validate_quantity(line.quantity, "quantity")?;
        if let Some(p) = line.unit_price {
            validate_price(p, "unit_price")?;
        }
    }

    let mut tx = db::begin_immediate(pool).await?;
    let order_id = match insert_store_order(&mut tx, store_id, &req).await {
        Ok(id) => {
            tx.commit().await?;
            id
        }
        Err(e) => {
            db::rollback(tx).await;
            return Err(e);
        }
    };

    order_repo::find_store_order(pool, order_id)
        .await?
        .ok_or_else(|| AppError::internal("Committed store order vanished"))
}

async fn insert_store_order(
    conn: &mut SqliteConnection,
    store_id: i64,
    req: &StoreOrderCreate,
) -> AppResult<i64> {
    // IMMEDIATE begin already holds the writer lock, so this read cannot race
    // a concurrent status change
    let row: Option<(StoreStatus, StoreType, bool)> =
        sqlx::query_as("SELECT status, store_type, available_online FROM store WHERE id = ?")
            .bind(store_id)
            .fetch_optional(&mut *conn)
            .await?;
    let (status, _store_type, available_online) =
        row.ok_or_else(|| AppError::not_found(format!("Store {store_id} not found")))?;

    if status != StoreStatus::Open {
        return Err(AppError::FacilityUnavailable {
            facility: format!("store {store_id}"),
        });
    }
    if req.channel == OrderChannel::Online && !available_online {
        return Err(AppError::FacilityUnavailable {
            facility: format!("store {store_id} (online)"),
        });
    }

    let order_date = now_millis();
    let order_id = sqlx::query(
        "INSERT INTO store_order (customer_id, store_id, channel, payment_method, order_date, total_amount, status) \
         VALUES (?, ?, ?, ?, ?, 0, 'completed')",
    )
    .bind(req.customer_id)
    .bind(store_id)
    .bind(req.channel)
    .bind(&req.payment_method)
    .bind(order_date)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    let mut subtotals = Vec::with_capacity(req.lines.len());
    for line in &req.lines {
        let item: Option<(f64,)> = sqlx::query_as("SELECT price FROM item WHERE id = ?")
            .bind(line.item_id)
            .fetch_optional(&mut *conn)
            .await?;
        let (catalog_price,) =
            item.ok_or_else(|| AppError::not_found(format!("Item {} not found", line.item_id)))?;

        check_submitted_price(
            line.unit_price,
            catalog_price,
            &format!("item {}", line.item_id),
        )?;

        stock::reserve_line(&mut *conn, store_id, line.item_id, line.quantity).await?;

        let subtotal = money::line_subtotal(catalog_price, line.quantity)?;
        sqlx::query(
            "INSERT INTO store_order_line (order_id, item_id, quantity, unit_price, subtotal) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(line.item_id)
        .bind(line.quantity)
        .bind(catalog_price)
        .bind(subtotal)
        .execute(&mut *conn)
        .await?;
        subtotals.push(subtotal);
    }

    let total = money::order_total(&subtotals)?;
    sqlx::query("UPDATE store_order SET total_amount = ? WHERE id = ?")
        .bind(total)
        .bind(order_id)
        .execute(&mut *conn)
        .await?;

    Ok(order_id)
}

fn validate_lines(count: usize) -> AppResult<()> {
    if count == 0 {
        return Err(AppError::validation("Order must contain at least one line"));
    }
    if count > MAX_ORDER_LINES {
        return Err(AppError::validation(format!(
            "Order exceeds maximum of {MAX_ORDER_LINES} lines"
        )));
    }
    Ok(())
}

/// The catalog is authoritative. A client-echoed price that disagrees beyond
/// the money tolerance means the cart is stale; fail fast instead of silently
/// repricing.
fn check_submitted_price(
    submitted: Option<f64>,
    catalog_price: f64,
    what: &str,
) -> AppResult<()> {
    if let Some(submitted) = submitted
        && !money::amounts_match(submitted, catalog_price)?
    {
        return Err(AppError::validation(format!(
            "Submitted unit price {submitted} for {what} does not match catalog price {catalog_price}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{RideLineInput, StoreLineInput};
    use crate::db::test_util::memory_pool;

    async fn seed(pool: &SqlitePool) {
        sqlx::query(
            "INSERT INTO ride (id, name, capacity, ticket_price, status) VALUES \
             (1, 'Thunder Coaster', 24, 12.50, 'open'), \
             (2, 'Splash Canyon', 16, 9.75, 'closed'), \
             (3, 'Sky Drop', 12, 15.00, 'maintenance')",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO store (id, name, store_type, status, available_online) VALUES \
             (1, 'Gift Shop', 'merchandise', 'open', 1), \
             (2, 'Snack Bar', 'food_drink', 'open', 0), \
             (3, 'Outlet', 'merchandise', 'closed', 1)",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO item (id, name, price) VALUES \
             (7, 'Plush Dragon', 24.50), (8, 'Postcard Set', 5.25), (9, 'Lemonade', 3.00)",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO stock_record (store_id, item_id, stock_quantity) VALUES \
             (1, 7, 3), (1, 8, 10), (2, 9, 50)",
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn ride_line(ride_id: i64, quantity: i64) -> RideLineInput {
        RideLineInput {
            ride_id,
            quantity,
            unit_price: None,
        }
    }

    fn store_line(item_id: i64, quantity: i64) -> StoreLineInput {
        StoreLineInput {
            item_id,
            quantity,
            unit_price: None,
        }
    }

    fn store_req(lines: Vec<StoreLineInput>) -> StoreOrderCreate {
        StoreOrderCreate {
            customer_id: 42,
            channel: OrderChannel::InStore,
            payment_method: "tok_visa".into(),
            lines,
        }
    }

    async fn stock_of(pool: &SqlitePool, store_id: i64, item_id: i64) -> i64 {
        crate::db::repository::item::find_stock(pool, store_id, item_id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap();
        n
    }

    // ── Ride orders ─────────────────────────────────────────────────

    #[tokio::test]
    async fn test_ride_order_total_is_sum_of_subtotals() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let detail = place_ride_order(
            &pool,
            RideOrderCreate {
                customer_id: 42,
                lines: vec![ride_line(1, 3), ride_line(1, 1)],
            },
        )
        .await
        .unwrap();

        assert_eq!(detail.lines.len(), 2);
        assert_eq!(detail.lines[0].subtotal, 37.50);
        assert_eq!(detail.lines[1].subtotal, 12.50);
        assert_eq!(detail.order.total_amount, 50.00);

        // Readable back with the same lines
        let read = order_repo::find_ride_order(&pool, detail.order.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(read.lines.len(), 2);
        assert_eq!(read.order.total_amount, 50.00);
    }

    #[tokio::test]
    async fn test_ride_order_closed_ride_writes_nothing() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = place_ride_order(
            &pool,
            RideOrderCreate {
                customer_id: 42,
                lines: vec![ride_line(2, 1)],
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::FacilityUnavailable { .. }));
        assert_eq!(count(&pool, "ride_order").await, 0);
        assert_eq!(count(&pool, "ride_order_line").await, 0);
    }

    #[tokio::test]
    async fn test_ride_order_maintenance_ride_rejected() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = place_ride_order(
            &pool,
            RideOrderCreate {
                customer_id: 42,
                lines: vec![ride_line(1, 2), ride_line(3, 1)],
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::FacilityUnavailable { .. }));
        // All-or-nothing: the valid first line must not survive
        assert_eq!(count(&pool, "ride_order_line").await, 0);
    }

    #[tokio::test]
    async fn test_ride_order_unknown_ride() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = place_ride_order(
            &pool,
            RideOrderCreate {
                customer_id: 42,
                lines: vec![ride_line(99, 1)],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ride_order_stale_price_rejected() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = place_ride_order(
            &pool,
            RideOrderCreate {
                customer_id: 42,
                lines: vec![RideLineInput {
                    ride_id: 1,
                    quantity: 1,
                    unit_price: Some(9.99),
                }],
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(count(&pool, "ride_order").await, 0);
    }

    #[tokio::test]
    async fn test_ride_order_matching_price_accepted() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let detail = place_ride_order(
            &pool,
            RideOrderCreate {
                customer_id: 42,
                lines: vec![RideLineInput {
                    ride_id: 1,
                    quantity: 2,
                    unit_price: Some(12.50),
                }],
            },
        )
        .await
        .unwrap();
        assert_eq!(detail.order.total_amount, 25.00);
    }

    #[tokio::test]
    async fn test_ride_order_empty_cart_rejected() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = place_ride_order(
            &pool,
            RideOrderCreate {
                customer_id: 42,
                lines: vec![],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    // ── Store orders ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_store_order_decrements_stock() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let detail = place_store_order(&pool, 1, store_req(vec![store_line(7, 2), store_line(8, 1)]))
            .await
            .unwrap();

        assert_eq!(detail.order.total_amount, 54.25);
        assert_eq!(detail.lines.len(), 2);
        assert_eq!(stock_of(&pool, 1, 7).await, 1);
        assert_eq!(stock_of(&pool, 1, 8).await, 9);
    }

    #[tokio::test]
    async fn test_store_order_insufficient_stock_names_item() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = place_store_order(&pool, 1, store_req(vec![store_line(7, 4)]))
            .await
            .unwrap_err();

        match err {
            AppError::InsufficientStock {
                item_id,
                requested,
                available,
            } => {
                assert_eq!(item_id, 7);
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        assert_eq!(count(&pool, "store_order").await, 0);
        assert_eq!(stock_of(&pool, 1, 7).await, 3);
    }

    #[tokio::test]
    async fn test_store_order_partial_failure_rolls_back_all_lines() {
        let pool = memory_pool().await;
        seed(&pool).await;

        // First line would succeed; second is short. Nothing may stick.
        let err = place_store_order(&pool, 1, store_req(vec![store_line(8, 2), store_line(7, 4)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientStock { item_id: 7, .. }));
        assert_eq!(stock_of(&pool, 1, 8).await, 10);
        assert_eq!(stock_of(&pool, 1, 7).await, 3);
        assert_eq!(count(&pool, "store_order_line").await, 0);
    }

    #[tokio::test]
    async fn test_store_order_item_not_carried() {
        let pool = memory_pool().await;
        seed(&pool).await;

        // Item 9 exists in the catalog but the gift shop does not stock it
        let err = place_store_order(&pool, 1, store_req(vec![store_line(9, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ItemNotCarried { item_id: 9 }));
    }

    #[tokio::test]
    async fn test_store_order_unknown_item() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = place_store_order(&pool, 1, store_req(vec![store_line(99, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_store_order_closed_store_rejected() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = place_store_order(&pool, 3, store_req(vec![store_line(7, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::FacilityUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_store_order_online_gated_by_flag() {
        let pool = memory_pool().await;
        seed(&pool).await;

        // Snack bar is open but not available online
        let mut req = store_req(vec![store_line(9, 2)]);
        req.channel = OrderChannel::Online;
        let err = place_store_order(&pool, 2, req).await.unwrap_err();
        assert!(matches!(err, AppError::FacilityUnavailable { .. }));

        // Same cart in store is fine
        let detail = place_store_order(&pool, 2, store_req(vec![store_line(9, 2)]))
            .await
            .unwrap();
        assert_eq!(detail.order.total_amount, 6.00);
    }

    #[tokio::test]
    async fn test_store_order_stale_price_rejected() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let err = place_store_order(
            &pool,
            1,
            store_req(vec![StoreLineInput {
                item_id: 7,
                quantity: 1,
                unit_price: Some(19.99),
            }]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(stock_of(&pool, 1, 7).await, 3);
    }

    // ── Concurrency ─────────────────────────────────────────────────

    async fn file_pool(dir: &tempfile::TempDir) -> SqlitePool {
        let path = dir.path().join("orders.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        db.pool
    }

    #[tokio::test]
    async fn test_concurrent_last_unit_exactly_one_wins() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;
        seed(&pool).await;
        sqlx::query("UPDATE stock_record SET stock_quantity = 1 WHERE store_id = 1 AND item_id = 7")
            .execute(&pool)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                place_store_order(&pool, 1, store_req(vec![store_line(7, 1)])).await
            }));
        }

        let mut successes = 0;
        let mut shortfalls = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AppError::InsufficientStock { item_id: 7, .. }) => shortfalls += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(shortfalls, 3);
        assert_eq!(stock_of(&pool, 1, 7).await, 0);
        assert_eq!(count(&pool, "store_order").await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_two_carts_three_units() {
        let dir = tempfile::tempdir().unwrap();
        let pool = file_pool(&dir).await;
        seed(&pool).await;
        // stock_quantity = 3, both carts want 2: exactly one commits

        let a = {
            let pool = pool.clone();
            tokio::spawn(
                async move { place_store_order(&pool, 1, store_req(vec![store_line(7, 2)])).await },
            )
        };
        let b = {
            let pool = pool.clone();
            tokio::spawn(
                async move { place_store_order(&pool, 1, store_req(vec![store_line(7, 2)])).await },
            )
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);

        let loser = results.iter().find(|r| r.is_err()).unwrap();
        match loser.as_ref().unwrap_err() {
            AppError::InsufficientStock {
                item_id, available, ..
            } => {
                assert_eq!(*item_id, 7);
                // The loser runs after the winner committed
                assert_eq!(*available, 1);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&pool, 1, 7).await, 1);
    }
}
