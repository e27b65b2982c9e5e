//! Order Models
//!
//! Orders are created `completed` in one atomic commit; there is no
//! partial/pending state. Headers and lines are immutable once committed.

use serde::{Deserialize, Serialize};

/// Order lifecycle; a committed order is already terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum OrderStatus {
    Completed,
}

/// Sales channel for store orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum OrderChannel {
    InStore,
    Online,
}

impl Default for OrderChannel {
    fn default() -> Self {
        OrderChannel::InStore
    }
}

// ── Ride orders ─────────────────────────────────────────────────────

/// Committed ride-ticket order header
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RideOrder {
    pub id: i64,
    pub customer_id: i64,
    pub order_date: i64,
    pub total_amount: f64,
    pub status: OrderStatus,
}

/// One ride-ticket line within a committed order
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RideOrderLine {
    pub id: i64,
    pub order_id: i64,
    pub ride_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Ride-order cart line as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideLineInput {
    pub ride_id: i64,
    pub quantity: i64,
    /// Optional client-echoed price; checked against the catalog, never trusted
    pub unit_price: Option<f64>,
}

/// Place-ride-order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideOrderCreate {
    pub customer_id: i64,
    pub lines: Vec<RideLineInput>,
}

/// Committed ride order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideOrderDetail {
    pub order: RideOrder,
    pub lines: Vec<RideOrderLine>,
}

// ── Store orders ────────────────────────────────────────────────────

/// Committed merchandise order header
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoreOrder {
    pub id: i64,
    pub customer_id: i64,
    pub store_id: i64,
    pub channel: OrderChannel,
    pub payment_method: String,
    pub order_date: i64,
    pub total_amount: f64,
    pub status: OrderStatus,
}

/// One merchandise line within a committed order
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoreOrderLine {
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Store-order cart line as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreLineInput {
    pub item_id: i64,
    pub quantity: i64,
    /// Optional client-echoed price; checked against the catalog, never trusted
    pub unit_price: Option<f64>,
}

/// Place-store-order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOrderCreate {
    pub customer_id: i64,
    #[serde(default)]
    pub channel: OrderChannel,
    /// Opaque payment-method token; capture is out of scope
    pub payment_method: String,
    pub lines: Vec<StoreLineInput>,
}

/// Committed store order with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOrderDetail {
    pub order: StoreOrder,
    pub lines: Vec<StoreOrderLine>,
}
