//! Catalog and Stock Ledger Models

use serde::{Deserialize, Serialize};

/// Merchandise catalog item; `price` is the authoritative unit price
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create catalog item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub price: f64,
}

/// Per-(store, item) quantity on hand; never negative
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockRecord {
    pub store_id: i64,
    pub item_id: i64,
    pub stock_quantity: i64,
    pub updated_at: i64,
}
