//! Facility Models — rides and stores
//!
//! A Facility's `status` gates order placement; rides carry the full
//! availability lifecycle, stores a simpler admin-settable enum plus the
//! `available_online` flag.

use serde::{Deserialize, Serialize};

/// Ride availability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RideStatus {
    Open,
    Closed,
    Maintenance,
    PendingExpandRequest,
    ApproveExpand,
    RejectExpand,
}

impl RideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatus::Open => "open",
            RideStatus::Closed => "closed",
            RideStatus::Maintenance => "maintenance",
            RideStatus::PendingExpandRequest => "pending_expand_request",
            RideStatus::ApproveExpand => "approve_expand",
            RideStatus::RejectExpand => "reject_expand",
        }
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ride entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ride {
    pub id: i64,
    pub name: String,
    pub capacity: i64,
    pub ticket_price: f64,
    pub status: RideStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create ride payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideCreate {
    pub name: String,
    pub capacity: i64,
    pub ticket_price: f64,
}

/// Store operational state (admin-settable, no transition table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum StoreStatus {
    Open,
    Closed,
    Maintenance,
}

impl StoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Open => "open",
            StoreStatus::Closed => "closed",
            StoreStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store category; drives the `available_online` default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum StoreType {
    Merchandise,
    FoodDrink,
}

impl StoreType {
    /// Merchandise sells online by default; food and drink is pickup-only.
    pub fn default_available_online(&self) -> bool {
        matches!(self, StoreType::Merchandise)
    }
}

/// Store entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub store_type: StoreType,
    pub status: StoreStatus,
    pub available_online: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub name: String,
    pub store_type: StoreType,
    /// Overrides the store-type default when present
    pub available_online: Option<bool>,
}
