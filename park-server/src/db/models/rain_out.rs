//! Rain-Out Models

use serde::{Deserialize, Serialize};

/// Rain-out lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RainOutStatus {
    Active,
    Cleared,
}

/// Declared weather disruption; at most one `active` event at a time,
/// and never more than one event per calendar date
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RainOutEvent {
    pub id: i64,
    /// YYYY-MM-DD
    pub rain_out_date: String,
    pub status: RainOutStatus,
    pub declared_by: i64,
    pub cleared_by: Option<i64>,
    pub note: Option<String>,
    pub resolved_at: Option<i64>,
    pub created_at: i64,
}

/// Declare-rain-out request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainOutDeclare {
    /// YYYY-MM-DD
    pub rain_out_date: String,
    pub employee_id: i64,
    pub note: Option<String>,
}

/// Clear-rain-out request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainOutClear {
    pub employee_id: i64,
    pub note: Option<String>,
}
