//! Unified error handling
//!
//! Application error type and response envelope:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! # Error code table
//!
//! | Code  | Meaning |
//! |-------|---------|
//! | E0000 | Success |
//! | E0002 | Validation failed |
//! | E0003 | Resource not found |
//! | E0004 | Conflict |
//! | E1001 | Facility unavailable |
//! | E1002 | Insufficient stock |
//! | E1003 | Item not carried |
//! | E1004 | Invalid availability transition |
//! | E9001 | Internal error |
//! | E9002 | Database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// API response envelope
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code (E0000 means success)
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Response payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
///
/// Every variant except `Database`/`Internal` is an expected, caller-recoverable
/// condition and carries the offending identifier in its message and detail
/// payload. `Database`/`Internal` are logged server-side and returned opaque.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Facility {facility} is not open for orders")]
    FacilityUnavailable { facility: String },

    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: i64,
        requested: i64,
        available: i64,
    },

    #[error("Item {item_id} is not carried by this store")]
    ItemNotCarried { item_id: i64 },

    #[error("Invalid availability transition: {from} -> {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Machine-readable detail payload for engine errors, so clients can fix
    /// the offending cart line without parsing the message text.
    fn detail(&self) -> Option<serde_json::Value> {
        match self {
            AppError::FacilityUnavailable { facility } => {
                Some(serde_json::json!({ "facility": facility }))
            }
            AppError::InsufficientStock {
                item_id,
                requested,
                available,
            } => Some(serde_json::json!({
                "item_id": item_id,
                "requested": requested,
                "available": available,
            })),
            AppError::ItemNotCarried { item_id } => Some(serde_json::json!({ "item_id": item_id })),
            AppError::InvalidTransition { from, event } => {
                Some(serde_json::json!({ "from": from, "event": event }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "E0003"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "E0004"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "E0002"),
            AppError::FacilityUnavailable { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "E1001"),
            AppError::InsufficientStock { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "E1002"),
            AppError::ItemNotCarried { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "E1003"),
            AppError::InvalidTransition { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "E1004"),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9001")
            }
        };

        // 5xx responses never leak the underlying message
        let message = match &self {
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(AppResponse {
            code: code.to_string(),
            message,
            data: self.detail(),
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}
