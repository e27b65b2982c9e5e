//! Utilities - shared helpers and types
//!
//! - [`AppError`] / [`AppResponse`] - error type and response envelope
//! - [`time`] - Unix-millis helpers and date parsing
//! - [`validation`] - input length/bound checks
//! - [`logger`] - tracing setup

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult, ok};
