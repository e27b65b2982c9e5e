//! Core module - configuration and shared state

mod config;
mod state;

pub use config::Config;
pub use state::AppState;
