//! Order placement and money arithmetic.

pub mod coordinator;
pub mod money;

pub use coordinator::{place_ride_order, place_store_order};
