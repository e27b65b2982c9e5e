//! Data models
//!
//! serde + `sqlx::FromRow` structs and TEXT-backed enum types.

pub mod employee;
pub mod facility;
pub mod maintenance;
pub mod order;
pub mod rain_out;
pub mod stock;

pub use employee::{Employee, EmployeeCreate};
pub use facility::{Ride, RideCreate, RideStatus, Store, StoreCreate, StoreStatus, StoreType};
pub use maintenance::{
    AssignmentCreate, EmployeeAssignment, MaintenanceCreate, MaintenanceJob, MaintenanceStatus,
};
pub use order::{
    OrderChannel, OrderStatus, RideLineInput, RideOrder, RideOrderCreate, RideOrderDetail,
    RideOrderLine, StoreLineInput, StoreOrder, StoreOrderCreate, StoreOrderDetail, StoreOrderLine,
};
pub use rain_out::{RainOutClear, RainOutDeclare, RainOutEvent, RainOutStatus};
pub use stock::{CatalogItem, ItemCreate, StockRecord};
