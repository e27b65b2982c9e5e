//! park-server — theme-park operations backend
//!
//! Order fulfillment and facility availability engine: ride-ticket and
//! merchandise orders committed atomically against shared stock and facility
//! state, a ride availability state machine, maintenance scheduling and
//! park-wide rain-out handling.
//!
//! # Module structure
//!
//! ```text
//! park-server/src/
//! ├── core/          # Configuration, shared state
//! ├── db/            # SQLite pool, migrations, models, repositories
//! ├── availability/  # Ride availability state machine
//! ├── stock/         # Per-store stock ledger
//! ├── orders/        # Order fulfillment coordinator, money arithmetic
//! ├── maintenance/   # Maintenance jobs and crew assignments
//! ├── rainout/       # Rain-out declare/clear cascades
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Errors, logging, validation, time
//! ```

pub mod api;
pub mod availability;
pub mod core;
pub mod db;
pub mod maintenance;
pub mod orders;
pub mod rainout;
pub mod stock;
pub mod utils;

pub use crate::core::{AppState, Config};
pub use utils::{AppError, AppResponse, AppResult};
