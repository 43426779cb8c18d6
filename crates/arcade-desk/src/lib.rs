//! # arcade-desk: Rental Desk Runtime
//!
//! Owns the mutable state of a console rental desk and drives it from a
//! single task: the console fleet, F&B stock, the transaction log and the
//! customer directory, plus the 1 Hz countdown clock.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        arcade-desk                                      │
//! │                                                                         │
//! │   presentation ── DeskHandle ──► DeskActor ──► RentalDesk               │
//! │        ▲                             │             │                    │
//! │        │                             │             ├── ConsoleRegistry  │
//! │        └──── broadcast<DeskEvent> ◄──┘             ├── InventoryLedger  │
//! │                                                    ├── TransactionLog   │
//! │                                                    └── CustomerDirectory│
//! │                                                                         │
//! │   Every rule lives in arcade-core; this crate sequences and stores.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`desk`] - The aggregate root and its events
//! - [`actor`] - Single-task runtime and the cloneable handle
//! - [`state`] - Registry, inventory ledger, transaction log, customers
//! - [`clock`] - System and manual clocks
//! - [`config`] - `desk.toml` + `ARCADE_*` configuration
//! - [`error`] - Runtime errors and the API error shape

use tracing_subscriber::EnvFilter;

pub mod actor;
pub mod clock;
pub mod config;
pub mod desk;
pub mod error;
pub mod state;

pub use actor::{DeskActor, DeskHandle};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, DeskConfig, IdStrategy};
pub use desk::{DeskEvent, RentalDesk};
pub use error::{ApiError, DeskError, DeskResult, ErrorCode};
pub use state::{ConsoleView, RevenueSummary};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - ERROR: Failures that reached the API boundary
/// - WARN: Stock shortfalls, low stock, bad config values
/// - INFO: Session lifecycle, settlements, startup/shutdown
/// - DEBUG: Ticks, order line edits
///
/// Override with `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,arcade=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
