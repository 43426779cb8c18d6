//! # arcade-core: Pure Business Logic for the Rental Desk
//!
//! This crate holds the session & billing engine: the state machine that
//! takes a console from idle, through a timed rental with food & beverage
//! orders, to a settled [`Transaction`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Arcade Desk Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (external)                         │   │
//! │  │    Console cards ──► Start modal ──► Manage modal ──► Reports   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ intents                                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            arcade-desk (actor, registry, ledger, log)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ arcade-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  session  │  │  billing  │  │   │
//! │  │   │  Console  │  │   Money   │  │  Session  │  │  Billing  │  │   │
//! │  │   │Transaction│  │  Rupiah   │  │ OrderItem │  │ overtime  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK READS • NO TASKS • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Console, Customer, InventoryItem, Transaction)
//! - [`money`] - Integer Rupiah amounts
//! - [`time`] - Rental durations, countdown formatting
//! - [`catalog`] - Price table, menu, the standard fleet
//! - [`session`] - Session lifecycle: start, extend, orders, settle
//! - [`billing`] - Overtime and total computation
//! - [`ids`] - Injected id generation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use arcade_core::catalog::{standard_fleet, Catalog};
//! use arcade_core::session::Session;
//! use arcade_core::time::RentalHours;
//! use chrono::Utc;
//!
//! let catalog = Catalog::standard();
//! let fleet = standard_fleet();
//! let now = Utc::now();
//!
//! // R-PS5-1 on the Reguler floor rents for Rp 15.000 per hour
//! let session = Session::start(
//!     || "S1".to_string(),
//!     &fleet[0],
//!     "C1",
//!     RentalHours::from_whole_hours(2).unwrap(),
//!     &catalog,
//!     now,
//! )
//! .unwrap();
//! assert_eq!(session.rental_cost.rupiah(), 30_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod money;
pub mod session;
pub mod time;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::Billing;
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use session::Session;
pub use time::RentalHours;
pub use types::*;
