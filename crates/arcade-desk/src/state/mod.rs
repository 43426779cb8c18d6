//! # State Module
//!
//! The stores the rental desk is made of. Each one owns a single kind of
//! record and enforces that record's rules; [`crate::desk::RentalDesk`]
//! composes them and is the only writer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 RentalDesk (aggregate root)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │        │                  │                  │                │         │
//! │        ▼                  ▼                  ▼                ▼         │
//! │  ┌────────────┐   ┌──────────────┐   ┌──────────────┐  ┌────────────┐  │
//! │  │ Console    │   │ Inventory    │   │ Transaction  │  │ Customer   │  │
//! │  │ Registry   │   │ Ledger       │   │ Log          │  │ Directory  │  │
//! │  │            │   │              │   │              │  │            │  │
//! │  │ status +   │   │ stock,       │   │ append-only  │  │ walk-ins   │  │
//! │  │ session    │   │ min stock    │   │              │  │            │  │
//! │  └────────────┘   └──────────────┘   └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • None of these types lock. The desk actor task owns all of them.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod customers;
mod inventory;
mod registry;
mod transactions;

pub use customers::CustomerDirectory;
pub use inventory::{InventoryLedger, StockChange};
pub use registry::{ConsoleRegistry, ConsoleView};
pub use transactions::{summarize, RevenueSummary, TransactionLog};
