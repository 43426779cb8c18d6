//! # Domain Types
//!
//! Core domain types used throughout the rental desk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Console      │   │    Session      │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u32)       │──►│  id             │──►│  id             │       │
//! │  │  name R-PS5-1   │   │  customer_id    │   │  session_id     │       │
//! │  │  floor / type   │   │  duration       │   │  rental_cost    │       │
//! │  │  status         │   │  orders         │   │  total_cost     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ConsoleStatus  │   │    MenuItem     │   │ InventoryItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Available      │   │  id, name       │   │  stock          │       │
//! │  │  InUse          │   │  price          │   │  min_stock      │       │
//! │  │  Maintenance    │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::session::Session;

// =============================================================================
// Console Classification
// =============================================================================

/// Hardware tier of a console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ConsoleType {
    #[serde(rename = "PS3")]
    Ps3,
    #[serde(rename = "PS4")]
    Ps4,
    #[serde(rename = "PS5")]
    Ps5,
}

impl ConsoleType {
    pub const ALL: [ConsoleType; 3] = [ConsoleType::Ps3, ConsoleType::Ps4, ConsoleType::Ps5];

    pub fn label(&self) -> &'static str {
        match self {
            ConsoleType::Ps3 => "PS3",
            ConsoleType::Ps4 => "PS4",
            ConsoleType::Ps5 => "PS5",
        }
    }
}

/// Pricing segment. Each floor has its own price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Floor {
    Reguler,
    #[serde(rename = "VIP")]
    Vip,
}

impl Floor {
    pub const ALL: [Floor; 2] = [Floor::Reguler, Floor::Vip];

    /// Prefix used in console names: `R-PS5-1`, `V-PS3-2`.
    pub fn prefix(&self) -> char {
        match self {
            Floor::Reguler => 'R',
            Floor::Vip => 'V',
        }
    }
}

/// Console availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ConsoleStatus {
    /// Free to rent.
    Available,
    /// Holds exactly one session.
    #[serde(rename = "In Use")]
    InUse,
    /// Out of service; not eligible for rental.
    Maintenance,
}

impl Default for ConsoleStatus {
    fn default() -> Self {
        ConsoleStatus::Available
    }
}

// =============================================================================
// Console
// =============================================================================

/// A physical unit in the fleet.
///
/// ## Invariant
/// `session.is_some()` if and only if `status == InUse`. Only the console
/// registry writes this struct, and it enforces the invariant on every
/// transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Console {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub console_type: ConsoleType,
    pub floor: Floor,
    pub status: ConsoleStatus,
    pub session: Option<Session>,
}

impl Console {
    /// A new idle console.
    pub fn new(id: u32, name: impl Into<String>, console_type: ConsoleType, floor: Floor) -> Self {
        Console {
            id,
            name: name.into(),
            console_type,
            floor,
            status: ConsoleStatus::Available,
            session: None,
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == ConsoleStatus::Available
    }

    #[inline]
    pub fn is_in_use(&self) -> bool {
        self.status == ConsoleStatus::InUse
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Membership tier recorded on the customer card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Membership {
    #[default]
    Regular,
    #[serde(rename = "VIP")]
    Vip,
}

/// A walk-in customer. Sessions only hold the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    /// Photo of the identity card (KTP) left as deposit.
    pub ktp_photo_url: Option<String>,
    pub membership: Membership,
}

/// Input for registering a customer; the directory assigns the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub ktp_photo_url: Option<String>,
    pub membership: Membership,
}

// =============================================================================
// Menu & Orders
// =============================================================================

/// A food or beverage item on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Money,
}

/// An order line on a session.
///
/// Snapshot of the menu item at the moment it was first ordered, so later
/// menu edits do not rewrite an open bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Always >= 1; removing a line deletes it outright.
    pub quantity: i64,
}

impl OrderItem {
    /// First unit of `item`.
    pub fn from_menu_item(item: &MenuItem) -> Self {
        OrderItem {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: 1,
        }
    }

    /// `price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// A stocked F&B item.
///
/// `stock` is only consumed at settlement and may go negative under the
/// default stock policy. `min_stock` drives the low-stock indicator only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub min_stock: i64,
    pub price: Money,
}

impl InventoryItem {
    /// Low-stock indicator: at or below the threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// The menu entry for this item.
    pub fn menu_item(&self) -> MenuItem {
        MenuItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// What a transaction was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TransactionKind {
    /// A console rental, with any F&B ordered during it.
    Rental,
    /// Standalone F&B sale. Reserved; the session engine never produces it.
    #[serde(rename = "F&B")]
    FoodAndBeverage,
}

/// Immutable record of one settled session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub session_id: String,
    pub console_id: u32,
    pub console_name: String,
    pub customer_id: String,
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,
    #[ts(as = "String")]
    pub end_time: DateTime<Utc>,
    /// Committed rental plus overtime.
    pub rental_cost: Money,
    pub food_and_beverage_cost: Money,
    pub total_cost: Money,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_status_default() {
        assert_eq!(ConsoleStatus::default(), ConsoleStatus::Available);
    }

    #[test]
    fn test_status_serializes_like_the_frontend_expects() {
        assert_eq!(
            serde_json::to_string(&ConsoleStatus::InUse).unwrap(),
            "\"In Use\""
        );
        assert_eq!(serde_json::to_string(&Floor::Vip).unwrap(), "\"VIP\"");
        assert_eq!(serde_json::to_string(&ConsoleType::Ps5).unwrap(), "\"PS5\"");
        assert_eq!(
            serde_json::to_string(&TransactionKind::FoodAndBeverage).unwrap(),
            "\"F&B\""
        );
    }

    #[test]
    fn test_order_line_total() {
        let line = OrderItem {
            id: "fb5".to_string(),
            name: "Es Teh".to_string(),
            price: Money::from_rupiah(5_000),
            quantity: 3,
        };
        assert_eq!(line.line_total().rupiah(), 15_000);
    }

    #[test]
    fn test_low_stock_indicator() {
        let mut item = InventoryItem {
            id: "fb4".to_string(),
            name: "Roti Bakar".to_string(),
            stock: 6,
            min_stock: 5,
            price: Money::from_rupiah(12_000),
        };
        assert!(!item.is_low_stock());
        item.stock = 5;
        assert!(item.is_low_stock());
        item.stock = -2;
        assert!(item.is_low_stock());
    }

    #[test]
    fn test_console_serializes_type_field() {
        let console = Console::new(1, "R-PS5-1", ConsoleType::Ps5, Floor::Reguler);
        let json = serde_json::to_value(&console).unwrap();
        assert_eq!(json["type"], "PS5");
        assert_eq!(json["status"], "Available");
        assert!(json["session"].is_null());
    }
}
