//! # Catalog
//!
//! Reference data the session engine prices against: the hourly rental
//! price table, the F&B menu, and the seed fleet and inventory the desk
//! opens with.
//!
//! ## Standard Price Table (Rupiah / hour)
//! ```text
//! ┌──────────┬────────┬────────┬────────┐
//! │  Floor   │  PS3   │  PS4   │  PS5   │
//! ├──────────┼────────┼────────┼────────┤
//! │ Reguler  │  8.000 │ 10.000 │ 15.000 │
//! │ VIP      │ 10.000 │ 12.000 │ 18.000 │
//! └──────────┴────────┴────────┴────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Console, ConsoleStatus, ConsoleType, Floor, InventoryItem, MenuItem};

// =============================================================================
// Price Table
// =============================================================================

/// One row of the price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceEntry {
    pub floor: Floor,
    pub console_type: ConsoleType,
    pub price_per_hour: Money,
}

/// Hourly rental prices keyed by (floor, console type).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceTable {
    entries: Vec<PriceEntry>,
}

impl PriceTable {
    /// The price table the desk opens with.
    pub fn standard() -> Self {
        let mut table = PriceTable::default();
        for (floor, prices) in [
            (Floor::Reguler, [8_000, 10_000, 15_000]),
            (Floor::Vip, [10_000, 12_000, 18_000]),
        ] {
            for (console_type, price) in ConsoleType::ALL.into_iter().zip(prices) {
                table.set(floor, console_type, Money::from_rupiah(price));
            }
        }
        table
    }

    /// Sets (or replaces) a price. Sessions already running keep the price
    /// they started with.
    pub fn set(&mut self, floor: Floor, console_type: ConsoleType, price_per_hour: Money) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.floor == floor && e.console_type == console_type)
        {
            Some(entry) => entry.price_per_hour = price_per_hour,
            None => self.entries.push(PriceEntry {
                floor,
                console_type,
                price_per_hour,
            }),
        }
    }

    /// Hourly price for a floor / console type.
    pub fn price_per_hour(&self, floor: Floor, console_type: ConsoleType) -> CoreResult<Money> {
        self.entries
            .iter()
            .find(|e| e.floor == floor && e.console_type == console_type)
            .map(|e| e.price_per_hour)
            .ok_or(CoreError::PriceNotConfigured {
                floor,
                console_type,
            })
    }

    pub fn entries(&self) -> &[PriceEntry] {
        &self.entries
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Price table plus the orderable menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub prices: PriceTable,
    pub menu: Vec<MenuItem>,
}

impl Catalog {
    /// Standard prices, menu derived from the standard inventory.
    pub fn standard() -> Self {
        Catalog {
            prices: PriceTable::standard(),
            menu: standard_inventory().iter().map(InventoryItem::menu_item).collect(),
        }
    }

    /// Hourly price for a console.
    #[inline]
    pub fn price_for(&self, console: &Console) -> CoreResult<Money> {
        self.prices.price_per_hour(console.floor, console.console_type)
    }

    /// Looks up a menu item by id.
    pub fn menu_item(&self, id: &str) -> CoreResult<&MenuItem> {
        self.menu
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CoreError::MenuItemNotFound(id.to_string()))
    }
}

// =============================================================================
// Seed Data
// =============================================================================

/// Opening stock: (id, name, price, stock, min stock).
const STANDARD_INVENTORY: &[(&str, &str, i64, i64, i64)] = &[
    ("fb1", "Chitato", 8_000, 100, 20),
    ("fb2", "Indomie Tante", 10_000, 50, 10),
    ("fb3", "Indomie Telur", 13_000, 50, 10),
    ("fb4", "Roti Bakar", 12_000, 30, 5),
    ("fb5", "Es Teh", 5_000, 200, 50),
    ("fb6", "Es Kopi", 8_000, 150, 30),
    ("fb7", "Air Es", 2_000, 300, 50),
];

/// The F&B inventory the desk opens with.
pub fn standard_inventory() -> Vec<InventoryItem> {
    STANDARD_INVENTORY
        .iter()
        .map(|&(id, name, price, stock, min_stock)| InventoryItem {
            id: id.to_string(),
            name: name.to_string(),
            stock,
            min_stock,
            price: Money::from_rupiah(price),
        })
        .collect()
}

/// Units per (floor, type), in the order ids are assigned.
const STANDARD_FLEET: &[(Floor, ConsoleType, u32)] = &[
    (Floor::Reguler, ConsoleType::Ps5, 7),
    (Floor::Reguler, ConsoleType::Ps4, 10),
    (Floor::Reguler, ConsoleType::Ps3, 10),
    (Floor::Vip, ConsoleType::Ps5, 7),
    (Floor::Vip, ConsoleType::Ps4, 9),
    (Floor::Vip, ConsoleType::Ps3, 6),
];

/// The fixed 49-unit fleet. Ids run from 1; `R-PS4-10` starts in
/// maintenance.
pub fn standard_fleet() -> Vec<Console> {
    let mut consoles = Vec::new();
    let mut next_id = 1;

    for &(floor, console_type, count) in STANDARD_FLEET {
        for n in 1..=count {
            let name = format!("{}-{}-{}", floor.prefix(), console_type.label(), n);
            let mut console = Console::new(next_id, name, console_type, floor);
            if floor == Floor::Reguler && console_type == ConsoleType::Ps4 && n == 10 {
                console.status = ConsoleStatus::Maintenance;
            }
            consoles.push(console);
            next_id += 1;
        }
    }

    consoles
}

// =============================================================================
// Unit Tests
// =============================================================================
