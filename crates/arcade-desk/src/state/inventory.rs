//! # Inventory Ledger
//!
//! F&B stock levels. Stock is consumed only when a session settles; ordering
//! does not reserve anything.
//!
//! ## Stock Policy
//! ```text
//! allow_negative_stock = true  (default)   stock 1, consume 3 → stock -2
//! allow_negative_stock = false             stock 1, consume 3 → stock  0,
//!                                          shortfall 2 reported
//! ```
//! Either way the decrement succeeds; settlement is never blocked by stock.

use serde::Serialize;

use arcade_core::catalog::standard_inventory;
use arcade_core::error::{CoreError, CoreResult, ValidationError};
use arcade_core::validation::validate_stock_level;
use arcade_core::InventoryItem;

/// Outcome of one decrement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockChange {
    pub item_id: String,
    pub before: i64,
    pub after: i64,
    /// Units that could not be covered. Always 0 under the default policy.
    pub shortfall: i64,
    /// This change took the item to or below its minimum.
    pub became_low: bool,
}

impl StockChange {
    /// The shortfall as an error value, for reporting.
    pub fn shortfall_error(&self) -> Option<CoreError> {
        (self.shortfall > 0).then(|| CoreError::InsufficientStock {
            item_id: self.item_id.clone(),
            available: self.before.max(0),
            requested: self.before.max(0) + self.shortfall,
        })
    }
}

#[derive(Debug, Clone)]
pub struct InventoryLedger {
    items: Vec<InventoryItem>,
    allow_negative_stock: bool,
}

impl InventoryLedger {
    pub fn new(items: Vec<InventoryItem>, allow_negative_stock: bool) -> Self {
        InventoryLedger {
            items,
            allow_negative_stock,
        }
    }

    /// The standard opening stock.
    pub fn standard(allow_negative_stock: bool) -> Self {
        Self::new(standard_inventory(), allow_negative_stock)
    }

    pub fn get(&self, id: &str) -> CoreResult<&InventoryItem> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::InventoryItemNotFound(id.to_string()))
    }

    pub fn list(&self) -> &[InventoryItem] {
        &self.items
    }

    /// Items at or below their minimum.
    pub fn low_stock(&self) -> Vec<&InventoryItem> {
        self.items.iter().filter(|i| i.is_low_stock()).collect()
    }

    /// Sets the absolute stock level (restocking or a stock count).
    pub fn update_stock(&mut self, id: &str, stock: i64) -> CoreResult<&InventoryItem> {
        validate_stock_level(stock)?;
        let item = self.get_mut(id)?;
        item.stock = stock;
        Ok(item)
    }

    /// Consumes `quantity` units at settlement.
    pub fn decrement(&mut self, id: &str, quantity: i64) -> CoreResult<StockChange> {
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        let allow_negative = self.allow_negative_stock;
        let item = self.get_mut(id)?;
        let before = item.stock;
        let was_low = item.is_low_stock();

        let wanted = before - quantity;
        let (after, shortfall) = if allow_negative || wanted >= 0 {
            (wanted, 0)
        } else {
            (0, quantity - before.max(0))
        };
        item.stock = after;

        Ok(StockChange {
            item_id: item.id.clone(),
            before,
            after,
            shortfall,
            became_low: !was_low && item.is_low_stock(),
        })
    }

    fn get_mut(&mut self, id: &str) -> CoreResult<&mut InventoryItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::InventoryItemNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrement_goes_negative_by_default() {
        let mut ledger = InventoryLedger::standard(true);
        ledger.update_stock("fb4", 1).unwrap();

        let change = ledger.decrement("fb4", 3).unwrap();
        assert_eq!(change.before, 1);
        assert_eq!(change.after, -2);
        assert_eq!(change.shortfall, 0);
        assert!(change.shortfall_error().is_none());
        assert_eq!(ledger.get("fb4").unwrap().stock, -2);
    }

    #[test]
    fn test_strict_policy_clamps_and_reports() {
        let mut ledger = InventoryLedger::standard(false);
        ledger.update_stock("fb4", 1).unwrap();

        let change = ledger.decrement("fb4", 3).unwrap();
        assert_eq!(change.after, 0);
        assert_eq!(change.shortfall, 2);
        match change.shortfall_error() {
            Some(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 1);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected {:?}", other),
        }

        // already empty: the whole quantity is short
        let change = ledger.decrement("fb4", 2).unwrap();
        assert_eq!(change.after, 0);
        assert_eq!(change.shortfall, 2);
    }

    #[test]
    fn test_low_stock_crossing() {
        let mut ledger = InventoryLedger::standard(true);
        // Roti Bakar: stock 30, min 5
        ledger.update_stock("fb4", 6).unwrap();
        assert!(ledger.low_stock().is_empty());

        let change = ledger.decrement("fb4", 1).unwrap();
        assert!(change.became_low);
        let change = ledger.decrement("fb4", 1).unwrap();
        assert!(!change.became_low, "already low");

        let low: Vec<_> = ledger.low_stock().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(low, vec!["fb4"]);
    }

    #[test]
    fn test_update_stock_validates() {
        let mut ledger = InventoryLedger::standard(true);
        assert!(ledger.update_stock("fb1", -1).is_err());
        assert!(matches!(
            ledger.update_stock("nope", 5),
            Err(CoreError::InventoryItemNotFound(_))
        ));
        assert_eq!(ledger.update_stock("fb1", 250).unwrap().stock, 250);
    }

    #[test]
    fn test_unknown_item_and_bad_quantity() {
        let mut ledger = InventoryLedger::standard(true);
        assert!(ledger.decrement("fb99", 1).is_err());
        assert!(ledger.decrement("fb1", 0).is_err());
        assert_eq!(ledger.get("fb1").unwrap().stock, 100);
    }
}
