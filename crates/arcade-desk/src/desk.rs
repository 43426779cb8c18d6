//! # Rental Desk
//!
//! The aggregate root. Every user intent and every clock tick ends up as one
//! method call on [`RentalDesk`], which validates against the catalog and
//! the stores, delegates the arithmetic to [`arcade_core::Session`], and
//! writes the result back.
//!
//! ## Settlement Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    end_session("S1")                                    │
//! │                                                                         │
//! │  1. Lookup    registry.find_by_session ──► SessionNotActive if absent   │
//! │                                                                         │
//! │  2. Settle    Session::settle(now) ──► (finished, Transaction)          │
//! │               rental' = rental + overtime                               │
//! │                                                                         │
//! │  3. Record    log.append(tx) ──► AlreadySettled if repeated             │
//! │                                                                         │
//! │  4. Release   registry.detach(console, "S1") ──► Available              │
//! │                                                                         │
//! │  5. Consume   ledger.decrement(item, qty) for each order line           │
//! │               shortfall / low stock ──► warn! + event                   │
//! │                                                                         │
//! │  Steps 1-2 fail without side effects. Steps 3-5 cannot fail once        │
//! │  step 2 succeeded against the same console.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Events
//! Every change queues a [`DeskEvent`]. The actor drains them after each
//! command or tick and broadcasts them in order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use arcade_core::catalog::Catalog;
use arcade_core::error::{CoreError, CoreResult};
use arcade_core::ids::{IdGenerator, IdKind};
use arcade_core::{
    Billing, Console, ConsoleStatus, Customer, Floor, InventoryItem, NewCustomer, RentalHours,
    Session, Transaction,
};

use crate::clock::Clock;
use crate::config::DeskConfig;
use crate::state::{
    ConsoleRegistry, ConsoleView, CustomerDirectory, InventoryLedger, RevenueSummary,
    TransactionLog,
};

// =============================================================================
// Events
// =============================================================================

/// Something observers of the desk should re-render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum DeskEvent {
    /// A console's view changed: session started, edited, ended, or ticked.
    ConsoleUpdated(ConsoleView),

    SessionSettled(Transaction),

    /// Settlement consumed more than was in stock (strict policy only).
    StockShortfall {
        item_id: String,
        available: i64,
        requested: i64,
    },

    /// An item just crossed its minimum.
    LowStock(InventoryItem),
}

// =============================================================================
// Rental Desk
// =============================================================================

/// Owns the whole desk state. Not shared; see [`crate::actor`].
pub struct RentalDesk {
    registry: ConsoleRegistry,
    inventory: InventoryLedger,
    transactions: TransactionLog,
    customers: CustomerDirectory,
    catalog: Catalog,
    clock: Arc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    low_time_ms: i64,
    events: Vec<DeskEvent>,
}

impl RentalDesk {
    /// A desk with explicit parts.
    pub fn new(
        registry: ConsoleRegistry,
        inventory: InventoryLedger,
        catalog: Catalog,
        clock: Arc<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        RentalDesk {
            registry,
            inventory,
            transactions: TransactionLog::new(),
            customers: CustomerDirectory::new(),
            catalog,
            clock,
            ids,
            low_time_ms: DeskConfig::default().low_time_warning_ms(),
            events: Vec::new(),
        }
    }

    /// The standard fleet, catalog and opening stock, with `config` policies.
    pub fn from_config(config: &DeskConfig, clock: Arc<dyn Clock>) -> Self {
        let mut desk = Self::new(
            ConsoleRegistry::standard(),
            InventoryLedger::standard(config.billing.allow_negative_stock),
            Catalog::standard(),
            clock,
            config.id_generator(),
        );
        desk.low_time_ms = config.low_time_warning_ms();
        desk
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Starts a rental on an available console for a registered customer.
    pub fn start_session(
        &mut self,
        console_id: u32,
        customer_id: &str,
        duration_hours: f64,
    ) -> CoreResult<Session> {
        let duration = RentalHours::from_hours(duration_hours)?;
        let console = self.registry.get(console_id)?;
        self.customers.get(customer_id)?;

        let now = self.clock.now();
        let session = Session::start(
            || self.ids.next_id(IdKind::Session),
            console,
            customer_id,
            duration,
            &self.catalog,
            now,
        )?;
        self.registry.attach(session.clone())?;

        info!(
            session_id = %session.id,
            console = console_id,
            customer = customer_id,
            hours = duration.hours(),
            rental_cost = %session.rental_cost,
            "Session started"
        );
        self.publish_console(console_id, now)?;
        Ok(session)
    }

    /// Buys more time at the price the session started with.
    pub fn extend_session(&mut self, session_id: &str, additional_hours: f64) -> CoreResult<Session> {
        let additional = RentalHours::from_hours(additional_hours)?;
        let next = self.active(session_id)?.extend(additional)?;
        self.commit(next, |s| {
            info!(session_id = %s.id, duration_secs = s.duration, rental_cost = %s.rental_cost, "Session extended")
        })
    }

    /// One more unit of a menu item on the session's bill.
    pub fn add_order_line(&mut self, session_id: &str, menu_item_id: &str) -> CoreResult<Session> {
        let item = self.catalog.menu_item(menu_item_id)?.clone();
        let next = self.active(session_id)?.add_order(&item)?;
        self.commit(next, |s| {
            debug!(session_id = %s.id, item = %item.id, fnb = %s.food_and_beverage_cost(), "Order line added")
        })
    }

    /// Drops a whole order line. Unknown item ids change nothing.
    pub fn remove_order_line(&mut self, session_id: &str, menu_item_id: &str) -> CoreResult<Session> {
        let current = self.active(session_id)?;
        let next = current.remove_order(menu_item_id)?;
        if next.version == current.version {
            return Ok(next);
        }
        self.commit(next, |s| {
            debug!(session_id = %s.id, item = menu_item_id, "Order line removed")
        })
    }

    /// Settles a session: records the transaction, frees the console and
    /// consumes stock for every order line.
    pub fn end_session(&mut self, session_id: &str) -> CoreResult<Transaction> {
        if self.transactions.contains_session(session_id) {
            return Err(CoreError::AlreadySettled(session_id.to_string()));
        }
        let console = self
            .registry
            .find_by_session(session_id)
            .ok_or_else(|| CoreError::SessionNotActive(session_id.to_string()))?;
        let session = self.registry.active_session(session_id)?;

        let now = self.clock.now();
        let (finished, transaction) =
            session.settle(console, || self.ids.next_id(IdKind::Transaction), now)?;
        let console_id = console.id;

        self.transactions.append(transaction.clone())?;
        self.registry.detach(console_id, session_id)?;

        info!(
            session_id,
            transaction_id = %transaction.id,
            console = %transaction.console_name,
            total = %transaction.total_cost,
            "Session settled"
        );

        for line in &finished.orders {
            self.consume_stock(&line.id, line.quantity);
        }

        self.events.push(DeskEvent::SessionSettled(transaction.clone()));
        self.publish_console(console_id, now)?;
        Ok(transaction)
    }

    /// Live bill for the manage view.
    pub fn billing(&self, session_id: &str) -> CoreResult<Billing> {
        Ok(self.active(session_id)?.billing(self.clock.now()))
    }

    pub fn session(&self, session_id: &str) -> CoreResult<&Session> {
        self.active(session_id)
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Recomputes remaining time for every active session. Costs are not
    /// touched; they are only computed on demand.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<ConsoleView> {
        let views = self.registry.refresh(now, self.low_time_ms);
        debug!(active = views.len(), "Tick");
        self.events
            .extend(views.iter().cloned().map(DeskEvent::ConsoleUpdated));
        views
    }

    // =========================================================================
    // Consoles
    // =========================================================================

    pub fn console(&self, console_id: u32) -> CoreResult<&Console> {
        self.registry.get(console_id)
    }

    pub fn console_views(&self, floor: Option<Floor>) -> Vec<ConsoleView> {
        self.registry.views(floor, self.clock.now(), self.low_time_ms)
    }

    /// Takes an idle console out of service, or puts it back.
    pub fn set_maintenance(&mut self, console_id: u32, on: bool) -> CoreResult<ConsoleView> {
        let status = if on {
            ConsoleStatus::Maintenance
        } else {
            ConsoleStatus::Available
        };
        self.registry.apply_transition(console_id, status, None)?;
        info!(console = console_id, ?status, "Console status changed");
        self.publish_console(console_id, self.clock.now())
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub fn add_customer(&mut self, input: NewCustomer) -> CoreResult<Customer> {
        let customer = self
            .customers
            .create(input, || self.ids.next_id(IdKind::Customer))?
            .clone();
        info!(customer_id = %customer.id, name = %customer.name, "Customer registered");
        Ok(customer)
    }

    pub fn customers(&self) -> &[Customer] {
        self.customers.list()
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Sets an item's absolute stock level.
    pub fn update_stock(&mut self, item_id: &str, stock: i64) -> CoreResult<InventoryItem> {
        let item = self.inventory.update_stock(item_id, stock)?.clone();
        info!(item = %item.id, stock = item.stock, "Stock updated");
        Ok(item)
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        self.inventory.list()
    }

    pub fn low_stock(&self) -> Vec<&InventoryItem> {
        self.inventory.low_stock()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    pub fn revenue_summary(&self) -> RevenueSummary {
        self.transactions.summary()
    }

    /// Takes every event queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<DeskEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn active(&self, session_id: &str) -> CoreResult<&Session> {
        self.registry.active_session(session_id)
    }

    /// Writes a mutated session back and publishes its console.
    fn commit<F>(&mut self, next: Session, log: F) -> CoreResult<Session>
    where
        F: FnOnce(&Session),
    {
        self.registry.replace_session(next.clone())?;
        log(&next);
        self.publish_console(next.console_id, self.clock.now())?;
        Ok(next)
    }

    fn publish_console(&mut self, console_id: u32, now: DateTime<Utc>) -> CoreResult<ConsoleView> {
        let view = ConsoleView::project(self.registry.get(console_id)?, now, self.low_time_ms);
        self.events.push(DeskEvent::ConsoleUpdated(view.clone()));
        Ok(view)
    }

    fn consume_stock(&mut self, item_id: &str, quantity: i64) {
        let change = match self.inventory.decrement(item_id, quantity) {
            Ok(change) => change,
            Err(e) => {
                warn!(item = item_id, quantity, error = %e, "Order line not tracked in inventory");
                return;
            }
        };

        if let Some(CoreError::InsufficientStock {
            item_id,
            available,
            requested,
        }) = change.shortfall_error()
        {
            warn!(item = %item_id, available, requested, "Stock shortfall at settlement");
            self.events.push(DeskEvent::StockShortfall {
                item_id,
                available,
                requested,
            });
        }

        if change.became_low {
            if let Ok(item) = self.inventory.get(item_id) {
                warn!(item = %item.id, stock = item.stock, min_stock = item.min_stock, "Low stock");
                self.events.push(DeskEvent::LowStock(item.clone()));
            }
        }
    }
}

impl std::fmt::Debug for RentalDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RentalDesk")
            .field("active_sessions", &self.registry.active_count())
            .field("transactions", &self.transactions.len())
            .field("customers", &self.customers.list().len())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::IdStrategy;
    use chrono::{Duration, TimeZone};

    /// R-PS5-1, Reguler, Rp 15.000 / hour.
    const R_PS5_1: u32 = 1;

    struct Fixture {
        desk: RentalDesk,
        clock: Arc<ManualClock>,
        customer: String,
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn fixture_with(config: DeskConfig) -> Fixture {
        let clock = Arc::new(ManualClock::new(t0()));
        let mut desk = RentalDesk::from_config(&config, clock.clone());
        let customer = desk
            .add_customer(NewCustomer {
                name: "Budi".into(),
                phone: "081234567890".into(),
                ..Default::default()
            })
            .unwrap()
            .id;
        desk.drain_events();
        Fixture {
            desk,
            clock,
            customer,
        }
    }

    fn fixture() -> Fixture {
        let mut config = DeskConfig::default();
        config.ids.strategy = IdStrategy::Sequential;
        fixture_with(config)
    }

    #[test]
    fn test_scenario_food_at_start() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();

        let session = desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        assert_eq!(session.id, "S000001");
        desk.add_order_line(&session.id, "fb1").unwrap();

        let tx = desk.end_session(&session.id).unwrap();
        assert_eq!(tx.id, "T000001");
        assert_eq!(tx.total_cost.rupiah(), 23_000);
        assert_eq!(desk.inventory.get("fb1").unwrap().stock, 99);
        assert!(desk.console(R_PS5_1).unwrap().is_available());
        assert_eq!(desk.transactions().len(), 1);
    }

    #[test]
    fn test_scenario_overtime() {
        let Fixture {
            mut desk,
            clock,
            customer,
        } = fixture();

        let session = desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        clock.advance(Duration::milliseconds(5_401_000));

        let bill = desk.billing(&session.id).unwrap();
        assert_eq!(bill.overtime_cost.rupiah(), 15_000);

        let tx = desk.end_session(&session.id).unwrap();
        assert_eq!(tx.rental_cost.rupiah(), 30_000);
        assert_eq!(tx.total_cost.rupiah(), 30_000);
        assert_eq!(tx.end_time, t0() + Duration::milliseconds(5_401_000));
    }

    #[test]
    fn test_end_twice_settles_once() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();

        let session = desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        desk.end_session(&session.id).unwrap();

        let err = desk.end_session(&session.id).unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(desk.transactions().len(), 1);

        assert!(desk.extend_session(&session.id, 1.0).unwrap_err().is_invalid_state());
        assert!(desk.add_order_line(&session.id, "fb1").unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_start_preconditions() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();

        // R-PS4-10 is in maintenance
        let maintenance = desk
            .registry
            .list()
            .iter()
            .find(|c| c.status == ConsoleStatus::Maintenance)
            .map(|c| c.id)
            .unwrap();
        assert!(desk
            .start_session(maintenance, &customer, 1.0)
            .unwrap_err()
            .is_invalid_request());

        assert!(matches!(
            desk.start_session(R_PS5_1, "C-unknown", 1.0),
            Err(CoreError::CustomerNotFound(_))
        ));
        assert!(desk.start_session(R_PS5_1, &customer, 0.0).unwrap_err().is_invalid_request());
        assert!(desk.start_session(R_PS5_1, &customer, -1.0).is_err());
        assert!(matches!(
            desk.start_session(999, &customer, 1.0),
            Err(CoreError::ConsoleNotFound(999))
        ));

        desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        assert!(desk.start_session(R_PS5_1, &customer, 1.0).unwrap_err().is_invalid_request());
        assert_eq!(desk.registry.active_count(), 1);
    }

    #[test]
    fn test_rejected_operations_consume_no_ids() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();

        desk.set_maintenance(R_PS5_1, true).unwrap();
        assert!(desk.start_session(R_PS5_1, &customer, 1.0).is_err());
        let session = desk.start_session(2, &customer, 1.0).unwrap();
        assert_eq!(session.id, "S000001");

        assert!(desk.end_session("S-unknown").is_err());
        let tx = desk.end_session(&session.id).unwrap();
        assert_eq!(tx.id, "T000001");

        assert!(desk
            .add_customer(NewCustomer {
                name: " ".into(),
                phone: "0812".into(),
                ..Default::default()
            })
            .is_err());
        let sari = desk
            .add_customer(NewCustomer {
                name: "Sari".into(),
                phone: "0812".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(sari.id, "C000002");
    }

    #[test]
    fn test_long_rental_and_extension() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();

        let session = desk.start_session(R_PS5_1, &customer, 200.0).unwrap();
        assert_eq!(session.rental_cost.rupiah(), 200 * 15_000);

        let extended = desk.extend_session(&session.id, 169.0).unwrap();
        assert_eq!(extended.duration, 369 * 3600);
        assert_eq!(extended.rental_cost.rupiah(), 369 * 15_000);
    }

    #[test]
    fn test_extend_and_orders_flow_through_registry() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();

        let session = desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        desk.extend_session(&session.id, 2.0).unwrap();
        desk.add_order_line(&session.id, "fb5").unwrap();
        desk.add_order_line(&session.id, "fb5").unwrap();
        let unchanged = desk.remove_order_line(&session.id, "fb7").unwrap();
        assert_eq!(unchanged.orders.len(), 1);

        let live = desk.session(&session.id).unwrap();
        assert_eq!(live.duration, 3 * 3600);
        assert_eq!(live.rental_cost.rupiah(), 45_000);
        assert_eq!(live.orders[0].quantity, 2);

        assert!(matches!(
            desk.add_order_line(&session.id, "fb99"),
            Err(CoreError::MenuItemNotFound(_))
        ));
        assert!(desk.extend_session(&session.id, 0.0).is_err());
    }

    #[test]
    fn test_negative_stock_by_default() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();
        desk.update_stock("fb4", 1).unwrap();

        let session = desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        for _ in 0..3 {
            desk.add_order_line(&session.id, "fb4").unwrap();
        }
        desk.drain_events();
        desk.end_session(&session.id).unwrap();

        assert_eq!(desk.inventory.get("fb4").unwrap().stock, -2);
        let events = desk.drain_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, DeskEvent::StockShortfall { .. })));
    }

    #[test]
    fn test_strict_stock_reports_shortfall_but_settles() {
        let mut config = DeskConfig::default();
        config.ids.strategy = IdStrategy::Sequential;
        config.billing.allow_negative_stock = false;
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture_with(config);
        desk.update_stock("fb4", 1).unwrap();

        let session = desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        for _ in 0..3 {
            desk.add_order_line(&session.id, "fb4").unwrap();
        }
        desk.drain_events();
        let tx = desk.end_session(&session.id).unwrap();

        assert_eq!(tx.food_and_beverage_cost.rupiah(), 36_000);
        assert_eq!(desk.inventory.get("fb4").unwrap().stock, 0);
        let events = desk.drain_events();
        assert!(events.contains(&DeskEvent::StockShortfall {
            item_id: "fb4".into(),
            available: 1,
            requested: 3,
        }));
    }

    #[test]
    fn test_low_stock_event_on_crossing() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();
        // Es Teh: min stock 50
        desk.update_stock("fb5", 51).unwrap();

        let session = desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        desk.add_order_line(&session.id, "fb5").unwrap();
        desk.drain_events();
        desk.end_session(&session.id).unwrap();

        let events = desk.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, DeskEvent::LowStock(item) if item.id == "fb5")));
        assert_eq!(desk.low_stock().len(), 1);
    }

    #[test]
    fn test_tick_only_reports_active_consoles() {
        let Fixture {
            mut desk,
            clock,
            customer,
        } = fixture();

        assert!(desk.tick(t0()).is_empty());
        let a = desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        desk.start_session(2, &customer, 2.0).unwrap();
        desk.drain_events();

        clock.advance(Duration::minutes(50));
        let views = desk.tick(desk.now());
        assert_eq!(views.len(), 2);
        assert!(views.iter().find(|v| v.console_id == R_PS5_1).unwrap().is_time_low);

        desk.end_session(&a.id).unwrap();
        desk.drain_events();
        let views = desk.tick(desk.now());
        assert_eq!(views.len(), 1);
        let events = desk.drain_events();
        assert!(events.iter().all(|e| match e {
            DeskEvent::ConsoleUpdated(v) => v.console_id != R_PS5_1,
            _ => true,
        }));
    }

    #[test]
    fn test_maintenance_toggle() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();

        let view = desk.set_maintenance(3, true).unwrap();
        assert_eq!(view.status, ConsoleStatus::Maintenance);
        assert!(desk.start_session(3, &customer, 1.0).is_err());
        desk.set_maintenance(3, false).unwrap();

        let session = desk.start_session(3, &customer, 1.0).unwrap();
        assert!(desk.set_maintenance(3, true).unwrap_err().is_invalid_state());
        assert!(desk.session(&session.id).is_ok());
    }

    #[test]
    fn test_revenue_summary() {
        let Fixture {
            mut desk,
            customer,
            ..
        } = fixture();

        let a = desk.start_session(R_PS5_1, &customer, 1.0).unwrap();
        desk.add_order_line(&a.id, "fb1").unwrap();
        let b = desk.start_session(2, &customer, 2.0).unwrap();
        desk.end_session(&a.id).unwrap();
        desk.end_session(&b.id).unwrap();

        let summary = desk.revenue_summary();
        assert_eq!(summary.transaction_count, 2);
        assert_eq!(summary.rental_revenue.rupiah(), 15_000 + 30_000);
        assert_eq!(summary.food_and_beverage_revenue.rupiah(), 8_000);
        assert_eq!(summary.total_revenue.rupiah(), 53_000);
        assert_eq!(desk.transactions().by_customer(&customer).len(), 2);
    }
}
