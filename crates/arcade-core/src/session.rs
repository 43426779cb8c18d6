//! # Session Engine
//!
//! Lifecycle of one rental on one console.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Console + Session Lifecycle                          │
//! │                                                                         │
//! │               start                              end                    │
//! │  ┌───────────┐ ───────►  ┌──────────────────┐  ───────►  ┌───────────┐ │
//! │  │ Available │           │      InUse       │            │ Available │ │
//! │  └───────────┘           │                  │            └───────────┘ │
//! │        ▲                 │  extend          │                  │       │
//! │        │ toggle          │  add_order       │ (self loop)      │       │
//! │        ▼                 │  remove_order    │                  ▼       │
//! │  ┌───────────┐           └──────────────────┘           Transaction    │
//! │  │Maintenance│                                                          │
//! │  └───────────┘                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Copy-on-Write
//! Every operation takes `&self` and returns a new [`Session`] (or an error,
//! leaving the original untouched). The console registry swaps the new value
//! in by id, so readers never observe a half-applied mutation. Each mutation
//! bumps [`Session::version`], which the registry uses to reject stale
//! write-backs.
//!
//! ## Remaining Time Is Derived
//! There is no `remaining` field. [`Session::remaining_ms`] recomputes
//! `max(0, start + duration - now)` on every read, so a value captured before
//! an extension can never be shown after it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::billing::Billing;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::time::{millis_between, RentalHours, MILLIS_PER_SECOND};
use crate::types::{Console, MenuItem, OrderItem, Transaction, TransactionKind};
use crate::validation::validate_id;

/// An active (or just-settled) rental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Session {
    pub id: String,

    /// Weak reference; the session does not own the customer record.
    pub customer_id: String,

    pub console_id: u32,

    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,

    /// Committed duration in whole seconds. Only grows, via `extend`.
    pub duration: i64,

    /// Frozen at start. Catalog edits mid-session do not re-price it.
    pub price_per_hour: Money,

    /// Price of the committed duration. Overtime is billed separately.
    pub rental_cost: Money,

    /// Insertion-ordered, item ids unique.
    pub orders: Vec<OrderItem>,

    pub is_finished: bool,

    /// Bumped on every mutation.
    pub version: u64,
}

impl Session {
    // =========================================================================
    // Start
    // =========================================================================

    /// Starts a rental on `console` at `now`.
    ///
    /// Pure factory: the caller is responsible for attaching the returned
    /// session to the console in the registry. `next_id` is called only once
    /// every check has passed, so a rejected start consumes no id.
    ///
    /// ## Errors
    /// - `Validation` if `customer_id` is empty
    /// - `ConsoleUnavailable` if the console is `InUse` or in `Maintenance`
    /// - `PriceNotConfigured` if the catalog has no price for the console
    pub fn start(
        next_id: impl FnOnce() -> String,
        console: &Console,
        customer_id: &str,
        duration: RentalHours,
        catalog: &Catalog,
        now: DateTime<Utc>,
    ) -> CoreResult<Session> {
        validate_id("customer", customer_id)?;

        if !console.is_available() {
            return Err(CoreError::ConsoleUnavailable {
                console: console.name.clone(),
                status: console.status,
            });
        }

        let price_per_hour = catalog.price_for(console)?;

        Ok(Session {
            id: next_id(),
            customer_id: customer_id.to_string(),
            console_id: console.id,
            start_time: now,
            duration: duration.seconds(),
            price_per_hour,
            rental_cost: price_per_hour.for_seconds(duration.seconds()),
            orders: Vec::new(),
            is_finished: false,
            version: 0,
        })
    }

    // =========================================================================
    // Time Projections
    // =========================================================================

    /// When the committed time runs out.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.start_time
            .checked_add_signed(Duration::milliseconds(self.committed_ms()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    #[inline]
    pub fn committed_ms(&self) -> i64 {
        self.duration.saturating_mul(MILLIS_PER_SECOND)
    }

    /// Milliseconds since start (negative if `now` precedes the start).
    #[inline]
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        millis_between(self.start_time, now)
    }

    /// `max(0, start + duration - now)` in milliseconds.
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        self.committed_ms().saturating_sub(self.elapsed_ms(now)).max(0)
    }

    /// `max(0, elapsed - duration)` in milliseconds.
    pub fn overtime_ms(&self, now: DateTime<Utc>) -> i64 {
        self.elapsed_ms(now).saturating_sub(self.committed_ms()).max(0)
    }

    /// Sum of all order lines.
    pub fn food_and_beverage_cost(&self) -> Money {
        self.orders.iter().map(OrderItem::line_total).sum()
    }

    /// Live bill at `now`. Never cached.
    pub fn billing(&self, now: DateTime<Utc>) -> Billing {
        Billing::compute(self, now)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds `additional` to the committed duration and prices it at the
    /// frozen hourly rate. The start time is untouched.
    pub fn extend(&self, additional: RentalHours) -> CoreResult<Session> {
        self.ensure_open()?;

        let duration = self
            .duration
            .checked_add(additional.seconds())
            .filter(|secs| secs.checked_mul(MILLIS_PER_SECOND).is_some())
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "duration".to_string(),
                reason: "is too large to represent".to_string(),
            })?;

        let mut next = self.clone();
        next.duration = duration;
        // Priced from the total so rental_cost == duration/3600 * rate holds
        // for fractional extensions too.
        next.rental_cost = next.price_per_hour.for_seconds(next.duration);
        next.version += 1;
        Ok(next)
    }

    /// One more unit of `item`: bumps the existing line or appends a new one.
    ///
    /// Stock is not checked here; ordering does not reserve inventory.
    pub fn add_order(&self, item: &MenuItem) -> CoreResult<Session> {
        self.ensure_open()?;

        let mut next = self.clone();
        match next.orders.iter_mut().find(|o| o.id == item.id) {
            Some(line) => line.quantity += 1,
            None => next.orders.push(OrderItem::from_menu_item(item)),
        }
        next.version += 1;
        Ok(next)
    }

    /// Deletes the whole line for `item_id`. Absent ids are a no-op.
    pub fn remove_order(&self, item_id: &str) -> CoreResult<Session> {
        self.ensure_open()?;

        let mut next = self.clone();
        let before = next.orders.len();
        next.orders.retain(|o| o.id != item_id);
        if next.orders.len() != before {
            next.version += 1;
        }
        Ok(next)
    }

    // =========================================================================
    // Settlement
    // =========================================================================

    /// Closes the session at `now` and produces its transaction.
    ///
    /// Overtime is folded into the transaction's rental cost. Returns the
    /// finished session alongside the transaction; the caller detaches it
    /// from the console and consumes stock for each order line. `next_id`
    /// names the transaction and is only called on success.
    ///
    /// ## Errors
    /// - `SessionFinished` if already settled
    /// - `StaleSession` if `console` does not hold this session
    pub fn settle(
        &self,
        console: &Console,
        next_id: impl FnOnce() -> String,
        now: DateTime<Utc>,
    ) -> CoreResult<(Session, Transaction)> {
        self.ensure_open()?;

        let held = console.session.as_ref().map(|s| s.id.as_str());
        if console.id != self.console_id || held != Some(self.id.as_str()) {
            return Err(CoreError::StaleSession {
                console: console.name.clone(),
                current: held.unwrap_or("none").to_string(),
                attempted: self.id.clone(),
            });
        }

        let billing = self.billing(now);
        let transaction = Transaction {
            id: next_id(),
            session_id: self.id.clone(),
            console_id: console.id,
            console_name: console.name.clone(),
            customer_id: self.customer_id.clone(),
            start_time: self.start_time,
            end_time: now,
            rental_cost: billing.rental_cost + billing.overtime_cost,
            food_and_beverage_cost: billing.food_and_beverage_cost,
            total_cost: billing.total_cost,
            kind: TransactionKind::Rental,
        };

        let mut finished = self.clone();
        finished.is_finished = true;
        finished.version += 1;

        Ok((finished, transaction))
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.is_finished {
            return Err(CoreError::SessionFinished(self.id.clone()));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
