//! # Billing
//!
//! Live bill for a session at a given instant.
//!
//! ## Formula
//! ```text
//! overtime_ms    = max(0, (now - start) - duration)
//! overtime_hours = ceil(overtime_ms / 3_600_000)      (0 when no overtime)
//! overtime_cost  = overtime_hours × price_per_hour
//! total          = rental_cost + overtime_cost + Σ(price × quantity)
//! ```
//!
//! Overtime is billed per started hour: one second over a one hour rental
//! costs a full extra hour.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::session::Session;
use crate::time::ceil_hours;

/// Breakdown of what a session owes at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Billing {
    /// Price of the committed duration.
    pub rental_cost: Money,
    pub overtime_ms: i64,
    pub overtime_hours: i64,
    pub overtime_cost: Money,
    pub food_and_beverage_cost: Money,
    pub total_cost: Money,
}

impl Billing {
    /// Computes the bill for `session` as of `now`.
    pub fn compute(session: &Session, now: DateTime<Utc>) -> Billing {
        let overtime_ms = session.overtime_ms(now);
        let overtime_hours = ceil_hours(overtime_ms);
        let overtime_cost = session.price_per_hour.for_hours(overtime_hours);
        let food_and_beverage_cost = session.food_and_beverage_cost();

        Billing {
            rental_cost: session.rental_cost,
            overtime_ms,
            overtime_hours,
            overtime_cost,
            food_and_beverage_cost,
            total_cost: session.rental_cost + overtime_cost + food_and_beverage_cost,
        }
    }

    #[inline]
    pub fn is_overtime(&self) -> bool {
        self.overtime_ms > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{standard_fleet, Catalog};
    use crate::time::RentalHours;
    use chrono::{Duration, TimeZone};

    fn session(hours: u32) -> Session {
        let fleet = standard_fleet();
        Session::start(
            || "S1".into(),
            &fleet[0],
            "C1",
            RentalHours::from_whole_hours(hours).unwrap(),
            &Catalog::standard(),
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_no_overtime_within_duration() {
        let s = session(1);
        let bill = s.billing(s.start_time + Duration::minutes(59));
        assert!(!bill.is_overtime());
        assert_eq!(bill.overtime_hours, 0);
        assert_eq!(bill.total_cost.rupiah(), 15_000);
    }

    #[test]
    fn test_exact_end_is_not_overtime() {
        let s = session(1);
        let bill = s.billing(s.ends_at());
        assert_eq!(bill.overtime_ms, 0);
        assert_eq!(bill.overtime_cost, Money::zero());
    }

    #[test]
    fn test_overtime_rounds_up_per_started_hour() {
        let s = session(1);
        let cases = [
            (3_601_000, 1, 15_000),
            (7_200_000, 1, 15_000),
            (7_200_001, 2, 30_000),
            (3_600_000 + 5_401_000, 2, 30_000),
        ];
        for (elapsed_ms, hours, cost) in cases {
            let bill = s.billing(s.start_time + Duration::milliseconds(elapsed_ms));
            assert_eq!(bill.overtime_hours, hours, "elapsed {elapsed_ms}");
            assert_eq!(bill.overtime_cost.rupiah(), cost, "elapsed {elapsed_ms}");
            assert_eq!(bill.total_cost.rupiah(), 15_000 + cost);
        }
    }

    #[test]
    fn test_total_includes_orders() {
        let catalog = Catalog::standard();
        let s = session(2)
            .add_order(catalog.menu_item("fb5").unwrap())
            .and_then(|s| s.add_order(catalog.menu_item("fb5").unwrap()))
            .and_then(|s| s.add_order(catalog.menu_item("fb2").unwrap()))
            .unwrap();
        let bill = s.billing(s.start_time);
        assert_eq!(bill.food_and_beverage_cost.rupiah(), 20_000);
        assert_eq!(bill.total_cost.rupiah(), 30_000 + 20_000);
    }
}
