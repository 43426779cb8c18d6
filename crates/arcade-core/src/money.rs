//! # Money Module
//!
//! Provides the `Money` type for Rupiah amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  1.5 hours × Rp 15.000 computed in floats can land on 22499.999...     │
//! │  and a bill that is one rupiah off is a bill the cashier argues over.  │
//! │                                                                         │
//! │  OUR SOLUTION: Whole Rupiah in an i64                                   │
//! │    Rupiah has no minor unit in practice, so the smallest unit is 1 Rp. │
//! │    Pro-rating by seconds happens in i128 with explicit rounding.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use arcade_core::money::Money;
//!
//! let hourly = Money::from_rupiah(15_000);
//! assert_eq!(hourly.for_hours(2).rupiah(), 30_000);
//! assert_eq!(hourly.for_seconds(5_400).rupiah(), 22_500); // 1.5 h
//! assert_eq!(hourly.to_string(), "Rp 15.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::time::SECONDS_PER_HOUR;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in whole Rupiah.
///
/// ## Where Money is Used
/// ```text
/// PriceTable (floor, type) ──► Session.price_per_hour ──► rental_cost
///                                        │
///                                        └──► overtime_cost (ceil hours)
///
/// MenuItem.price ──► OrderItem.line_total ──► food_and_beverage_cost
///
/// rental + overtime + F&B ──► Transaction.total_cost
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole Rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole Rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use arcade_core::money::Money;
    ///
    /// let es_teh = Money::from_rupiah(5_000);
    /// assert_eq!(es_teh.multiply_quantity(3).rupiah(), 15_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Treats `self` as an hourly rate and returns the price of `hours` hours.
    #[inline]
    pub const fn for_hours(&self, hours: i64) -> Self {
        Money(self.0 * hours)
    }

    /// Treats `self` as an hourly rate and pro-rates it to `seconds`.
    ///
    /// Whole hours are exact. Fractional hours round half up to the nearest
    /// Rupiah.
    ///
    /// ## Example
    /// ```rust
    /// use arcade_core::money::Money;
    ///
    /// let hourly = Money::from_rupiah(10_000);
    /// assert_eq!(hourly.for_seconds(3_600).rupiah(), 10_000);
    /// assert_eq!(hourly.for_seconds(900).rupiah(), 2_500);   // 15 min
    /// assert_eq!(hourly.for_seconds(1).rupiah(), 3);         // 2.77.. → 3
    /// ```
    pub fn for_seconds(&self, seconds: i64) -> Money {
        let per_hour = SECONDS_PER_HOUR as i128;
        let scaled = self.0 as i128 * seconds as i128;
        // round half away from zero
        let rounded = if scaled >= 0 {
            (scaled + per_hour / 2) / per_hour
        } else {
            (scaled - per_hour / 2) / per_hour
        };
        Money(rounded as i64)
    }

    /// Formats the absolute amount with `.` thousands separators: `15.000`.
    pub fn grouped(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        out
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Single display format for the whole desk: `Rp 15.000`, `-Rp 2.000`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, self.grouped())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
