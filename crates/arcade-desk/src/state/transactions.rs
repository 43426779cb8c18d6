//! # Transaction Log
//!
//! Append-only record of settled sessions. `append` is the only write;
//! every read is a scan in settlement order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use arcade_core::error::{CoreError, CoreResult};
use arcade_core::{Money, Transaction};

/// Fold over the log for the reports screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub transaction_count: usize,
    pub rental_revenue: Money,
    pub food_and_beverage_revenue: Money,
    pub total_revenue: Money,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a settlement. A session settles at most once.
    pub fn append(&mut self, transaction: Transaction) -> CoreResult<&Transaction> {
        if self.contains_session(&transaction.session_id) {
            return Err(CoreError::AlreadySettled(transaction.session_id));
        }
        self.entries.push(transaction);
        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    pub fn contains_session(&self, session_id: &str) -> bool {
        self.entries.iter().any(|t| t.session_id == session_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_console(&self, console_id: u32) -> Vec<&Transaction> {
        self.entries
            .iter()
            .filter(|t| t.console_id == console_id)
            .collect()
    }

    pub fn by_customer(&self, customer_id: &str) -> Vec<&Transaction> {
        self.entries
            .iter()
            .filter(|t| t.customer_id == customer_id)
            .collect()
    }

    /// Transactions that ended in `[from, to)`.
    pub fn between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&Transaction> {
        self.entries
            .iter()
            .filter(|t| t.end_time >= from && t.end_time < to)
            .collect()
    }

    pub fn summary(&self) -> RevenueSummary {
        summarize(self.entries.iter())
    }
}

/// Totals over any selection of transactions.
pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> RevenueSummary {
    transactions
        .into_iter()
        .fold(RevenueSummary::default(), |mut acc, t| {
            acc.transaction_count += 1;
            acc.rental_revenue += t.rental_cost;
            acc.food_and_beverage_revenue += t.food_and_beverage_cost;
            acc.total_revenue += t.total_cost;
            acc
        })
}
