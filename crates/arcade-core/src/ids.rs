//! # Id Generation
//!
//! Sessions, transactions and customers get their ids from an injected
//! [`IdGenerator`] rather than from the wall clock, so two sessions started
//! in the same millisecond never collide and tests can predict every id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What an id is for. Determines the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdKind {
    Session,
    Transaction,
    Customer,
}

impl IdKind {
    pub fn prefix(&self) -> char {
        match self {
            IdKind::Session => 'S',
            IdKind::Transaction => 'T',
            IdKind::Customer => 'C',
        }
    }
}

/// Source of fresh ids.
pub trait IdGenerator: Send {
    fn next_id(&mut self, kind: IdKind) -> String;
}

/// Random ids: `S-8f0c…`. Default for production.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, kind: IdKind) -> String {
        format!("{}-{}", kind.prefix(), Uuid::new_v4())
    }
}

/// Monotonic ids: `S000001`, `T000001`, … with one counter per kind.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    sessions: u64,
    transactions: u64,
    customers: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, kind: IdKind) -> String {
        let counter = match kind {
            IdKind::Session => &mut self.sessions,
            IdKind::Transaction => &mut self.transactions,
            IdKind::Customer => &mut self.customers,
        };
        *counter += 1;
        format!("{}{:06}", kind.prefix(), counter)
    }
}
