//! # Error Types
//!
//! Domain-specific error types for arcade-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  arcade-core errors (this file)                                        │
//! │  ├── CoreError        - Domain errors, classified by ErrorKind         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  arcade-desk errors (separate crate)                                   │
//! │  ├── DeskError        - Actor / configuration failures                 │
//! │  └── ApiError         - What the presentation layer sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DeskError → ApiError → UI         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Classes, No Retries
//! Every failure is either bad caller input ([`ErrorKind::InvalidRequest`])
//! or an operation issued in the wrong lifecycle state
//! ([`ErrorKind::InvalidState`]). The engine has no I/O, so there is no
//! transient class: nothing is ever retried automatically, and a failed
//! operation leaves state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ConsoleStatus, ConsoleType, Floor};

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or precondition-violating input. Fix the input and resubmit.
    InvalidRequest,
    /// The console or session is in the wrong lifecycle state.
    InvalidState,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Console id is not part of the fleet.
    #[error("Console not found: {0}")]
    ConsoleNotFound(u32),

    /// Customer id is not in the directory.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Menu item id is not on the menu.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// Inventory item id is not tracked by the ledger.
    #[error("Inventory item not found: {0}")]
    InventoryItemNotFound(String),

    /// The price table has no entry for this floor / console type.
    #[error("No hourly price configured for {floor:?} {console_type:?}")]
    PriceNotConfigured {
        floor: Floor,
        console_type: ConsoleType,
    },

    /// A session cannot be started on this console.
    ///
    /// ## When This Occurs
    /// - Console is under maintenance
    /// - Console already holds an active session
    #[error("Console {console} is {status:?}, cannot start a session")]
    ConsoleUnavailable {
        console: String,
        status: ConsoleStatus,
    },

    /// The console is not renting, so there is no session to act on.
    #[error("Console {console} is {status:?}, expected InUse")]
    ConsoleNotInUse {
        console: String,
        status: ConsoleStatus,
    },

    /// The requested console status change is not part of the state machine.
    #[error("Console {console} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        console: String,
        from: ConsoleStatus,
        to: ConsoleStatus,
    },

    /// No active session has this id (never started, or already settled).
    #[error("Session {0} is not active")]
    SessionNotActive(String),

    /// The session was already settled.
    #[error("Session {0} is already finished")]
    SessionFinished(String),

    /// A write targeted a console whose current session differs.
    ///
    /// ## When This Occurs
    /// A stale session value (older id or version) is written back after the
    /// console has moved on. The newer state always wins.
    #[error("Console {console} holds session {current}, refusing write for {attempted}")]
    StaleSession {
        console: String,
        current: String,
        attempted: String,
    },

    /// A transaction for this session was already recorded.
    #[error("Session {0} was already settled")]
    AlreadySettled(String),

    /// Stock fell short at settlement (reported, never blocks settlement).
    #[error("Insufficient stock for {item_id}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies the error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ConsoleNotFound(_)
            | CoreError::CustomerNotFound(_)
            | CoreError::MenuItemNotFound(_)
            | CoreError::InventoryItemNotFound(_)
            | CoreError::PriceNotConfigured { .. }
            | CoreError::ConsoleUnavailable { .. }
            | CoreError::InsufficientStock { .. }
            | CoreError::Validation(_) => ErrorKind::InvalidRequest,

            CoreError::ConsoleNotInUse { .. }
            | CoreError::InvalidTransition { .. }
            | CoreError::SessionNotActive(_)
            | CoreError::SessionFinished(_)
            | CoreError::StaleSession { .. }
            | CoreError::AlreadySettled(_) => ErrorKind::InvalidState,
        }
    }

    /// Shorthand for `kind() == InvalidRequest`.
    pub fn is_invalid_request(&self) -> bool {
        self.kind() == ErrorKind::InvalidRequest
    }

    /// Shorthand for `kind() == InvalidState`.
    pub fn is_invalid_state(&self) -> bool {
        self.kind() == ErrorKind::InvalidState
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., NaN hours).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ConsoleUnavailable {
            console: "R-PS4-10".to_string(),
            status: ConsoleStatus::Maintenance,
        };
        assert_eq!(
            err.to_string(),
            "Console R-PS4-10 is Maintenance, cannot start a session"
        );

        let err = CoreError::InsufficientStock {
            item_id: "fb4".to_string(),
            available: 1,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for fb4: available 1, requested 3"
        );
    }

    #[test]
    fn test_error_kinds() {
        let unavailable = CoreError::ConsoleUnavailable {
            console: "R-PS5-1".to_string(),
            status: ConsoleStatus::InUse,
        };
        assert!(unavailable.is_invalid_request());

        assert!(CoreError::SessionNotActive("S1".into()).is_invalid_state());
        assert!(CoreError::AlreadySettled("S1".into()).is_invalid_state());
        assert!(CoreError::CustomerNotFound("C9".into()).is_invalid_request());
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "duration".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::InvalidRequest);
    }
}
