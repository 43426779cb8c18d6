//! # Desk Error Types
//!
//! Runtime errors and the serializable error presentation layers receive.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Rental Desk                        │
//! │                                                                         │
//! │  DeskHandle::end_session("S1")                                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Actor job                                                       │  │
//! │  │  RentalDesk::end_session ── CoreError::SessionNotActive ──┐      │  │
//! │  │         │                                                 │      │  │
//! │  │         ▼                                                 ▼      │  │
//! │  │  Actor gone? ─────────── DeskError::ActorClosed ──────► ApiError │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INVALID_STATE", "message": "Session S1 is not active" }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use arcade_core::{CoreError, ErrorKind};

use crate::config::ConfigError;

/// Result type alias for desk operations.
pub type DeskResult<T> = Result<T, DeskError>;

/// Everything that can go wrong at the desk.
#[derive(Debug, Error)]
pub enum DeskError {
    /// A domain rule rejected the operation. State is unchanged.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The actor task has stopped; no further commands are accepted.
    #[error("Rental desk is not running")]
    ActorClosed,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DeskError {
    /// Domain classification, if this is a domain error.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DeskError::Core(e) => Some(e.kind()),
            _ => None,
        }
    }
}

// =============================================================================
// API Error
// =============================================================================

/// What a presentation layer receives when a desk call fails.
///
/// ```json
/// {
///   "code": "INVALID_REQUEST",
///   "message": "Console R-PS4-10 is Maintenance, cannot start a session"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad input or violated precondition. Fix and resubmit.
    InvalidRequest,

    /// Wrong lifecycle state (ended session, busy console).
    InvalidState,

    /// The desk is shut down.
    Unavailable,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match err.kind() {
            ErrorKind::InvalidRequest => ErrorCode::InvalidRequest,
            ErrorKind::InvalidState => ErrorCode::InvalidState,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<DeskError> for ApiError {
    fn from(err: DeskError) -> Self {
        match err {
            DeskError::Core(e) => e.into(),
            DeskError::ActorClosed => {
                ApiError::new(ErrorCode::Unavailable, DeskError::ActorClosed.to_string())
            }
            DeskError::Config(e) => {
                tracing::error!("Configuration error reached the API: {}", e);
                ApiError::new(ErrorCode::Internal, "Desk configuration error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_by_kind() {
        let api: ApiError = CoreError::SessionNotActive("S1".into()).into();
        assert_eq!(api.code, ErrorCode::InvalidState);
        assert_eq!(api.message, "Session S1 is not active");

        let api: ApiError = CoreError::CustomerNotFound("C9".into()).into();
        assert_eq!(api.code, ErrorCode::InvalidRequest);
    }

    #[test]
    fn test_api_error_serialization() {
        let api = ApiError::from(DeskError::ActorClosed);
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "UNAVAILABLE");
        assert_eq!(json["message"], "Rental desk is not running");
    }

    #[test]
    fn test_desk_error_kind() {
        assert_eq!(
            DeskError::from(CoreError::AlreadySettled("S1".into())).kind(),
            Some(ErrorKind::InvalidState)
        );
        assert_eq!(DeskError::ActorClosed.kind(), None);
    }
}
