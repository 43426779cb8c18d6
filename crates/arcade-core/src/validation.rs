//! # Validation Module
//!
//! Input validation for the rental desk.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (external)                                      │
//! │  ├── Empty field checks, number inputs                                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Field rules, run before any state is touched                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Session engine / registry                                    │
//! │  └── Lifecycle rules (console status, session identity)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::time::{MILLIS_PER_SECOND, SECONDS_PER_HOUR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a duration in hours and converts it to whole seconds.
///
/// ## Rules
/// - Must be a finite number
/// - Must be positive (> 0) and round to at least one second
/// - Must fit in `i64` milliseconds
///
/// ## Example
/// ```rust
/// use arcade_core::validation::validate_duration_hours;
///
/// assert_eq!(validate_duration_hours(1.0).unwrap(), 3_600);
/// assert!(validate_duration_hours(0.0).is_err());
/// assert!(validate_duration_hours(f64::NAN).is_err());
/// ```
pub fn validate_duration_hours(hours: f64) -> ValidationResult<i64> {
    if !hours.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "duration".to_string(),
            reason: "must be a finite number of hours".to_string(),
        });
    }

    if hours <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "duration".to_string(),
        });
    }

    let seconds = (hours * SECONDS_PER_HOUR as f64).round();
    if seconds < 1.0 {
        return Err(ValidationError::MustBePositive {
            field: "duration".to_string(),
        });
    }
    if seconds >= (i64::MAX / MILLIS_PER_SECOND) as f64 {
        return Err(ValidationError::InvalidFormat {
            field: "duration".to_string(),
            reason: "is too large to represent".to_string(),
        });
    }
    let seconds = seconds as i64;

    Ok(seconds)
}

/// Validates an absolute stock level set during restocking.
pub fn validate_stock_level(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates that an id reference was actually supplied.
///
/// ## Example
/// ```rust
/// use arcade_core::validation::validate_id;
///
/// assert!(validate_id("customer", "C000001").is_ok());
/// assert!(validate_id("customer", "  ").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if id.len() > 64 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 64,
        });
    }
    Ok(())
}

/// Validates a customer or item display name (1-100 characters).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a phone number: required, at most 32 characters. The format is
/// free; desks record extensions and local short numbers as typed.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.chars().count() > 32 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 32,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_duration_hours() {
        assert_eq!(validate_duration_hours(1.0).unwrap(), 3_600);
        assert_eq!(validate_duration_hours(0.5).unwrap(), 1_800);
        assert_eq!(validate_duration_hours(168.0).unwrap(), 604_800);
        assert_eq!(validate_duration_hours(200.0).unwrap(), 720_000);
        assert_eq!(validate_duration_hours(10_000.0).unwrap(), 36_000_000);

        assert!(validate_duration_hours(0.0).is_err());
        assert!(validate_duration_hours(-2.0).is_err());
        assert!(validate_duration_hours(0.0001).is_err());
        assert!(validate_duration_hours(f64::MAX).is_err());
        assert!(validate_duration_hours(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_stock_level() {
        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(250).is_ok());
        assert!(validate_stock_level(-1).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("customer", "C1").is_ok());
        assert!(validate_id("customer", "").is_err());
        assert!(validate_id("customer", &"x".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Budi Santoso").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0812-3456-7890").is_ok());
        assert!(validate_phone("+62 812 3456 7890").is_ok());
        assert!(validate_phone("12345").is_ok());
        assert!(validate_phone("ext 12").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("   ").is_err());
        assert!(validate_phone(&"9".repeat(33)).is_err());
    }
}
