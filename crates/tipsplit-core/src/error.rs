//! # Error Types
//!
//! Domain-specific error types for tipsplit-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tipsplit-core errors (this file)                                      │
//! │  ├── CoreError        - Boundary failures (pool text, template JSON)   │
//! │  └── ValidationError  - Precondition failures on a decoded template    │
//! │                                                                         │
//! │  CLI errors (apps/cli)                                                 │
//! │  └── anyhow::Error    - I/O and config failures with context           │
//! │                                                                         │
//! │  Flow: ValidationError ──► compute_split ──► warning string            │
//! │        CoreError       ──► caller (never reaches the engine)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (participant, role, value)
//! 3. Errors are enum variants, never String
//! 4. The `Display` text of a `ValidationError` IS the warning the caller sees

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised at the crate boundary, before a split is attempted.
///
/// The engine itself never returns these: by the time `compute_split` runs,
/// the pool has been parsed and the template decoded.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Pool text is not a plain decimal number.
    ///
    /// ## When This Occurs
    /// - `"12.3.4"`, `"ten dollars"`, `""`
    /// - A value too large to hold in cents
    /// - A non-finite JSON number
    #[error("Invalid pool amount '{input}': {reason}")]
    InvalidPoolAmount { input: String, reason: String },

    /// Template JSON could not be decoded.
    #[error("Invalid split template: {0}")]
    InvalidTemplate(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Precondition failures detected by [`crate::validation::validate_input`].
///
/// Only the first failure is ever reported. The engine converts it into a
/// single warning and returns the roster untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Pool amount is below zero.
    #[error("Pool cannot be negative.")]
    NegativePool,

    /// Pool built from raw cents beyond [`crate::money::MAX_POOL_CENTS`].
    #[error("Pool is too large.")]
    PoolTooLarge,

    /// The roster is empty.
    #[error("At least one participant is required.")]
    NoParticipants,

    /// A participant reported negative hours.
    #[error("Participant '{participant}' has negative hours.")]
    NegativeHours { participant: String },

    /// A participant carries a negative weight.
    #[error("Participant '{participant}' has a negative weight.")]
    NegativeWeight { participant: String },

    /// An off-the-top rule has a negative percentage.
    #[error("Off-the-top percentage for role '{role}' cannot be negative ({value}).")]
    InvalidOffTheTopPercentage { role: String, value: f64 },

    /// A role weight is negative.
    #[error("Weight for role '{role}' cannot be negative ({value}).")]
    InvalidRoleWeight { role: String, value: f64 },
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
    fn test_negative_pool_message_is_exact() {
        assert_eq!(
            ValidationError::NegativePool.to_string(),
            "Pool cannot be negative."
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::NegativeHours {
            participant: "Alex".to_string(),
        };
        assert_eq!(err.to_string(), "Participant 'Alex' has negative hours.");

        let err = ValidationError::InvalidOffTheTopPercentage {
            role: "host".to_string(),
            value: -5.0,
        };
        assert_eq!(
            err.to_string(),
            "Off-the-top percentage for role 'host' cannot be negative (-5)."
        );
    }

    #[test]
    fn test_pool_error_message() {
        let err = CoreError::InvalidPoolAmount {
            input: "abc".to_string(),
            reason: "expected a decimal number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid pool amount 'abc': expected a decimal number"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::NoParticipants.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
