//! # Validation Module
//!
//! Precondition checks run before any cent is allocated.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Boundary (serde / PoolAmount::from_str)                      │
//! │  ├── Shape of the template JSON                                        │
//! │  └── Pool text is a decimal number                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE, in order, first failure wins                    │
//! │  1. 0 <= pool <= MAX_POOL_CENTS                                        │
//! │  2. at least one participant                                           │
//! │  3. no negative hours                                                  │
//! │  4. no negative weight                                                 │
//! │  5. no negative off-the-top percentage                                 │
//! │  6. no negative role weight                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Engine: failure ──► original roster + one warning (no panic, no Err)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::PoolAmount;
use crate::types::{SplitRule, SplitTemplate};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks every precondition and reports the first violation.
///
/// ## Example
/// ```rust
/// use tipsplit_core::validation::validate_input;
/// use tipsplit_core::{Participant, PoolAmount, SplitRule, SplitTemplate, ValidationError};
///
/// let template = SplitTemplate::new(
///     vec![Participant::new("1", "Alex", "server")],
///     SplitRule::Equal,
/// );
///
/// assert!(validate_input(&template, PoolAmount::from_cents(1000)).is_ok());
/// assert_eq!(
///     validate_input(&template, PoolAmount::from_cents(-500)),
///     Err(ValidationError::NegativePool)
/// );
/// ```
pub fn validate_input(template: &SplitTemplate, pool: PoolAmount) -> ValidationResult<()> {
    validate_pool(pool)?;
    validate_roster(template)?;
    validate_off_the_top(template)?;
    validate_role_weights(template)?;
    Ok(())
}

/// Rule 1: the pool cannot be negative. Zero is allowed.
///
/// Parsed pools are already capped; this also catches `from_cents` callers.
pub fn validate_pool(pool: PoolAmount) -> ValidationResult<()> {
    if pool.is_negative() {
        return Err(ValidationError::NegativePool);
    }
    if !pool.is_in_range() {
        return Err(ValidationError::PoolTooLarge);
    }
    Ok(())
}

/// Rules 2-4: non-empty roster, then hours, then weights.
///
/// All hours are checked before any weight, so a roster with a negative
/// weight early and a negative hours value late reports the hours.
pub fn validate_roster(template: &SplitTemplate) -> ValidationResult<()> {
    if template.participants.is_empty() {
        return Err(ValidationError::NoParticipants);
    }

    if let Some(p) = template
        .participants
        .iter()
        .find(|p| p.hours.is_some_and(|h| h < 0.0))
    {
        return Err(ValidationError::NegativeHours {
            participant: p.name.clone(),
        });
    }

    if let Some(p) = template
        .participants
        .iter()
        .find(|p| p.weight.is_some_and(|w| w < 0.0))
    {
        return Err(ValidationError::NegativeWeight {
            participant: p.name.clone(),
        });
    }

    Ok(())
}

/// Rule 5: off-the-top percentages are non-negative. Sums over 100 are
/// legal here; the allocator scales them.
pub fn validate_off_the_top(template: &SplitTemplate) -> ValidationResult<()> {
    match template.off_the_top.iter().find(|r| r.percentage < 0.0) {
        Some(rule) => Err(ValidationError::InvalidOffTheTopPercentage {
            role: rule.role.clone(),
            value: rule.percentage,
        }),
        None => Ok(()),
    }
}

/// Rule 6: role weights are non-negative, template map first, then the
/// role-weighted rule's own table.
pub fn validate_role_weights(template: &SplitTemplate) -> ValidationResult<()> {
    let rule_weights = match &template.rule {
        SplitRule::RoleWeighted { weights } => Some(weights),
        _ => None,
    };

    let negative = template
        .role_weights
        .iter()
        .chain(rule_weights.into_iter().flatten())
        .find(|(_, &value)| value < 0.0);

    match negative {
        Some((role, &value)) => Err(ValidationError::InvalidRoleWeight {
            role: role.clone(),
            value,
        }),
        None => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
