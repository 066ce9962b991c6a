//! # Engine Facade
//!
//! The single entry point: [`compute_split`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SplitTemplate + PoolAmount                                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  validate_input ── Err ──► { original participants, [message] }        │
//! │        │ Ok                                                             │
//! │        ▼                                                                │
//! │  allocate_off_the_top ──► amounts₁, remainder                          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  allocate_remainder   ──► amounts₂                                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  reconcile            ──► amounts₁ + amounts₂, Σ == pool               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  { participants with calculatedAmount, warnings in stage order }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! Nothing here returns `Err` or panics. A template that fails validation
//! degrades to a no-op result carrying one warning, so a UI flow never
//! crashes on a malformed template.

use tracing::{debug, warn};

use crate::allocator::allocate_remainder;
use crate::error::CoreResult;
use crate::money::PoolAmount;
use crate::off_the_top::allocate_off_the_top;
use crate::reconcile::reconcile;
use crate::types::{Participant, SplitResult, SplitTemplate};
use crate::validation::validate_input;
use crate::warnings::Warnings;

/// Divides `pool` among the template's participants.
///
/// ## Guarantees
/// - When validation passes, `calculatedAmount` sums to the pool in cents.
/// - Every amount is `>= 0`.
/// - Roster order, ids and count are unchanged.
/// - Same inputs, same cents, same warnings.
///
/// ## Example
/// ```rust
/// use tipsplit_core::{compute_split, Participant, PoolAmount, SplitRule, SplitTemplate};
///
/// let template = SplitTemplate::new(
///     vec![
///         Participant::new("a", "Alex", "server"),
///         Participant::new("b", "Bo", "server"),
///         Participant::new("c", "Cy", "busser"),
///     ],
///     SplitRule::Equal,
/// );
///
/// let pool: PoolAmount = "10.00".parse().unwrap();
/// let result = compute_split(&template, pool);
///
/// assert_eq!(result.amount_for("a").unwrap().cents(), 334);
/// assert_eq!(result.total().cents(), 1000);
/// assert!(result.warnings.is_empty());
/// ```
pub fn compute_split(template: &SplitTemplate, pool: PoolAmount) -> SplitResult {
    if let Err(err) = validate_input(template, pool) {
        warn!(error = %err, "split template rejected");
        return SplitResult {
            participants: template.participants.clone(),
            warnings: vec![err.to_string()],
        };
    }

    let pool_cents = pool.cents();
    let participants = &template.participants;
    let mut warnings = Warnings::new();

    debug!(
        pool_cents = pool_cents.cents(),
        participants = participants.len(),
        rule = %template.rule,
        off_the_top_rules = template.off_the_top.len(),
        "computing split"
    );

    let off_the_top = allocate_off_the_top(&template.off_the_top, participants, pool_cents, &mut warnings);
    let main = allocate_remainder(
        &template.rule,
        participants,
        &template.role_weights,
        off_the_top.remainder,
        &mut warnings,
    );
    let totals = reconcile(participants, &off_the_top.amounts, &main, pool_cents, &mut warnings);

    let participants: Vec<Participant> = participants
        .iter()
        .zip(totals)
        .map(|(p, amount)| Participant {
            calculated_amount: Some(amount),
            ..p.clone()
        })
        .collect();

    debug!(warnings = warnings.len(), "split computed");

    SplitResult {
        participants,
        warnings: warnings.into_vec(),
    }
}

/// Decodes a JSON template and a pool string, then runs [`compute_split`].
///
/// Decoding problems are boundary errors and come back as `Err`; once both
/// inputs decode, the result follows the usual no-error policy.
pub fn compute_split_json(template_json: &str, pool: &str) -> CoreResult<SplitResult> {
    let template = SplitTemplate::from_json(template_json)?;
    let pool: PoolAmount = pool.parse()?;
    Ok(compute_split(&template, pool))
}

/// Strict counterpart of the validation step, for callers that want the
/// failure as an `Err` instead of a warning.
///
/// ```rust
/// use tipsplit_core::{check_split, CoreError, PoolAmount, SplitRule, SplitTemplate, ValidationError};
///
/// let empty = SplitTemplate::new(Vec::new(), SplitRule::Equal);
/// let err = check_split(&empty, PoolAmount::from_cents(100)).unwrap_err();
/// assert!(matches!(err, CoreError::Validation(ValidationError::NoParticipants)));
/// ```
pub fn check_split(template: &SplitTemplate, pool: PoolAmount) -> CoreResult<()> {
    validate_input(template, pool)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
