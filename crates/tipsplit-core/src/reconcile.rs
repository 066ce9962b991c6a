//! # Reconciler
//!
//! Joins the off-the-top and main allocations and makes the grand total
//! land exactly on the pool.
//!
//! ```text
//!   off-the-top[i] + main[i] ──► total[i]
//!
//!   Σ total < pool  ──► +1 cent each, ascending name, cycling
//!   Σ total > pool  ──► −1 cent each, descending name, skipping zeros
//! ```
//!
//! Both stages are exact on their own, so drift only shows up if two
//! independent rounding passes disagree. The correction is still applied
//! unconditionally: the conservation guarantee lives here.

use tracing::debug;

use crate::money::Money;
use crate::rounding::{add_cents, name_order, remove_cents};
use crate::types::Participant;
use crate::warnings::{self, Warnings};

/// Final per-participant amounts. Sums to `pool` whenever `pool >= 0`.
pub fn reconcile(
    participants: &[Participant],
    off_the_top: &[Money],
    main: &[Money],
    pool: Money,
    warnings: &mut Warnings,
) -> Vec<Money> {
    let mut totals: Vec<Money> = off_the_top
        .iter()
        .zip(main)
        .map(|(&a, &b)| a + b)
        .collect();

    let drift = pool - totals.iter().sum::<Money>();
    debug!(pool = pool.cents(), drift = drift.cents(), "reconciling allocations");

    if drift.is_positive() {
        warnings.push(format!(
            "Rounding left {} undistributed; it was added in name order.",
            warnings::cents(drift.cents())
        ));
        add_cents(&mut totals, &name_order(participants), drift.cents());
    } else if drift.is_negative() {
        warnings.push(format!(
            "Rounding distributed {} too many; the excess was removed in reverse name order.",
            warnings::cents(-drift.cents())
        ));
        let mut descending = name_order(participants);
        descending.reverse();
        remove_cents(&mut totals, &descending, -drift.cents());
    }

    totals
}
