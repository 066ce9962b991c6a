//! # Rule Allocator
//!
//! Splits whatever the off-the-top stage left over, under the template's
//! [`SplitRule`].
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  remainder ──► match rule                                              │
//! │                 ├── Equal         ──► even split (name)                │
//! │                 ├── Percentage    ──► weights: participant, else role  │
//! │                 ├── HoursBased    ──► weights: hours                   │
//! │                 ├── RoleWeighted  ──► weights: rule's role table       │
//! │                 └── Hybrid        ──► per-role targets + fix-ups       │
//! │                                                                         │
//! │  Every strategy that cannot resolve any weight falls back to Equal     │
//! │  and says so in a warning. Nothing here aborts.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::formula::parse_formula;
use crate::money::Money;
use crate::rounding::{apportion, split_evenly, trim_largest, Share, TieBreak};
use crate::types::{role_key, Participant, SplitRule};
use crate::warnings::{self, Warnings};
use crate::NORMALIZATION_EPSILON;

/// Allocates `remainder` across the roster. One amount per roster position;
/// the amounts sum to `remainder`.
pub fn allocate_remainder(
    rule: &SplitRule,
    participants: &[Participant],
    role_weights: &BTreeMap<String, f64>,
    remainder: Money,
    warnings: &mut Warnings,
) -> Vec<Money> {
    debug!(rule = %rule, remainder = remainder.cents(), "allocating remainder");

    match rule {
        SplitRule::Equal => equal_split(participants, remainder),
        SplitRule::Percentage => percentage_split(participants, role_weights, remainder, warnings),
        SplitRule::HoursBased => hours_split(participants, remainder, warnings),
        SplitRule::RoleWeighted { weights } => {
            role_weighted_split(participants, weights, remainder, warnings)
        }
        SplitRule::Hybrid { formula } => hybrid_split(participants, formula, remainder, warnings),
    }
}

// =============================================================================
// Role Lookup
// =============================================================================

/// Case-insensitive view over a role → weight map.
///
/// Keys that collide after lowercasing keep the first one in map order.
struct RoleTable(HashMap<String, f64>);

impl RoleTable {
    fn new(weights: &BTreeMap<String, f64>) -> Self {
        let mut table = HashMap::with_capacity(weights.len());
        for (role, &weight) in weights {
            table.entry(role_key(role)).or_insert(weight);
        }
        RoleTable(table)
    }

    fn get(&self, role: &str) -> Option<f64> {
        self.0.get(&role_key(role)).copied()
    }

    /// Looks up every participant. Missing roles resolve to 0 and are
    /// reported once each, in roster order.
    fn resolve(&self, participants: &[Participant], warnings: &mut Warnings) -> Vec<f64> {
        let mut reported: Vec<String> = Vec::new();
        participants
            .iter()
            .map(|p| match self.get(&p.role) {
                Some(weight) => weight,
                None => {
                    let key = role_key(&p.role);
                    if !reported.contains(&key) {
                        warnings.push(format!(
                            "No weight configured for role '{}'; those participants receive nothing from the main split.",
                            p.role
                        ));
                        reported.push(key);
                    }
                    0.0
                }
            })
            .collect()
    }

    fn matches_any(&self, participants: &[Participant]) -> bool {
        participants.iter().any(|p| self.get(&p.role).is_some())
    }
}

fn positive_total(weights: &[f64]) -> f64 {
    weights
        .iter()
        .filter(|w| w.is_finite() && **w > 0.0)
        .sum()
}

fn weighted(
    participants: &[Participant],
    weights: &[f64],
    remainder: Money,
    tie_break: TieBreak,
) -> Vec<Money> {
    let shares: Vec<Share<'_>> = participants
        .iter()
        .zip(weights)
        .map(|(p, &w)| Share::new(p, w))
        .collect();
    apportion(remainder, &shares, tie_break)
}

fn fall_back_to_equal(
    participants: &[Participant],
    remainder: Money,
    warnings: &mut Warnings,
    reason: &str,
) -> Vec<Money> {
    warnings.push(format!("{reason}; falling back to an equal split."));
    equal_split(participants, remainder)
}

// =============================================================================
// Strategies
// =============================================================================

/// Everyone gets the same, leftover cents by ascending name.
pub fn equal_split(participants: &[Participant], remainder: Money) -> Vec<Money> {
    let everyone: Vec<&Participant> = participants.iter().collect();
    split_evenly(remainder, &everyone)
}

/// Per-participant `weight` if anyone has one, otherwise the template's
/// role weights. Sums other than 100 are normalized with a warning.
pub fn percentage_split(
    participants: &[Participant],
    role_weights: &BTreeMap<String, f64>,
    remainder: Money,
    warnings: &mut Warnings,
) -> Vec<Money> {
    let weights: Vec<f64> = if participants.iter().any(|p| p.weight.is_some()) {
        participants.iter().map(|p| p.weight.unwrap_or(0.0)).collect()
    } else {
        let table = RoleTable::new(role_weights);
        if !table.matches_any(participants) {
            return fall_back_to_equal(
                participants,
                remainder,
                warnings,
                "No percentage weights were found for any participant",
            );
        }
        table.resolve(participants, warnings)
    };

    let total = positive_total(&weights);
    if total <= 0.0 {
        return fall_back_to_equal(
            participants,
            remainder,
            warnings,
            "Percentage weights resolved to zero",
        );
    }

    if (total - 100.0).abs() > NORMALIZATION_EPSILON {
        warnings.push(format!(
            "Percentage weights did not sum to 100% (total {}%) and were normalized.",
            warnings::percent(total)
        ));
    }

    weighted(participants, &weights, remainder, TieBreak::LargerWeight)
}

/// Proportional to hours; nobody with hours means an equal split.
pub fn hours_split(participants: &[Participant], remainder: Money, warnings: &mut Warnings) -> Vec<Money> {
    let hours: Vec<f64> = participants
        .iter()
        .map(|p| p.hours.unwrap_or(0.0).max(0.0))
        .collect();

    if positive_total(&hours) <= 0.0 {
        return fall_back_to_equal(participants, remainder, warnings, "No hours recorded");
    }

    weighted(participants, &hours, remainder, TieBreak::LargerHours)
}

/// Proportional to the rule's own role table.
pub fn role_weighted_split(
    participants: &[Participant],
    weights: &BTreeMap<String, f64>,
    remainder: Money,
    warnings: &mut Warnings,
) -> Vec<Money> {
    let table = RoleTable::new(weights);
    if !table.matches_any(participants) {
        return fall_back_to_equal(
            participants,
            remainder,
            warnings,
            "No role weights match any participant",
        );
    }

    let resolved = table.resolve(participants, warnings);
    if positive_total(&resolved) <= 0.0 {
        return fall_back_to_equal(participants, remainder, warnings, "Role weights resolved to zero");
    }

    weighted(participants, &resolved, remainder, TieBreak::LargerWeight)
}

/// Per-role percentages from a `role:pct` formula.
///
/// ## Steps
/// 1. Each usable term (positive pct, at least one match) gets
///    `round(remainder × pct / 100)`, split evenly inside the role.
/// 2. Shortfall: split equally over participants no term reached, or over
///    everyone when every participant was reached.
/// 3. Excess: trimmed a cent at a time from the largest allocation.
pub fn hybrid_split(
    participants: &[Participant],
    formula: &str,
    remainder: Money,
    warnings: &mut Warnings,
) -> Vec<Money> {
    let mut amounts = vec![Money::zero(); participants.len()];
    let mut reached = vec![false; participants.len()];
    let mut any_term = false;

    for term in parse_formula(formula) {
        if term.percentage <= 0.0 {
            continue;
        }

        let members: Vec<usize> = (0..participants.len())
            .filter(|&i| participants[i].has_role(&term.role))
            .collect();
        if members.is_empty() {
            warnings.push(format!(
                "Hybrid formula role '{}' matches no participants.",
                term.role
            ));
            continue;
        }

        any_term = true;
        let target = remainder.percentage(term.percentage);
        let recipients: Vec<&Participant> = members.iter().map(|&i| &participants[i]).collect();
        for (&idx, amount) in members.iter().zip(split_evenly(target, &recipients)) {
            amounts[idx] += amount;
            reached[idx] = true;
        }

        debug!(role = %term.role, percentage = term.percentage, target = target.cents(), "hybrid term applied");
    }

    if !any_term {
        return fall_back_to_equal(
            participants,
            remainder,
            warnings,
            "Hybrid formula has no usable roles",
        );
    }

    let allocated: Money = amounts.iter().sum();
    if allocated < remainder {
        let shortfall = remainder - allocated;
        let mut recipients: Vec<usize> = (0..participants.len()).filter(|&i| !reached[i]).collect();
        let who = if recipients.is_empty() {
            recipients = (0..participants.len()).collect();
            "all participants"
        } else {
            "participants outside the formula"
        };

        warnings.push(format!(
            "Hybrid formula left {} unallocated; it was split equally among {}.",
            warnings::amount(shortfall),
            who
        ));

        let people: Vec<&Participant> = recipients.iter().map(|&i| &participants[i]).collect();
        for (&idx, amount) in recipients.iter().zip(split_evenly(shortfall, &people)) {
            amounts[idx] += amount;
        }
    } else if allocated > remainder {
        let excess = allocated - remainder;
        warnings.push(format!(
            "Hybrid formula allocated {} more than the pool; the excess was trimmed from the largest shares.",
            warnings::amount(excess)
        ));
        let ids: Vec<&str> = participants.iter().map(|p| p.id.as_str()).collect();
        trim_largest(&mut amounts, &ids, excess.cents());
    }

    amounts
}

// =============================================================================
// Unit Tests
// =============================================================================
