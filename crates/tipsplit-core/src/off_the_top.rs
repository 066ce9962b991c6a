//! # Off-The-Top Allocator
//!
//! Role deductions taken from the whole pool before the main rule runs.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rules: host 90%, bar 60%        pool: 10000 cents                     │
//! │      │                                                                  │
//! │      ▼ drop rules at or below 0%                                        │
//! │  sum = 150% > 100%  ──► scale by 100/150, warn                         │
//! │      │                                                                  │
//! │      ▼ per rule: target = round(pool × pct / 100)                       │
//! │  host 60% → 6000    bar 40% → 4000                                      │
//! │      │                                                                  │
//! │      ▼ split each target evenly over matching roles (name tie-break)    │
//! │      │                                                                  │
//! │      ▼ Σ targets > pool?  ──► remove cents, descending name, warn       │
//! │                                                                         │
//! │  remainder = pool − Σ allocated  (0 here) ──► main rule                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::money::Money;
use crate::rounding::{name_order, remove_cents, split_evenly};
use crate::types::{OffTheTopRule, Participant};
use crate::warnings::{self, Warnings};

/// Per-participant deductions plus what is left for the main rule.
#[derive(Debug, Clone, PartialEq)]
pub struct OffTheTopAllocation {
    /// One entry per roster position.
    pub amounts: Vec<Money>,
    /// Pool minus everything taken off the top. Never negative.
    pub remainder: Money,
}

impl OffTheTopAllocation {
    /// Total taken off the top.
    pub fn allocated(&self) -> Money {
        self.amounts.iter().sum()
    }
}

/// Applies the off-the-top rules to `pool`.
pub fn allocate_off_the_top(
    rules: &[OffTheTopRule],
    participants: &[Participant],
    pool: Money,
    warnings: &mut Warnings,
) -> OffTheTopAllocation {
    let mut amounts = vec![Money::zero(); participants.len()];

    let active: Vec<&OffTheTopRule> = rules
        .iter()
        .filter(|r| r.percentage.is_finite() && r.percentage > 0.0)
        .collect();
    if active.is_empty() {
        return OffTheTopAllocation {
            amounts,
            remainder: pool,
        };
    }

    let raw_total: f64 = active.iter().map(|r| r.percentage).sum();
    let scale = if raw_total > 100.0 {
        debug!(total_percentage = raw_total, "scaling off-the-top rules");
        warnings.push("Off-the-top percentages exceeded 100% and were scaled down.");
        100.0 / raw_total
    } else {
        1.0
    };

    for rule in active {
        let adjusted = rule.percentage * scale;
        let target = pool.percentage(adjusted);

        let members: Vec<usize> = (0..participants.len())
            .filter(|&i| participants[i].has_role(&rule.role))
            .collect();
        if members.is_empty() {
            warnings.push(format!(
                "No participants match off-the-top role '{}'; it was skipped.",
                rule.role
            ));
            continue;
        }

        let recipients: Vec<&Participant> = members.iter().map(|&i| &participants[i]).collect();
        let split = split_evenly(target, &recipients);
        for (&idx, amount) in members.iter().zip(split) {
            amounts[idx] += amount;
        }

        debug!(
            role = %rule.role,
            percentage = adjusted,
            target = target.cents(),
            recipients = members.len(),
            "off-the-top rule applied"
        );
    }

    let allocated: Money = amounts.iter().sum();
    if allocated > pool {
        let overflow = allocated - pool;
        warnings.push(format!(
            "Off-the-top rounding exceeded the pool by {}; the excess was removed.",
            warnings::cents(overflow.cents())
        ));
        let mut descending = name_order(participants);
        descending.reverse();
        remove_cents(&mut amounts, &descending, overflow.cents());
    }

    let remainder = pool - amounts.iter().sum::<Money>();
    OffTheTopAllocation { amounts, remainder }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Participant> {
        vec![
            Participant::new("1", "Alex", "server"),
            Participant::new("2", "Bo", "Host"),
            Participant::new("3", "Cy", "bartender"),
            Participant::new("4", "Di", "bartender"),
        ]
    }

    fn cents(amounts: &[Money]) -> Vec<i64> {
        amounts.iter().map(Money::cents).collect()
    }

    #[test]
    fn test_no_rules_passes_pool_through() {
        let mut warnings = Warnings::new();
        let result = allocate_off_the_top(&[], &roster(), Money::from_cents(1000), &mut warnings);
        assert_eq!(result.remainder.cents(), 1000);
        assert!(result.allocated().is_zero());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_zero_percent_rules_are_ignored() {
        let mut warnings = Warnings::new();
        let rules = [OffTheTopRule::new("host", 0.0)];
        let result = allocate_off_the_top(&rules, &roster(), Money::from_cents(1000), &mut warnings);
        assert_eq!(result.remainder.cents(), 1000);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_role_match_is_case_insensitive_and_split_evenly() {
        let mut warnings = Warnings::new();
        let rules = [OffTheTopRule::new("host", 10.0), OffTheTopRule::new("BARTENDER", 5.0)];
        let result = allocate_off_the_top(&rules, &roster(), Money::from_cents(10001), &mut warnings);

        // host: round(1000.1) = 1000; bartenders: round(500.05) = 500 → 250 each
        assert_eq!(cents(&result.amounts), vec![0, 1000, 250, 250]);
        assert_eq!(result.remainder.cents(), 8501);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_odd_cent_goes_to_first_name() {
        let mut warnings = Warnings::new();
        let rules = [OffTheTopRule::new("bartender", 1.0)];
        let result = allocate_off_the_top(&rules, &roster(), Money::from_cents(10100), &mut warnings);
        // 101 cents over Cy and Di
        assert_eq!(cents(&result.amounts), vec![0, 0, 51, 50]);
    }

    #[test]
    fn test_over_100_percent_is_scaled_with_warning() {
        let mut warnings = Warnings::new();
        let rules = [OffTheTopRule::new("host", 90.0), OffTheTopRule::new("bartender", 60.0)];
        let result = allocate_off_the_top(&rules, &roster(), Money::from_cents(10000), &mut warnings);

        assert_eq!(cents(&result.amounts), vec![0, 6000, 2000, 2000]);
        assert!(result.remainder.is_zero());
        assert_eq!(
            warnings.into_vec(),
            vec!["Off-the-top percentages exceeded 100% and were scaled down."]
        );
    }

    #[test]
    fn test_unmatched_role_warns_and_skips() {
        let mut warnings = Warnings::new();
        let rules = [OffTheTopRule::new("dishwasher", 10.0)];
        let result = allocate_off_the_top(&rules, &roster(), Money::from_cents(1000), &mut warnings);

        assert_eq!(result.remainder.cents(), 1000);
        assert_eq!(
            warnings.into_vec(),
            vec!["No participants match off-the-top role 'dishwasher'; it was skipped."]
        );
    }

    #[test]
    fn test_rounding_overflow_is_removed_in_descending_name_order() {
        let mut warnings = Warnings::new();
        // 50% of 101 = 50.5 → 51, twice → 102 > 101
        let rules = [OffTheTopRule::new("server", 50.0), OffTheTopRule::new("host", 50.0)];
        let result = allocate_off_the_top(&rules, &roster(), Money::from_cents(101), &mut warnings);

        // Cy and Di hold nothing, so Bo (next in descending order) gives the cent back.
        assert_eq!(cents(&result.amounts), vec![51, 50, 0, 0]);
        assert!(result.remainder.is_zero());
        assert_eq!(
            warnings.into_vec(),
            vec!["Off-the-top rounding exceeded the pool by 1 cent; the excess was removed."]
        );
    }
}
