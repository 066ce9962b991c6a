//! # Penny Rounder
//!
//! Largest-remainder apportionment plus the cent-by-cent adjusters used by
//! the off-the-top allocator, the hybrid rule and the reconciler.
//!
//! ## Largest Remainder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  target = 1000 cents, shares = [1, 1, 1]                               │
//! │                                                                         │
//! │  scaled:     333.33   333.33   333.33                                   │
//! │  floor:      333      333      333      → 999 handed out               │
//! │  leftover:   1 cent                                                     │
//! │  remainders: .33      .33      .33      → all tied                     │
//! │  tie-break:  Alex  <  Bo  <  Cy         → Alex gets the cent           │
//! │                                                                         │
//! │  result:     334      333      333      → 1000 exactly                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tie-Breaks
//! Which participant receives a leftover cent is observable, so the order
//! is fixed per context:
//!
//! | Context                          | Order                              |
//! |----------------------------------|------------------------------------|
//! | equal, off-the-top               | name ↑, id ↑                       |
//! | hours                            | hours ↓, name ↑, id ↑              |
//! | percentage, role, hybrid weights | weight ↓, name ↑, id ↑             |

use std::cmp::Ordering;

use crate::money::Money;
use crate::types::Participant;

// =============================================================================
// Shares
// =============================================================================

/// Which ordering decides between equal fractional remainders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// Ascending name, then id.
    Name,
    /// Larger hours first, then name, then id.
    LargerHours,
    /// Larger weight first, then name, then id.
    LargerWeight,
}

/// One participant's claim on a target amount.
#[derive(Debug, Clone, Copy)]
pub struct Share<'a> {
    pub name: &'a str,
    pub id: &'a str,
    /// Non-negative real weight (hours, percentage, or 1 for even splits).
    pub weight: f64,
}

impl<'a> Share<'a> {
    pub fn new(participant: &'a Participant, weight: f64) -> Self {
        Share {
            name: &participant.name,
            id: &participant.id,
            weight: sanitize(weight),
        }
    }

    /// A share for an even split.
    pub fn even(participant: &'a Participant) -> Self {
        Share::new(participant, 1.0)
    }
}

/// Negative, NaN and infinite weights count as zero.
fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

fn compare_ties(a: &Share<'_>, b: &Share<'_>, tie_break: TieBreak) -> Ordering {
    let by_weight = match tie_break {
        TieBreak::Name => Ordering::Equal,
        TieBreak::LargerHours | TieBreak::LargerWeight => b.weight.total_cmp(&a.weight),
    };
    by_weight
        .then_with(|| a.name.cmp(b.name))
        .then_with(|| a.id.cmp(b.id))
}

// =============================================================================
// Apportionment
// =============================================================================

/// Splits `target` proportionally to the share weights, exactly.
///
/// Returns one amount per share, in the same order. The amounts always sum
/// to `target` (for `target >= 0` and a non-empty share list). When every
/// weight is zero the target is split evenly instead, so no cent is lost.
///
/// ## Example
/// ```rust
/// use tipsplit_core::money::Money;
/// use tipsplit_core::rounding::{apportion, Share, TieBreak};
///
/// let shares = [
///     Share { name: "Alex", id: "1", weight: 1.0 },
///     Share { name: "Bo", id: "2", weight: 1.0 },
///     Share { name: "Cy", id: "3", weight: 1.0 },
/// ];
/// let split = apportion(Money::from_cents(1000), &shares, TieBreak::Name);
/// let cents: Vec<i64> = split.iter().map(|m| m.cents()).collect();
/// assert_eq!(cents, vec![334, 333, 333]);
/// ```
pub fn apportion(target: Money, shares: &[Share<'_>], tie_break: TieBreak) -> Vec<Money> {
    if shares.is_empty() {
        return Vec::new();
    }
    if target.cents() <= 0 {
        return vec![Money::zero(); shares.len()];
    }

    let mut shares: Vec<Share<'_>> = shares.to_vec();
    let mut total_weight: f64 = shares.iter().map(|s| sanitize(s.weight)).sum();
    if !(total_weight.is_finite() && total_weight > 0.0) {
        for share in &mut shares {
            share.weight = 1.0;
        }
        total_weight = shares.len() as f64;
    }

    let target_f = target.cents() as f64;
    let mut floors = Vec::with_capacity(shares.len());
    let mut remainders = Vec::with_capacity(shares.len());
    for share in &shares {
        let exact = target_f * sanitize(share.weight) / total_weight;
        let (floor, remainder) = split_fraction(exact);
        floors.push(floor);
        remainders.push(remainder);
    }

    // Largest remainder first, context tie-break after that.
    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        remainders[b]
            .cmp(&remainders[a])
            .then_with(|| compare_ties(&shares[a], &shares[b], tie_break))
    });

    let leftover = target.cents() - floors.iter().sum::<i64>();
    if leftover > 0 {
        distribute(&mut floors, &order, leftover);
    } else if leftover < 0 {
        // Float overshoot: take back from the smallest remainders.
        let reversed: Vec<usize> = order.iter().rev().copied().collect();
        withdraw(&mut floors, &reversed, -leftover);
    }

    floors.into_iter().map(Money::from_cents).collect()
}

/// Fractional remainders are compared in units of 1e-9 of a cent.
const REMAINDER_SCALE: f64 = 1e9;

/// Splits a scaled share into whole cents and a quantized remainder.
///
/// Hours like 0.1 and 0.3 are not exact in binary, so two remainders that
/// are both half a cent on paper can differ in the last bit. Quantized,
/// they compare equal and the tie-break decides.
fn split_fraction(exact: f64) -> (i64, u64) {
    let floor = exact.floor();
    let units = ((exact - floor) * REMAINDER_SCALE).round();
    if units >= REMAINDER_SCALE {
        (floor as i64 + 1, 0)
    } else {
        (floor as i64, units as u64)
    }
}

/// Even split of `target` over the given participants, name tie-break.
pub fn split_evenly(target: Money, participants: &[&Participant]) -> Vec<Money> {
    let shares: Vec<Share<'_>> = participants.iter().map(|p| Share::even(p)).collect();
    apportion(target, &shares, TieBreak::Name)
}

// =============================================================================
// Cent Adjusters
// =============================================================================

/// Roster indices sorted by ascending name, then id.
pub fn name_order(participants: &[Participant]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..participants.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (&participants[a], &participants[b]);
        pa.name.cmp(&pb.name).then_with(|| pa.id.cmp(&pb.id))
    });
    order
}

/// Adds `count` cents, one per index in `order`, cycling as needed.
pub fn add_cents(amounts: &mut [Money], order: &[usize], count: i64) {
    let mut raw: Vec<i64> = amounts.iter().map(Money::cents).collect();
    distribute(&mut raw, order, count);
    write_back(amounts, &raw);
}

/// Removes up to `count` cents, one per index in `order`, skipping entries
/// already at zero. Returns how many cents were actually removed.
pub fn remove_cents(amounts: &mut [Money], order: &[usize], count: i64) -> i64 {
    let mut raw: Vec<i64> = amounts.iter().map(Money::cents).collect();
    let removed = withdraw(&mut raw, order, count);
    write_back(amounts, &raw);
    removed
}

/// Removes `excess` cents one at a time from whichever entry is currently
/// largest, breaking ties by ascending id.
///
/// Equivalent to the one-cent loop but computed with a water level, so a
/// large excess costs `O(n log max)` rather than `O(excess × n)`.
pub fn trim_largest(amounts: &mut [Money], ids: &[&str], excess: i64) {
    let available: i64 = amounts.iter().map(|m| m.cents().max(0)).sum();
    let excess = excess.min(available);
    if excess <= 0 {
        return;
    }

    let cut = |level: i64| -> i64 {
        amounts
            .iter()
            .map(|m| (m.cents() - level).max(0))
            .sum::<i64>()
    };

    // Largest level whose cut still covers the excess.
    let (mut low, mut high) = (0_i64, amounts.iter().map(Money::cents).max().unwrap_or(0));
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if cut(mid) >= excess {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    let level = low;

    // Everything above level+1 comes down to level+1 ...
    let mut remaining = excess - cut(level + 1);
    for amount in amounts.iter_mut() {
        if amount.cents() > level + 1 {
            *amount = Money::from_cents(level + 1);
        }
    }

    // ... then the smallest ids at level+1 drop one more cent.
    let mut at_top: Vec<usize> = (0..amounts.len())
        .filter(|&i| amounts[i].cents() == level + 1)
        .collect();
    at_top.sort_by(|&a, &b| ids[a].cmp(ids[b]).then(a.cmp(&b)));
    for idx in at_top {
        if remaining == 0 {
            break;
        }
        amounts[idx] -= Money::from_cents(1);
        remaining -= 1;
    }
}

fn distribute(raw: &mut [i64], order: &[usize], count: i64) {
    if order.is_empty() || count <= 0 {
        return;
    }
    let n = order.len() as i64;
    let (each, extra) = (count / n, count % n);
    for (position, &idx) in order.iter().enumerate() {
        raw[idx] += each + i64::from((position as i64) < extra);
    }
}

fn withdraw(raw: &mut [i64], order: &[usize], count: i64) -> i64 {
    let mut removed = 0;
    while removed < count {
        let mut progressed = false;
        for &idx in order {
            if removed == count {
                break;
            }
            if raw[idx] > 0 {
                raw[idx] -= 1;
                removed += 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    removed
}

fn write_back(amounts: &mut [Money], raw: &[i64]) {
    for (amount, &cents) in amounts.iter_mut().zip(raw) {
        *amount = Money::from_cents(cents);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
