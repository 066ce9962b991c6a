//! # Money Module
//!
//! Provides the `Money` type (integer cents) and the `PoolAmount` boundary
//! type that converts a caller's decimal pool into cents exactly once.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Splitting $10.00 three ways in floats:                                 │
//! │    3.3333... × 3 = 9.999999...  → which cent went where?                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1000 cents = 334 + 333 + 333                                         │
//! │    The leftover cent is handed out EXPLICITLY by the penny rounder      │
//! │                                                                         │
//! │  The pool is rounded to cents ONCE, at the boundary. Every sum after    │
//! │  that point is an i64 sum.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tipsplit_core::money::{Money, PoolAmount};
//!
//! let pool: PoolAmount = "100.005".parse().unwrap();
//! assert_eq!(pool.cents(), Money::from_cents(10001)); // half away from zero
//!
//! let share = Money::from_cents(10000).percentage(60.0);
//! assert_eq!(share.cents(), 6000);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Intermediate drift can be negative even though every
///   returned allocation is `>= 0`
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as a bare integer**: `calculatedAmount: 3334`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Takes `pct` percent of this amount, rounded half away from zero.
    ///
    /// This is the `round(cents × pct / 100)` step used by off-the-top
    /// targets and hybrid role targets. Each call is its own rounding point,
    /// so callers reconcile the sum of several calls afterwards.
    ///
    /// ## Example
    /// ```rust
    /// use tipsplit_core::money::Money;
    ///
    /// // 1001 × 50% = 500.5 → 501
    /// assert_eq!(Money::from_cents(1001).percentage(50.0).cents(), 501);
    /// ```
    pub fn percentage(&self, pct: f64) -> Money {
        if !pct.is_finite() || pct <= 0.0 {
            return Money::zero();
        }
        Money((self.0 as f64 * pct / 100.0).round() as i64)
    }

    /// Renders the amount as a plain decimal string (`"-5.50"`, `"10.00"`).
    ///
    /// This is the inverse of the pool conversion: a division by 100 with no
    /// currency symbol or grouping.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and the CLI table. Localized formatting belongs to
/// the front end.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Pool Amount
// =============================================================================

/// The pool as handed over by the caller, already converted to cents.
///
/// ## Conversion Rules
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  "100.00"   ──► digit arithmetic ──► 10000 cents (exact)               │
/// │  "100.005"  ──► third decimal ≥ 5 ──► 10001 cents (half away from 0)   │
/// │  100.5      ──► f64::round(x×100) ──► 10050 cents                       │
/// │  "-5.00"    ──► -500 cents, negative = true ──► Validator rejects      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Strings are preferred at the boundary: they never pass through binary
/// floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAmount {
    cents: Money,
    negative: bool,
}

/// Largest pool magnitude, in cents, that the boundary accepts.
///
/// 2^53 cents (about 90 trillion in major units). Every cent count up to
/// this converts to `f64` exactly, which the share math relies on.
pub const MAX_POOL_CENTS: i64 = 1 << 53;

impl PoolAmount {
    /// Wraps an amount that is already in cents.
    ///
    /// Not range-checked; validation rejects magnitudes above
    /// [`MAX_POOL_CENTS`].
    pub const fn from_cents(cents: i64) -> Self {
        PoolAmount {
            cents: Money::from_cents(cents),
            negative: cents < 0,
        }
    }

    /// Converts a major-unit float, rounding half away from zero.
    pub fn from_major_f64(value: f64) -> CoreResult<Self> {
        if !value.is_finite() {
            return Err(CoreError::InvalidPoolAmount {
                input: value.to_string(),
                reason: "amount must be finite".to_string(),
            });
        }

        let scaled = (value * 100.0).round();
        if scaled.abs() > MAX_POOL_CENTS as f64 {
            return Err(CoreError::InvalidPoolAmount {
                input: value.to_string(),
                reason: "amount is too large".to_string(),
            });
        }

        Ok(PoolAmount {
            cents: Money::from_cents(scaled as i64),
            negative: value < 0.0,
        })
    }

    /// Whether the magnitude is within [`MAX_POOL_CENTS`].
    #[inline]
    pub const fn is_in_range(&self) -> bool {
        self.cents.cents() >= -MAX_POOL_CENTS && self.cents.cents() <= MAX_POOL_CENTS
    }

    /// The pool in cents.
    #[inline]
    pub const fn cents(&self) -> Money {
        self.cents
    }

    /// Whether the caller's decimal was below zero.
    ///
    /// Tracked separately from the cents so that `"-0.001"` is still
    /// rejected even though it rounds to zero cents.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }
}

impl FromStr for PoolAmount {
    type Err = CoreError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidPoolAmount {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("expected a decimal number"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("expected a decimal number"));
        }

        let too_large = || invalid("amount is too large");

        let mut cents: i64 = 0;
        for digit in whole.bytes() {
            cents = cents
                .checked_mul(10)
                .and_then(|c| c.checked_add(i64::from(digit - b'0')))
                .ok_or_else(too_large)?;
        }
        cents = cents.checked_mul(100).ok_or_else(too_large)?;

        let mut digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = digits.next().is_some_and(|d| d >= 5);

        cents = cents
            .checked_add(tenths * 10 + hundredths + i64::from(round_up))
            .filter(|&c| c <= MAX_POOL_CENTS)
            .ok_or_else(too_large)?;

        let any_nonzero = whole.bytes().chain(fraction.bytes()).any(|b| b != b'0');

        Ok(PoolAmount {
            cents: Money::from_cents(if negative { -cents } else { cents }),
            negative: negative && any_nonzero,
        })
    }
}

impl fmt::Display for PoolAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cents.to_decimal_string())
    }
}

impl Serialize for PoolAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.cents.to_decimal_string())
    }
}

/// Accepts `"100.00"`, `100`, or `100.5`.
impl<'de> Deserialize<'de> for PoolAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PoolVisitor;

        impl<'de> Visitor<'de> for PoolVisitor {
            type Value = PoolAmount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PoolAmount, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PoolAmount, E> {
                v.checked_mul(100)
                    .map(PoolAmount::from_cents)
                    .filter(PoolAmount::is_in_range)
                    .ok_or_else(|| E::custom("amount is too large"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PoolAmount, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|v| v.checked_mul(100))
                    .map(PoolAmount::from_cents)
                    .filter(PoolAmount::is_in_range)
                    .ok_or_else(|| E::custom("amount is too large"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<PoolAmount, E> {
                PoolAmount::from_major_f64(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PoolVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
