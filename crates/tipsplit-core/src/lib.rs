//! # tipsplit-core: Tip Split Allocation Engine
//!
//! Divides an integer-cent pool among participants under a named strategy,
//! optionally after off-the-top role deductions, so that the distributed
//! total equals the pool to the cent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tip Split Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Mobile app / CLI (external callers)                    │   │
//! │  │    onboarding chat ──► template ──► charts, payouts             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ SplitTemplate + PoolAmount             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tipsplit-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   validation ─► off_the_top ─► allocator ─► reconcile           │   │
//! │  │                        │            │                           │   │
//! │  │                        └─ rounding ─┘      formula              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO RANDOMNESS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Participant, rules, template, result
//! - [`money`] - Integer cents and the pool conversion
//! - [`error`] - Boundary and validation errors
//! - [`validation`] - First-failure precondition checks
//! - [`rounding`] - Largest-remainder apportionment and cent adjusters
//! - [`off_the_top`] - Role deductions before the main split
//! - [`allocator`] - Equal / percentage / hours / role / hybrid strategies
//! - [`formula`] - Hybrid `role:pct` parser
//! - [`reconcile`] - Final drift correction
//! - [`engine`] - [`compute_split`]
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same cents, same warnings
//! 2. **Integer Money**: one rounding point (the pool), then i64 sums only
//! 3. **Soft Failure**: invalid input becomes a warning, never a panic
//! 4. **Fixed Tie-Breaks**: who gets the odd cent is part of the contract
//!
//! ## Example Usage
//!
//! ```rust
//! use tipsplit_core::{compute_split, OffTheTopRule, Participant, PoolAmount, SplitRule, SplitTemplate};
//!
//! let template = SplitTemplate::new(
//!     vec![
//!         Participant::new("1", "Alex", "server"),
//!         Participant::new("2", "Bo", "busser"),
//!     ],
//!     SplitRule::Hybrid { formula: "server:60".to_string() },
//! )
//! .with_off_the_top(vec![OffTheTopRule::new("busser", 10.0)]);
//!
//! let result = compute_split(&template, "100.00".parse::<PoolAmount>().unwrap());
//! assert_eq!(result.total().cents(), 10000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocator;
pub mod engine;
pub mod error;
pub mod formula;
pub mod money;
pub mod off_the_top;
pub mod reconcile;
pub mod rounding;
pub mod types;
pub mod validation;
pub mod warnings;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{check_split, compute_split, compute_split_json};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, PoolAmount, MAX_POOL_CENTS};
pub use types::*;
pub use warnings::Warnings;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// How far a percentage weight total may stray from 100 before the
/// normalization warning is raised.
pub const NORMALIZATION_EPSILON: f64 = 0.001;
