//! # Domain Types
//!
//! Wire-level types shared between the engine and its callers.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  SplitTemplate  │   │   Participant   │   │   SplitResult   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  participants   │──►│  id (opaque)    │◄──│  participants   │       │
//! │  │  rule           │   │  name, role     │   │  warnings       │       │
//! │  │  offTheTop      │   │  hours? weight? │   └─────────────────┘       │
//! │  │  roleWeights    │   │  calculatedAmt? │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────────────────────┐         │
//! │  │  OffTheTopRule  │   │  SplitRule (exactly one active)      │         │
//! │  │  role, pct      │   │  Equal | Percentage | HoursBased     │         │
//! │  └─────────────────┘   │  RoleWeighted{weights} | Hybrid{..}  │         │
//! │                        └─────────────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Legacy Rule Names
//! Templates saved by older app builds use other spellings for the rule tag
//! (`"hours_based"`, `"hoursBased"`, `"hours"`, `"percent"`, ...). Those are
//! accepted here through serde aliases so the engine only ever sees the enum.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;

/// Normalizes a free-text role for case-insensitive comparison.
pub fn role_key(role: &str) -> String {
    role.trim().to_lowercase()
}

// =============================================================================
// Participant
// =============================================================================

/// One person sharing the pool.
///
/// Everything except `calculated_amount` is caller input. The engine never
/// writes to the caller's value: it returns a clone with the amount filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Stable, opaque identifier. Used as the final tie-break.
    pub id: String,

    /// Display name. Primary tie-break for leftover cents.
    pub name: String,

    /// Free-text staff category, matched case-insensitively.
    #[serde(default)]
    pub role: String,

    /// Hours worked (for hours-based splits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,

    /// Explicit percentage weight (for percentage splits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Amount awarded, in cents. Filled by the engine only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_amount: Option<Money>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Participant {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            hours: None,
            weight: None,
            calculated_amount: None,
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hours = Some(hours);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Case-insensitive role comparison.
    pub fn has_role(&self, role: &str) -> bool {
        role_key(&self.role) == role_key(role)
    }
}

// =============================================================================
// Off-The-Top Rule
// =============================================================================

/// A deduction for one role, taken before the main rule runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OffTheTopRule {
    pub role: String,
    /// Percent of the whole pool. The set may total more than 100.
    pub percentage: f64,
}

impl OffTheTopRule {
    pub fn new(role: impl Into<String>, percentage: f64) -> Self {
        OffTheTopRule {
            role: role.into(),
            percentage,
        }
    }
}

// =============================================================================
// Split Rule
// =============================================================================

/// The strategy applied to whatever is left after off-the-top deductions.
///
/// ## Wire Format
/// ```json
/// {"type": "equal"}
/// {"type": "hours_based"}
/// {"type": "role_weighted", "weights": {"server": 70, "busser": 30}}
/// {"type": "hybrid", "formula": "server:60, busser:40"}
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SplitRule {
    /// Everyone gets the same amount.
    #[default]
    #[serde(alias = "even", alias = "equal_split", alias = "equalSplit")]
    Equal,

    /// Per-participant weights, else the template's role weights.
    #[serde(alias = "percent", alias = "weighted", alias = "custom_percentage")]
    Percentage,

    /// Proportional to hours worked.
    #[serde(alias = "hoursBased", alias = "hours", alias = "hourly")]
    HoursBased,

    /// Proportional to a per-role weight table.
    #[serde(alias = "roleWeighted", alias = "role_based", alias = "roleBased")]
    RoleWeighted {
        #[serde(default)]
        weights: BTreeMap<String, f64>,
    },

    /// Per-role percentage formula, e.g. `"server:60, busser:40"`.
    #[serde(alias = "custom", alias = "formula")]
    Hybrid {
        #[serde(default)]
        formula: String,
    },
}

impl SplitRule {
    /// Short stable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SplitRule::Equal => "equal",
            SplitRule::Percentage => "percentage",
            SplitRule::HoursBased => "hours_based",
            SplitRule::RoleWeighted { .. } => "role_weighted",
            SplitRule::Hybrid { .. } => "hybrid",
        }
    }
}

impl fmt::Display for SplitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Split Template
// =============================================================================

/// Everything the caller supplies besides the pool amount.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SplitTemplate {
    #[serde(default)]
    pub participants: Vec<Participant>,

    #[serde(default)]
    pub rule: SplitRule,

    #[serde(default, alias = "off_the_top")]
    pub off_the_top: Vec<OffTheTopRule>,

    /// Role → percentage, consulted by the `Percentage` rule.
    #[serde(default, alias = "role_weights")]
    pub role_weights: BTreeMap<String, f64>,
}

impl SplitTemplate {
    pub fn new(participants: Vec<Participant>, rule: SplitRule) -> Self {
        SplitTemplate {
            participants,
            rule,
            ..Default::default()
        }
    }

    pub fn with_off_the_top(mut self, rules: Vec<OffTheTopRule>) -> Self {
        self.off_the_top = rules;
        self
    }

    pub fn with_role_weights(mut self, weights: BTreeMap<String, f64>) -> Self {
        self.role_weights = weights;
        self
    }

    /// Decodes a template from JSON, including legacy rule spellings.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Split Result
// =============================================================================

/// What the engine hands back.
///
/// `warnings` is ordered: it reflects the order in which the pipeline
/// stages noticed each anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SplitResult {
    pub participants: Vec<Participant>,
    pub warnings: Vec<String>,
}

impl SplitResult {
    /// Sum of all calculated amounts (zero when validation failed).
    pub fn total(&self) -> Money {
        self.participants
            .iter()
            .filter_map(|p| p.calculated_amount)
            .sum()
    }

    /// Calculated amount for the participant with `id`.
    pub fn amount_for(&self, id: &str) -> Option<Money> {
        self.participants
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| p.calculated_amount)
    }

    /// True when the engine actually ran (amounts are populated).
    pub fn is_calculated(&self) -> bool {
        !self.participants.is_empty()
            && self.participants.iter().all(|p| p.calculated_amount.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
