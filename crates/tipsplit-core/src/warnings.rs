//! Ordered, human-readable notices collected while a split runs.

use tracing::warn;

use crate::money::Money;

/// Accumulates warnings in the order the pipeline raises them.
///
/// Every push is mirrored to `tracing` so a subscriber sees the same notice
/// the caller receives.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(warning = %message, "split warning");
        self.0.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// `"40.00"` style amount for warning text.
pub(crate) fn amount(money: Money) -> String {
    money.to_decimal_string()
}

/// Percentages in warnings: at most three decimals, no trailing zeros.
pub(crate) fn percent(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// `"1 cent"` / `"3 cents"`.
pub(crate) fn cents(count: i64) -> String {
    if count == 1 {
        "1 cent".to_string()
    } else {
        format!("{count} cents")
    }
}
