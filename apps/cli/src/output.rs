//! Rendering of a `SplitResult` for stdout.

use anyhow::{Context, Result};
use tipsplit_core::SplitResult;

use crate::config::{OutputFormat, OutputSettings};

pub fn render(result: &SplitResult, settings: &OutputSettings) -> Result<String> {
    match settings.format {
        OutputFormat::Json => render_json(result, settings.pretty),
        OutputFormat::Table => Ok(render_table(result)),
    }
}

fn render_json(result: &SplitResult, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    };
    text.context("Failed to serialize split result")
}

/// Fixed-width table, one row per participant in roster order.
///
/// Participants without an amount (a rejected template) show `-`.
pub fn render_table(result: &SplitResult) -> String {
    let name_width = column_width("Name", result.participants.iter().map(|p| p.name.as_str()));
    let role_width = column_width("Role", result.participants.iter().map(|p| p.role.as_str()));

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_width$}  {:<role_width$}  {:>12}\n",
        "Name", "Role", "Amount"
    ));
    out.push_str(&format!(
        "{}  {}  {}\n",
        "-".repeat(name_width),
        "-".repeat(role_width),
        "-".repeat(12)
    ));

    for p in &result.participants {
        let amount = p
            .calculated_amount
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<name_width$}  {:<role_width$}  {:>12}\n",
            p.name, p.role, amount
        ));
    }

    if result.is_calculated() {
        out.push_str(&format!(
            "{:<name_width$}  {:<role_width$}  {:>12}\n",
            "Total",
            "",
            result.total().to_string()
        ));
    }

    for warning in &result.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }

    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}
