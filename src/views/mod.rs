//! Terminal rendering of the four dashboard views.
//!
//! Every view is a pure function of a finished `RenderPass`, returning either
//! text for the terminal or a JSON value.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

pub mod asset;
pub mod insights;
pub mod leaderboard;
pub mod simulation;

pub(crate) fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.into_iter().map(Into::into).collect::<Vec<String>>());
    table
}

/// Two decimal places, or `n/a` when the value is undefined.
pub(crate) fn fixed(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "n/a".to_string(),
    }
}

pub(crate) fn heading(title: &str) -> String {
    format!("{}\n{}\n", title, "=".repeat(title.chars().count()))
}
