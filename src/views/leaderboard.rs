use super::{heading, new_table};
use crate::export::cell;
use analytics::{AnnualReturnRow, LeaderboardRow};
use serde_json::{Value, json};
use std::collections::BTreeSet;

pub fn render(rows: &[LeaderboardRow], annual: &[AnnualReturnRow]) -> String {
    let mut out = heading("Performance Leaderboard");
    if rows.is_empty() {
        out.push_str("No valid data to display in leaderboard.\n");
        return out;
    }

    let mut table = new_table(crate::export::LEADERBOARD_HEADER);
    for row in rows.iter().map(LeaderboardRow::rounded) {
        table.add_row(vec![
            row.ticker,
            cell(row.return_pct),
            cell(row.final_value),
            cell(row.annualized_return_pct),
            or_na(cell(row.annualized_volatility_pct)),
            or_na(cell(row.sharpe_ratio)),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&heading("Annual Returns by Year (%)"));
    out.push_str(&format!("{}\n", annual_table(annual)));
    out
}

fn or_na(text: String) -> String {
    if text.is_empty() { "n/a".to_string() } else { text }
}

/// One row per year, one column per ticker in first-seen order.
fn annual_table(annual: &[AnnualReturnRow]) -> comfy_table::Table {
    let mut tickers: Vec<&str> = Vec::new();
    for row in annual {
        if !tickers.contains(&row.ticker.as_str()) {
            tickers.push(&row.ticker);
        }
    }
    let years: BTreeSet<i32> = annual.iter().map(|r| r.year).collect();

    let mut header = vec!["Year".to_string()];
    header.extend(tickers.iter().map(|t| t.to_string()));
    let mut table = new_table(header);

    for year in years {
        let mut cells = vec![year.to_string()];
        for ticker in &tickers {
            let value = annual
                .iter()
                .find(|r| r.year == year && r.ticker == *ticker)
                .and_then(AnnualReturnRow::return_pct);
            cells.push(cell(value));
        }
        table.add_row(cells);
    }
    table
}

pub fn json(rows: &[LeaderboardRow], annual: &[AnnualReturnRow]) -> Value {
    let annual: Vec<Value> = annual
        .iter()
        .map(|r| json!({ "ticker": r.ticker, "year": r.year, "return_pct": r.return_pct() }))
        .collect();
    let leaderboard: Vec<_> = rows.iter().map(LeaderboardRow::rounded).collect();
    json!({ "view": "leaderboard", "leaderboard": leaderboard, "annual_returns": annual })
}
