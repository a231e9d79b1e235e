use super::{fixed, heading, new_table};
use crate::pass::{RenderPass, TickerStatus};
use analytics::MetricsFrame;
use configuration::ViewToggles;
use serde_json::{Value, json};

/// Per-ticker analysis: the most recent `rows` rows of each frame, with the
/// columns switched on in the view toggles.
pub fn render(pass: &RenderPass, rows: usize) -> String {
    let mut out = heading("Asset Analysis");
    for (ticker, status) in &pass.tickers {
        out.push_str(&format!("\n## {}\n", ticker));
        match status {
            TickerStatus::Ready(frame) => out.push_str(&render_frame(frame, &pass.request.views, rows)),
            TickerStatus::Skipped(warning) => {
                out.push_str(&format!("warning: {}\n", warning));
            }
        }
    }
    out
}

fn render_frame(frame: &MetricsFrame, views: &ViewToggles, rows: usize) -> String {
    let mut out = String::new();
    if let Some((first, last)) = frame.date_span() {
        out.push_str(&format!("Data available from {} to {}\n", first, last));
    }

    let show_sma = views.show_price && views.show_sma;
    let mut header = vec!["Date".to_string()];
    if views.show_price {
        header.push("Close".to_string());
    }
    if show_sma {
        header.push(format!("SMA{}", frame.sma_window()));
    }
    if views.show_volatility {
        header.push("Rolling Volatility 30d (%)".to_string());
    }
    if views.show_drawdown {
        header.push("Drawdown (%)".to_string());
    }

    let mut table = new_table(header);
    let skip = frame.len().saturating_sub(rows);
    for row in &frame.rows()[skip..] {
        let mut cells = vec![row.date.to_string()];
        if views.show_price {
            cells.push(format!("{:.2}", row.close));
        }
        if show_sma {
            cells.push(fixed(row.moving_average));
        }
        if views.show_volatility {
            cells.push(fixed(row.rolling_volatility.map(|v| v * 100.0)));
        }
        if views.show_drawdown {
            cells.push(fixed(Some(row.drawdown * 100.0)));
        }
        table.add_row(cells);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn json(pass: &RenderPass) -> Value {
    let tickers: Vec<Value> = pass
        .tickers
        .iter()
        .map(|(ticker, status)| match status {
            TickerStatus::Ready(frame) => json!({ "ticker": ticker, "frame": frame }),
            TickerStatus::Skipped(warning) => json!({ "ticker": ticker, "warning": warning }),
        })
        .collect();
    json!({ "view": "analysis", "tickers": tickers })
}
