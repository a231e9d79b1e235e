use super::{fixed, heading};
use crate::pass::{RenderPass, TickerStatus};
use analytics::Insight;
use serde_json::{Value, json};

fn insight_for(ticker: &str, status: &TickerStatus) -> Result<Insight, String> {
    match status {
        TickerStatus::Ready(frame) => {
            Insight::from_frame(frame).ok_or_else(|| format!("No valid data for {}.", ticker))
        }
        TickerStatus::Skipped(warning) => Err(warning.clone()),
    }
}

pub fn render(pass: &RenderPass) -> String {
    let mut out = heading("Insights");
    for (ticker, status) in &pass.tickers {
        match insight_for(ticker, status) {
            Ok(insight) => out.push_str(&render_insight(&insight)),
            Err(warning) => {
                out.push_str(&format!("\n## {}\nwarning: {}\n", ticker, warning));
            }
        }
    }
    out
}

fn render_insight(insight: &Insight) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n## {}\n", insight.ticker));
    out.push_str(&format!("- Current Price: {:.2}\n", insight.latest_close));
    out.push_str(&format!("- {}-day SMA: {}\n", insight.sma_window, fixed(insight.sma)));
    out.push_str(&format!("- Drawdown from Peak: {:.2}%\n", insight.drawdown_pct));
    out.push_str(&format!(
        "- Volatility (30-day annualized): {}%\n",
        fixed(insight.volatility_pct)
    ));
    out.push_str(&format!("\nInsight: {}\n", insight.narrative()));
    out
}

pub fn json(pass: &RenderPass) -> Value {
    let insights: Vec<Value> = pass
        .tickers
        .iter()
        .map(|(ticker, status)| match insight_for(ticker, status) {
            Ok(insight) => json!({
                "ticker": ticker,
                "narrative": insight.narrative(),
                "insight": insight,
            }),
            Err(warning) => json!({ "ticker": ticker, "warning": warning }),
        })
        .collect();
    json!({ "view": "insights", "tickers": insights })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use configuration::{Config, RenderRequest};

    #[test]
    fn skipped_tickers_print_their_warning() {
        let request = RenderRequest::builder(&Config::default())
            .tickers(["GONE"])
            .start(NaiveDate::from_ymd_opt(2024, 1, 1))
            .build(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
            .unwrap();
        let pass = RenderPass {
            request,
            tickers: vec![(
                "GONE".to_string(),
                TickerStatus::Skipped("No valid data for GONE.".to_string()),
            )],
        };

        assert!(render(&pass).contains("warning: No valid data for GONE."));
        assert_eq!(json(&pass)["tickers"][0]["warning"], "No valid data for GONE.");
    }
}
