use super::{heading, new_table};
use crate::pass::RenderPass;
use analytics::{AnalyticsError, PortfolioTrajectory, simulate};
use serde_json::{Value, json};

/// Trajectories for every ticker with enough data, in selection order.
pub fn trajectories(pass: &RenderPass) -> Result<Vec<PortfolioTrajectory>, AnalyticsError> {
    let mut out = Vec::new();
    for frame in pass.frames() {
        match simulate(&frame, pass.request.initial_investment)? {
            Some(trajectory) => out.push(trajectory),
            None => tracing::debug!(ticker = frame.ticker(), "Too few returns to simulate."),
        }
    }
    Ok(out)
}

pub fn render(pass: &RenderPass, trajectories: &[PortfolioTrajectory]) -> String {
    let mut out = heading("Portfolio Simulation (Individual Ticker Evolution)");
    if trajectories.is_empty() {
        out.push_str("No ticker has enough data to simulate.\n");
        return out;
    }

    let mut table = new_table([
        "Ticker", "From", "To", "Invested", "Final Value", "Peak Value", "Lowest Value",
    ]);
    for trajectory in trajectories {
        let (Some((from, _)), Some((to, _))) = (trajectory.points.first(), trajectory.points.last()) else {
            continue;
        };
        let values = trajectory.points.iter().map(|(_, v)| *v);
        let peak = values.clone().fold(f64::NEG_INFINITY, f64::max);
        let low = values.fold(f64::INFINITY, f64::min);

        table.add_row(vec![
            trajectory.ticker.clone(),
            from.to_string(),
            to.to_string(),
            format!("{:.2}", pass.request.initial_investment),
            format!("{:.2}", trajectory.final_value().unwrap_or_default()),
            format!("{:.2}", peak),
            format!("{:.2}", low),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn json(trajectories: &[PortfolioTrajectory]) -> Value {
    json!({ "view": "simulation", "trajectories": trajectories })
}
