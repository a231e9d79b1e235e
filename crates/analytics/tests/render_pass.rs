//! One full pass over several tickers, the way the dashboard drives the crate.

use analytics::{Aggregator, Analysis, Insight, MetricsEngine, simulate};
use chrono::{Duration, NaiveDate};
use core_types::PriceSeries;
use rust_decimal_macros::dec;

fn series(ticker: &str, closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2022, 12, 1).unwrap();
    PriceSeries::from_raw(
        ticker,
        closes
            .iter()
            .enumerate()
            .map(|(i, c)| (start + Duration::days(i as i64), Some(*c))),
    )
}

#[test]
fn empty_ticker_is_skipped_and_the_rest_still_render() {
    let engine = MetricsEngine::new();
    let aggregator = Aggregator::new();

    let growth: Vec<f64> = (0..90).map(|i| 100.0 * 1.002f64.powi(i)).collect();
    let choppy: Vec<f64> = (0..90)
        .map(|i| 50.0 + if i % 2 == 0 { 1.0 } else { -1.0 })
        .collect();
    let inputs = vec![
        series("GROW", &growth),
        PriceSeries::empty("GONE"),
        series("CHOP", &choppy),
    ];

    let analyses: Vec<Analysis> = inputs.iter().map(|s| engine.analyze(s, 20)).collect();
    assert!(matches!(&analyses[1], Analysis::Empty { ticker, valid_points: 0 } if ticker == "GONE"));

    let frames: Vec<_> = analyses.into_iter().filter_map(Analysis::into_frame).collect();
    assert_eq!(frames.len(), 2);

    let leaderboard = aggregator.leaderboard(&frames, dec!(1000)).unwrap();
    let tickers: Vec<&str> = leaderboard.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["GROW", "CHOP"]);

    // 90 consecutive calendar days from 2022-12-01 span two years.
    let annual = aggregator.annual_returns(&frames);
    assert_eq!(annual.len(), 4);
    assert_eq!(annual[0].year, 2022);
    assert_eq!(annual[1].year, 2023);

    for frame in &frames {
        let trajectory = simulate(frame, dec!(1000)).unwrap().unwrap();
        assert_eq!(trajectory.points.len(), frame.len());
        assert!(Insight::from_frame(frame).is_some());
    }
}

#[test]
fn leaderboard_final_value_matches_simulation() {
    let closes: Vec<f64> = (0..50).map(|i| 20.0 + (i as f64 * 0.5).cos()).collect();
    let frame = MetricsEngine::new().derive(&series("EQ", &closes), 10);

    let row = &Aggregator::new().leaderboard(&[frame.clone()], dec!(2500)).unwrap()[0];
    let trajectory = simulate(&frame, dec!(2500)).unwrap().unwrap();

    assert!((row.final_value - trajectory.final_value().unwrap()).abs() < 1e-6);
}
