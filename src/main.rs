mod cli;
mod export;
mod pass;
mod telemetry;
mod views;

use analytics::{Aggregator, AnnualReturnRow, LeaderboardRow};
use api_client::{FileSource, MarketData, MarketDataFetcher, YahooClient};
use chrono::NaiveDate;
use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands, DashboardArgs, EarliestArgs, LeaderboardArgs, SelectionArgs};
use configuration::{Config, View, ViewToggles, load_config};
use pass::RenderPass;
use serde_json::Value;
use std::path::Path;

type Market = MarketData<Box<dyn MarketDataFetcher>>;

/// The main entry point for the market dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional; it only seeds DASHBOARD__* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let _guard = telemetry::init(&config.logging);
    let today = chrono::Local::now().date_naive();

    let result = match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &config, cli.json, today).await,
        Commands::Leaderboard(args) => handle_leaderboard(args, &config, cli.json, today).await,
        Commands::Simulate(args) => handle_simulate(args, &config, cli.json, today).await,
        Commands::Insights(args) => handle_insights(args, &config, cli.json, today).await,
        Commands::Dashboard(args) => handle_dashboard(args, &config, cli.json, today).await,
        Commands::Earliest(args) => handle_earliest(args, &config).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Command failed.");
    }
    result
}

fn market(data_dir: Option<&Path>, config: &Config) -> anyhow::Result<Market> {
    let fetcher: Box<dyn MarketDataFetcher> = match data_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Reading prices from local CSV files.");
            Box::new(FileSource::new(dir))
        }
        None => Box::new(YahooClient::new(&config.provider)?),
    };
    Ok(MarketData::new(fetcher, config.defaults.fallback_start_date))
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_pass(
    selection: &SelectionArgs,
    config: &Config,
    views: Option<ViewToggles>,
    today: NaiveDate,
) -> anyhow::Result<RenderPass> {
    let market = market(selection.data_dir.as_deref(), config)?;
    RenderPass::run(&market, config, selection, views, today).await
}

fn leaderboard_rows(pass: &RenderPass) -> anyhow::Result<(Vec<LeaderboardRow>, Vec<AnnualReturnRow>)> {
    let frames = pass.frames();
    let aggregator = Aggregator::new();
    let rows = aggregator.leaderboard(&frames, pass.request.initial_investment)?;
    let annual = aggregator.annual_returns(&frames);
    Ok((rows, annual))
}

async fn handle_analyze(args: AnalyzeArgs, config: &Config, json: bool, today: NaiveDate) -> anyhow::Result<()> {
    let pass = run_pass(&args.selection, config, None, today).await?;

    if let Some(dir) = &args.series_dir {
        std::fs::create_dir_all(dir)?;
        for frame in pass.frames() {
            let path = export::write_frame_file(dir, &frame)?;
            tracing::info!(ticker = frame.ticker(), path = %path.display(), "Wrote metrics series.");
        }
    }

    if json {
        print_json(&views::asset::json(&pass))
    } else {
        print!("{}", views::asset::render(&pass, args.rows));
        Ok(())
    }
}

async fn handle_leaderboard(
    args: LeaderboardArgs,
    config: &Config,
    json: bool,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let pass = run_pass(&args.selection, config, None, today).await?;
    let (rows, annual) = leaderboard_rows(&pass)?;

    if let Some(path) = &args.export {
        export::write_leaderboard_file(path, &rows)?;
    }

    if json {
        print_json(&views::leaderboard::json(&rows, &annual))
    } else {
        print!("{}", views::leaderboard::render(&rows, &annual));
        Ok(())
    }
}

async fn handle_simulate(
    selection: SelectionArgs,
    config: &Config,
    json: bool,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let pass = run_pass(&selection, config, None, today).await?;
    let trajectories = views::simulation::trajectories(&pass)?;

    if json {
        print_json(&views::simulation::json(&trajectories))
    } else {
        print!("{}", views::simulation::render(&pass, &trajectories));
        Ok(())
    }
}

async fn handle_insights(
    selection: SelectionArgs,
    config: &Config,
    json: bool,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let pass = run_pass(&selection, config, None, today).await?;

    if json {
        print_json(&views::insights::json(&pass))
    } else {
        print!("{}", views::insights::render(&pass));
        Ok(())
    }
}

/// Every enabled view over a single render pass, in dashboard order.
async fn handle_dashboard(
    args: DashboardArgs,
    config: &Config,
    json: bool,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let toggles = if args.views.is_empty() {
        config.views
    } else {
        config.views.only(&args.views)
    };
    let pass = run_pass(&args.selection, config, Some(toggles), today).await?;
    let toggles = &pass.request.views;

    let mut sections = Vec::new();
    let mut documents = Vec::new();

    if toggles.is_enabled(View::Analysis) {
        sections.push(views::asset::render(&pass, args.rows));
        documents.push(views::asset::json(&pass));
    }
    if toggles.is_enabled(View::Leaderboard) {
        let (rows, annual) = leaderboard_rows(&pass)?;
        sections.push(views::leaderboard::render(&rows, &annual));
        documents.push(views::leaderboard::json(&rows, &annual));
    }
    if toggles.is_enabled(View::Simulation) {
        let trajectories = views::simulation::trajectories(&pass)?;
        sections.push(views::simulation::render(&pass, &trajectories));
        documents.push(views::simulation::json(&trajectories));
    }
    if toggles.is_enabled(View::Insights) {
        sections.push(views::insights::render(&pass));
        documents.push(views::insights::json(&pass));
    }

    if json {
        return print_json(&Value::Array(documents));
    }
    if sections.is_empty() {
        println!("Every view is switched off; nothing to show.");
    } else {
        println!("{}", sections.join("\n"));
    }
    Ok(())
}

async fn handle_earliest(args: EarliestArgs, config: &Config) -> anyhow::Result<()> {
    let ticker = core_types::normalize_ticker(&args.ticker)?;
    let market = market(args.data_dir.as_deref(), config)?;
    let earliest = market.earliest_date(&ticker).await;
    println!("{}: {}", ticker, earliest);
    Ok(())
}
