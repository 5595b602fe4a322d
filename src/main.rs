use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use annals::{scenario::ScenarioLoader, Simulation};

#[derive(Debug, Parser)]
#[command(author, version, about = "Runs a chronicle scenario on the annals ECS")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/first_age.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Log filter used when RUST_LOG is unset (defaults to the scenario's level)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| scenario.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();

    let ticks = scenario.ticks(cli.ticks);
    let mut simulation = Simulation::from_scenario(&scenario)?;
    simulation.run_with_hook(ticks, |report| {
        if report.tick % 25 == 0 {
            info!(tick = report.tick, "progress");
        }
    })?;

    let summary = simulation.summary()?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for entry in &summary.entries {
            println!("{entry}");
        }
        println!(
            "Scenario '{}' completed for {} ticks. Year {}: {} living, {} deceased.",
            summary.scenario, summary.ticks, summary.year, summary.living, summary.deceased
        );
    }
    if let Some(average) = simulation.systems().average_tick_time() {
        info!(?average, "average tick time");
    }
    Ok(())
}
