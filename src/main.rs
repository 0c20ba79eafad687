use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shoal::{render::AsciiSurface, Scenario, ScenarioLoader};

const FRAME_COLUMNS: usize = 80;
const FRAME_ROWS: usize = 30;

#[derive(Debug, Parser)]
#[command(author, version, about = "Sharks, food and a fixed tick clock")]
struct Cli {
    /// Path to a scenario YAML file (built-in defaults when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override tick count
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Print an ASCII frame every N ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    render_every: u64,

    /// Print the final run summary as JSON
    #[arg(long)]
    summary_json: bool,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("shoal={}", cli.log_level())));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioLoader::new(".").load(path)?,
        None => Scenario::default(),
    };
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    let ticks = scenario.ticks(cli.ticks);

    let mut engine = scenario.build_engine();
    tracing::info!(
        scenario = engine.scenario_name(),
        description = scenario.description.as_deref().unwrap_or(""),
        ticks,
        "starting run"
    );
    let mut surface = AsciiSurface::new(scenario.world.bounds(), FRAME_COLUMNS, FRAME_ROWS);
    for _ in 0..ticks {
        let tick = engine.step();
        if cli.render_every > 0 && tick.tick % cli.render_every == 0 {
            surface.clear();
            engine.render(&mut surface);
            println!(
                "tick {} | food {} | sharks {}\n{surface}",
                tick.tick, tick.food, tick.sharks
            );
        }
    }

    let summary = engine.summary();
    if cli.summary_json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        println!("{json}");
    } else {
        println!(
            "Scenario '{}' completed {} ticks: {} eaten, {} expired, {} food and {} sharks alive",
            summary.scenario,
            summary.ticks,
            summary.eaten,
            summary.expired,
            summary.food,
            summary.sharks
        );
    }
    Ok(())
}
