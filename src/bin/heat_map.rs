use anyhow::{Context, Result};
use chess_position_analysis::config::{self, HeatMapConfig, RegressionConfig};
use chess_position_analysis::{aggregate_heat_map, init_logging, AnalysisStore};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Aggregate evaluation heat maps and fit the feature regression", long_about = None)]
struct Args {
    /// SQLite database holding extracted features
    #[arg(long, default_value = config::DEFAULT_DB_PATH)]
    db: String,

    /// Observations a square needs before its mean is kept
    #[arg(long, default_value_t = config::MIN_HEAT_MAP_SAMPLES)]
    min_samples: u32,

    /// Only positions with more total material than this are analysed
    #[arg(long, default_value_t = config::MIN_TOTAL_MATERIAL)]
    min_total_material: i32,

    /// Seed for the train/test shuffle
    #[arg(long, default_value_t = config::REGRESSION_SEED)]
    seed: u64,

    /// Share of positions held out to score the regression
    #[arg(long, default_value_t = config::REGRESSION_TEST_FRACTION)]
    test_fraction: f64,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut store = AnalysisStore::open(&args.db)
        .with_context(|| format!("opening store {}", args.db))?;

    let heat_config = HeatMapConfig {
        min_samples: args.min_samples,
        min_total_material: args.min_total_material,
    };
    let regression_config = RegressionConfig {
        seed: args.seed,
        test_fraction: args.test_fraction,
    };
    let summary = aggregate_heat_map(&mut store, &heat_config, &regression_config)
        .context("heat map aggregation aborted")?;

    println!(
        "{} positions loaded, {} mates, {} unreadable evaluations, {} aggregated",
        summary.positions_loaded,
        summary.mate_positions,
        summary.invalid_evaluations,
        summary.aggregated_positions
    );
    println!("{} heat map cells populated", summary.heat_map.populated_cells());
    match &summary.regression {
        Some(report) => println!("\n{}", report),
        None => println!("\nNot enough positions to fit the regression"),
    }
    Ok(())
}
