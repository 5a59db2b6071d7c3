use anyhow::{Context, Result};
use chess_position_analysis::config::{self, ExtractConfig};
use chess_position_analysis::{extract_features, init_logging, AnalysisStore, PositionReader};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute positional features for the positions in a CSV", long_about = None)]
struct Args {
    /// CSV with a header row, FEN in column 0 and evaluation in column 1
    #[arg(long, default_value = config::DEFAULT_CSV_PATH)]
    csv: String,

    /// SQLite database to write to
    #[arg(long, default_value = config::DEFAULT_DB_PATH)]
    db: String,

    /// Maximum number of positions to read
    #[arg(short, long, default_value_t = config::POSITIONS_ANALYZED)]
    limit: usize,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let rows = PositionReader::from_path(&args.csv)
        .with_context(|| format!("opening position CSV {}", args.csv))?;
    let mut store = AnalysisStore::open(&args.db)
        .with_context(|| format!("opening store {}", args.db))?;

    let summary = extract_features(&mut store, rows, &ExtractConfig { limit: args.limit })
        .context("feature extraction aborted")?;
    println!(
        "Stored features for {} positions ({} skipped)",
        summary.processed, summary.skipped
    );
    Ok(())
}
