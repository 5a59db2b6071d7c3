use anyhow::{Context, Result};
use chess_position_analysis::config;
use chess_position_analysis::{init_logging, AnalysisStore, HeatMapViewer};
use clap::Parser;
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(author, version, about = "Page through the stored evaluation heat maps", long_about = None)]
struct Args {
    /// SQLite database holding the heat map
    #[arg(long, default_value = config::DEFAULT_DB_PATH)]
    db: String,

    /// Open a window instead of paging in the terminal
    #[cfg(feature = "gui")]
    #[arg(long)]
    gui: bool,
}

fn run_terminal(mut viewer: HeatMapViewer) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("\n{}", viewer.render());
        print!("n/next, p/back, q/quit: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        match line?.trim() {
            "n" | "next" | "" => viewer.next(),
            "b" | "back" | "p" => viewer.previous(),
            "q" | "quit" => break,
            other => println!("Unknown command: {}", other),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let store = AnalysisStore::open(&args.db)
        .with_context(|| format!("opening store {}", args.db))?;
    let heat_map = store.load_heat_map().context("loading heat map")?;
    let viewer = HeatMapViewer::new(&heat_map);

    #[cfg(feature = "gui")]
    {
        if args.gui {
            return chess_position_analysis::viewer::gui::run(viewer);
        }
    }

    run_terminal(viewer)
}
