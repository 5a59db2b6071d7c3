use anyhow::{Context, Result};
use chess_position_analysis::features::connectivity_breakdown;
use chess_position_analysis::heat_map::piece_name;
use chess_position_analysis::{init_logging, AttackGraph, Board, Evaluation, FeatureExtractor};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Print the positional features of a single position", long_about = None)]
struct Args {
    /// Position in Forsyth-Edwards Notation
    fen: String,

    /// Engine evaluation to classify alongside, e.g. +35 or #-3
    #[arg(long, allow_hyphen_values = true)]
    eval: Option<String>,

    /// Also print the attack graph of every occupied square
    #[arg(long)]
    graph: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let board = Board::from_fen(&args.fen).context("parsing FEN")?;
    let features = FeatureExtractor::new().extract(&board);
    let connectivity = connectivity_breakdown(&board);

    println!("Material:        {}", features.material);
    println!("Total material:  {}", features.total_material);
    println!("Mobility:        {}", features.mobility);
    println!("Central control: {}", features.central_control);
    println!("King safety:     {}", features.king_safety);
    println!(
        "Connectivity:    {} (white {}, black {})",
        features.connectivity, connectivity.white, connectivity.black
    );

    if let Some(text) = &args.eval {
        let evaluation: Evaluation = text.parse().context("parsing evaluation")?;
        println!(
            "Evaluation:      {} (mate: {}, score {})",
            evaluation,
            evaluation.is_mate(),
            evaluation.score()
        );
    }

    for (piece, pair) in features.placement.iter() {
        println!("{:<8} {:?} {:?}", piece_name(piece), pair.0, pair.1);
    }

    if args.graph {
        let graph = AttackGraph::from_board(&board);
        for square in chess::ALL_SQUARES {
            if board.get_piece_at(square).is_none() {
                continue;
            }
            let links = graph.links(square.to_index() as u8);
            println!("{}: attacks {:?}, attacked from {:?}", square, links.attacking, links.attacked);
        }
    }
    Ok(())
}
