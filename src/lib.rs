pub mod attack_graph;
pub mod board;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod heat_map;
pub mod pipeline;
pub mod regression;
pub mod storage;
pub mod viewer;

pub use attack_graph::{AttackGraph, SquareLinks};
pub use board::Board;
pub use dataset::{PositionReader, PositionRow};
pub use error::{AnalysisError, Result};
pub use evaluation::Evaluation;
pub use features::{FeatureExtractor, PiecePlacement, PositionFeatures, SquarePair};
pub use heat_map::{HeatMap, HeatMapAccumulator};
pub use pipeline::{aggregate_heat_map, build_attack_graphs, extract_features, BatchSummary};
pub use regression::{LinearModel, RegressionReport};
pub use storage::{AnalysisStore, PositionRecord};
pub use viewer::HeatMapViewer;

/// Logging setup shared by the binaries: `info` unless `RUST_LOG` says otherwise
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
