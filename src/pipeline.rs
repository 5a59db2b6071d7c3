//! The batch stages, each a single sequential pass over its input.
//!
//! A row that cannot be processed is logged and skipped; any other error aborts
//! the stage and the pending transaction is rolled back.

use log::{debug, info, warn};

use crate::attack_graph::AttackGraph;
use crate::board::Board;
use crate::config::{ExtractConfig, HeatMapConfig, RegressionConfig, PROGRESS_INTERVAL};
use crate::dataset::PositionRow;
use crate::error::{AnalysisError, Result};
use crate::evaluation::Evaluation;
use crate::features::{FeatureExtractor, SCALAR_FEATURE_NAMES};
use crate::heat_map::{HeatMap, HeatMapAccumulator};
use crate::regression::{self, RegressionReport, Sample};
use crate::storage::{AnalysisStore, PositionRecord};

/// Rows written and rows skipped by a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    fn skip(&mut self, error: AnalysisError) -> Result<()> {
        if !error.is_row_error() {
            return Err(error);
        }
        warn!("Skipping row: {}", error);
        self.skipped += 1;
        Ok(())
    }

    fn record_success(&mut self, stage: &str) {
        self.processed += 1;
        if self.processed % PROGRESS_INTERVAL == 0 {
            info!("{}: {} positions processed", stage, self.processed);
        }
    }
}

/// Computes the feature vector of each row and upserts it into `positions`
pub fn extract_features<I>(
    store: &mut AnalysisStore,
    rows: I,
    config: &ExtractConfig,
) -> Result<BatchSummary>
where
    I: IntoIterator<Item = Result<PositionRow>>,
{
    let extractor = FeatureExtractor::new();
    let mut summary = BatchSummary::default();
    let tx = store.transaction()?;

    info!("Extracting features from up to {} positions", config.limit);
    for row in rows.into_iter().take(config.limit) {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                summary.skip(e)?;
                continue;
            }
        };
        let board = match Board::from_fen(&row.fen) {
            Ok(board) => board,
            Err(e) => {
                summary.skip(e)?;
                continue;
            }
        };

        let record = PositionRecord {
            features: extractor.extract(&board),
            fen: row.fen,
            evaluation: row.evaluation,
        };
        debug!("{} -> {:?}", record.fen, record.features);
        tx.upsert_position(&record)?;
        summary.record_success("features");
    }

    tx.commit()?;
    info!(
        "Feature extraction finished: {} stored, {} skipped",
        summary.processed, summary.skipped
    );
    Ok(summary)
}

/// Builds the attack graph of each row and upserts it into `graph_connections`
pub fn build_attack_graphs<I>(
    store: &mut AnalysisStore,
    rows: I,
    config: &ExtractConfig,
) -> Result<BatchSummary>
where
    I: IntoIterator<Item = Result<PositionRow>>,
{
    let mut summary = BatchSummary::default();
    let tx = store.transaction()?;

    info!("Building attack graphs for up to {} positions", config.limit);
    for row in rows.into_iter().take(config.limit) {
        let (fen, board) = match row.and_then(|row| Board::from_fen(&row.fen).map(|board| (row.fen, board))) {
            Ok(parsed) => parsed,
            Err(e) => {
                summary.skip(e)?;
                continue;
            }
        };

        let graph = AttackGraph::from_board(&board);
        debug!("{}: {} edges", fen, graph.edge_count());
        tx.upsert_attack_graph(&fen, &graph)?;
        summary.record_success("attack graph");
    }

    tx.commit()?;
    info!(
        "Attack graph build finished: {} stored, {} skipped",
        summary.processed, summary.skipped
    );
    Ok(summary)
}

/// A stored position whose evaluation text parsed
#[derive(Debug, Clone)]
pub struct ClassifiedPosition {
    pub record: PositionRecord,
    pub evaluation: Evaluation,
}

impl ClassifiedPosition {
    pub fn is_mate(&self) -> bool {
        self.evaluation.is_mate()
    }

    pub fn score(&self) -> f64 {
        self.evaluation.score()
    }
}

/// Parses every evaluation. Unparsable ones are reported and dropped.
pub fn classify(records: Vec<PositionRecord>) -> (Vec<ClassifiedPosition>, usize) {
    let mut invalid = 0;
    let classified = records
        .into_iter()
        .filter_map(|record| match record.evaluation.parse::<Evaluation>() {
            Ok(evaluation) => Some(ClassifiedPosition { record, evaluation }),
            Err(e) => {
                warn!("{} ({}): treating evaluation as missing", e, record.fen);
                invalid += 1;
                None
            }
        })
        .collect();
    (classified, invalid)
}

/// Everything the heat map stage produced
#[derive(Debug, Clone)]
pub struct HeatMapSummary {
    pub positions_loaded: usize,
    pub invalid_evaluations: usize,
    pub mate_positions: usize,
    pub aggregated_positions: usize,
    pub heat_map: HeatMap,
    pub regression: Option<RegressionReport>,
}

/// Aggregates mean evaluation per (piece, color, square) over balanced,
/// non-mate positions, replaces the `heat_map` table, and fits the evaluation
/// regression on the same positions.
pub fn aggregate_heat_map(
    store: &mut AnalysisStore,
    heat_config: &HeatMapConfig,
    regression_config: &RegressionConfig,
) -> Result<HeatMapSummary> {
    let records = store.load_balanced_positions(heat_config.min_total_material)?;
    let positions_loaded = records.len();
    info!(
        "Loaded {} balanced positions with more than {} total material",
        positions_loaded, heat_config.min_total_material
    );

    let (classified, invalid_evaluations) = classify(records);
    let (mates, quiet): (Vec<_>, Vec<_>) = classified.into_iter().partition(|p| p.is_mate());
    let mate_positions = mates.len();

    let mut accumulator = HeatMapAccumulator::new();
    let mut aggregated_positions = 0;
    for position in quiet.iter().filter(|p| p.record.features.material == 0) {
        accumulator.add(&position.record.features.placement, position.score());
        aggregated_positions += 1;
    }
    let heat_map = accumulator.finish(heat_config.min_samples);

    let tx = store.transaction()?;
    tx.replace_heat_map(&heat_map)?;
    tx.commit()?;
    info!(
        "Heat map written: {} positions aggregated, {} cells populated",
        aggregated_positions,
        heat_map.populated_cells()
    );

    let samples: Vec<Sample<5>> = quiet
        .iter()
        .map(|p| Sample {
            features: p.record.features.scalars(),
            target: p.score(),
        })
        .collect();
    let regression = match regression::fit_and_evaluate(&samples, SCALAR_FEATURE_NAMES, regression_config) {
        Ok(report) => Some(report),
        Err(AnalysisError::Regression(reason)) => {
            warn!("Skipping regression over {} positions: {}", samples.len(), reason);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(HeatMapSummary {
        positions_loaded,
        invalid_evaluations,
        mate_positions,
        aggregated_positions,
        heat_map,
        regression,
    })
}
