//! Defaults shared by the batch binaries.

pub const DEFAULT_DB_PATH: &str = "chess_analysis.db";
pub const DEFAULT_CSV_PATH: &str = "data/chessData.csv";

/// Rows read from the head of the position CSV
pub const POSITIONS_ANALYZED: usize = 200_000;

/// Observations a heat-map cell needs before its mean is reported
pub const MIN_HEAT_MAP_SAMPLES: u32 = 11;

/// Positions at or below this total material are left out of the analysis
pub const MIN_TOTAL_MATERIAL: i32 = 40;

pub const REGRESSION_SEED: u64 = 42;
pub const REGRESSION_TEST_FRACTION: f64 = 0.2;

/// Log progress every this many rows
pub const PROGRESS_INTERVAL: usize = 10_000;

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub limit: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            limit: POSITIONS_ANALYZED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeatMapConfig {
    pub min_samples: u32,
    pub min_total_material: i32,
}

impl Default for HeatMapConfig {
    fn default() -> Self {
        Self {
            min_samples: MIN_HEAT_MAP_SAMPLES,
            min_total_material: MIN_TOTAL_MATERIAL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegressionConfig {
    pub seed: u64,
    pub test_fraction: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            seed: REGRESSION_SEED,
            test_fraction: REGRESSION_TEST_FRACTION,
        }
    }
}
