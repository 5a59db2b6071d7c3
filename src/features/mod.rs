//! Hand-crafted positional features.
//!
//! Every feature is a pure function of the board and is scored from white's
//! point of view: positive values favour white.

pub mod activity;
pub mod connectivity;
pub mod king_safety;
pub mod material;
pub mod placement;

use serde::{Deserialize, Serialize};

use crate::board::Board;

pub use activity::{central_control, mobility};
pub use connectivity::{connectivity, connectivity_breakdown, ConnectivityBreakdown};
pub use king_safety::king_safety;
pub use material::{material_balance, total_material};
pub use placement::{PiecePlacement, SquarePair};

/// Names of the scalar features fed to the regression, in column order
pub const SCALAR_FEATURE_NAMES: [&str; 5] = [
    "material",
    "mobility",
    "central_control",
    "king_safety",
    "connectivity",
];

/// Feature vector of one position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFeatures {
    pub material: i32,
    pub total_material: i32,
    pub mobility: i32,
    pub central_control: i32,
    pub king_safety: i32,
    pub connectivity: i32,
    pub placement: PiecePlacement,
}

impl PositionFeatures {
    /// Regression inputs, ordered as `SCALAR_FEATURE_NAMES`
    pub fn scalars(&self) -> [f64; 5] {
        [
            self.material as f64,
            self.mobility as f64,
            self.central_control as f64,
            self.king_safety as f64,
            self.connectivity as f64,
        ]
    }
}

/// Computes the full feature vector of a position
#[derive(Debug, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, board: &Board) -> PositionFeatures {
        PositionFeatures {
            material: material_balance(board),
            total_material: total_material(board),
            mobility: mobility(board),
            central_control: central_control(board),
            king_safety: king_safety(board),
            connectivity: connectivity(board),
            placement: PiecePlacement::from_board(board),
        }
    }
}
