use chess::{Color, Piece};

use crate::attack_graph::NUM_SQUARES;
use crate::features::PiecePlacement;

/// One heat map series: a piece type of one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSeries {
    pub color: Color,
    pub piece: Piece,
}

impl PieceSeries {
    const fn new(color: Color, piece: Piece) -> Self {
        Self { color, piece }
    }

    /// Store column name, e.g. `white_pawn`
    pub fn column_name(&self) -> String {
        format!("{}_{}", color_name(self.color), piece_name(self.piece))
    }

    /// Display title, e.g. `White pawn`
    pub fn title(&self) -> String {
        let color = match self.color {
            Color::White => "White",
            Color::Black => "Black",
        };
        format!("{} {}", color, piece_name(self.piece))
    }
}

pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

pub fn piece_name(piece: Piece) -> &'static str {
    match piece {
        Piece::Pawn => "pawn",
        Piece::Knight => "knight",
        Piece::Bishop => "bishop",
        Piece::Rook => "rook",
        Piece::Queen => "queen",
        Piece::King => "king",
    }
}

/// The twelve series in store column order
pub const SERIES: [PieceSeries; 12] = [
    PieceSeries::new(Color::White, Piece::Pawn),
    PieceSeries::new(Color::White, Piece::Knight),
    PieceSeries::new(Color::White, Piece::Bishop),
    PieceSeries::new(Color::White, Piece::Rook),
    PieceSeries::new(Color::White, Piece::Queen),
    PieceSeries::new(Color::White, Piece::King),
    PieceSeries::new(Color::Black, Piece::Pawn),
    PieceSeries::new(Color::Black, Piece::Knight),
    PieceSeries::new(Color::Black, Piece::Bishop),
    PieceSeries::new(Color::Black, Piece::Rook),
    PieceSeries::new(Color::Black, Piece::Queen),
    PieceSeries::new(Color::Black, Piece::King),
];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Running sums and counts of evaluation per (series, square)
#[derive(Debug, Clone)]
pub struct HeatMapAccumulator {
    sum: [[f64; NUM_SQUARES]; 12],
    count: [[u32; NUM_SQUARES]; 12],
}

impl HeatMapAccumulator {
    pub fn new() -> Self {
        Self {
            sum: [[0.0; NUM_SQUARES]; 12],
            count: [[0; NUM_SQUARES]; 12],
        }
    }

    /// Credits `score` to every occupied (series, square) of the position
    pub fn add(&mut self, placement: &PiecePlacement, score: f64) {
        for (series_index, series) in SERIES.iter().enumerate() {
            for &square in placement.squares(series.piece, series.color) {
                self.sum[series_index][square as usize] += score;
                self.count[series_index][square as usize] += 1;
            }
        }
    }

    pub fn count(&self, series_index: usize, square: usize) -> u32 {
        self.count[series_index][square]
    }

    /// Means rounded to two decimals; cells with fewer than `min_samples`
    /// observations stay empty.
    pub fn finish(&self, min_samples: u32) -> HeatMap {
        let mut heat_map = HeatMap::empty();
        for series_index in 0..SERIES.len() {
            for square in 0..NUM_SQUARES {
                let count = self.count[series_index][square];
                if count > 0 && count >= min_samples {
                    let mean = round2(self.sum[series_index][square] / count as f64);
                    heat_map.set(series_index, square, Some(mean));
                }
            }
        }
        heat_map
    }
}

impl Default for HeatMapAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Mean evaluation per (series, square), `None` where the data is too thin
#[derive(Debug, Clone, PartialEq)]
pub struct HeatMap {
    means: Vec<[Option<f64>; NUM_SQUARES]>,
}

impl HeatMap {
    pub fn empty() -> Self {
        Self {
            means: vec![[None; NUM_SQUARES]; SERIES.len()],
        }
    }

    pub fn mean(&self, series_index: usize, square: usize) -> Option<f64> {
        self.means[series_index][square]
    }

    pub fn set(&mut self, series_index: usize, square: usize, mean: Option<f64>) {
        self.means[series_index][square] = mean;
    }

    /// The 64 means of one series, indexed by square
    pub fn series(&self, series_index: usize) -> &[Option<f64>; NUM_SQUARES] {
        &self.means[series_index]
    }

    pub fn populated_cells(&self) -> usize {
        self.means.iter().flatten().filter(|mean| mean.is_some()).count()
    }
}
