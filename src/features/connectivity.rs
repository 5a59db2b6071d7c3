use chess::{Color, Piece};
use serde::{Deserialize, Serialize};

use crate::board::Board;

/// Weight a defender contributes to connectivity. Cheap defenders count most;
/// the king never counts.
pub fn defender_weight(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 50,
        Piece::Knight => 35,
        Piece::Bishop => 30,
        Piece::Rook => 10,
        Piece::Queen => 4,
        Piece::King => 0,
    }
}

/// Per-color connectivity before the two sides are netted off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityBreakdown {
    pub white: i32,
    pub black: i32,
}

impl ConnectivityBreakdown {
    pub fn net(&self) -> i32 {
        self.white - self.black
    }
}

pub fn connectivity_breakdown(board: &Board) -> ConnectivityBreakdown {
    let mut breakdown = ConnectivityBreakdown::default();

    for square in chess::ALL_SQUARES {
        let Some(color) = board.get_color_at(square) else { continue };

        let support: i32 = board
            .attackers(color, square)
            .filter_map(|defender| board.get_piece_at(defender))
            .map(defender_weight)
            .sum();

        match color {
            Color::White => breakdown.white += support,
            Color::Black => breakdown.black += support,
        }
    }

    breakdown
}

/// Weighted count of pieces defending friendly pieces, white minus black
pub fn connectivity(board: &Board) -> i32 {
    connectivity_breakdown(board).net()
}
