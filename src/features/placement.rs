use chess::{BitBoard, Color, Piece, ALL_PIECES};
use serde::{Deserialize, Serialize};

use crate::board::Board;

/// Square indices of one piece type, white list first then black.
/// Serialises as `[[white...], [black...]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquarePair(pub Vec<u8>, pub Vec<u8>);

impl SquarePair {
    pub fn for_color(&self, color: Color) -> &[u8] {
        match color {
            Color::White => &self.0,
            Color::Black => &self.1,
        }
    }
}

fn indices(squares: BitBoard) -> Vec<u8> {
    // BitBoard iterates from a1 upwards, so the list comes out ascending
    squares.map(|square| square.to_index() as u8).collect()
}

/// Where every piece type stands, per color
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiecePlacement {
    pub pawns: SquarePair,
    pub knights: SquarePair,
    pub bishops: SquarePair,
    pub rooks: SquarePair,
    pub queens: SquarePair,
    pub kings: SquarePair,
}

impl PiecePlacement {
    pub fn from_board(board: &Board) -> Self {
        let pair = |piece: Piece| {
            SquarePair(
                indices(board.pieces(piece, Color::White)),
                indices(board.pieces(piece, Color::Black)),
            )
        };

        Self {
            pawns: pair(Piece::Pawn),
            knights: pair(Piece::Knight),
            bishops: pair(Piece::Bishop),
            rooks: pair(Piece::Rook),
            queens: pair(Piece::Queen),
            kings: pair(Piece::King),
        }
    }

    pub fn get(&self, piece: Piece) -> &SquarePair {
        match piece {
            Piece::Pawn => &self.pawns,
            Piece::Knight => &self.knights,
            Piece::Bishop => &self.bishops,
            Piece::Rook => &self.rooks,
            Piece::Queen => &self.queens,
            Piece::King => &self.kings,
        }
    }

    pub fn squares(&self, piece: Piece, color: Color) -> &[u8] {
        self.get(piece).for_color(color)
    }

    /// Pairs in pawn..king order
    pub fn iter(&self) -> impl Iterator<Item = (Piece, &SquarePair)> + '_ {
        ALL_PIECES.iter().map(move |&piece| (piece, self.get(piece)))
    }
}
