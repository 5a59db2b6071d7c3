use chess::{Color, Piece};

use crate::board::Board;

const PAWN_VALUE: i32 = 1;
const KNIGHT_VALUE: i32 = 3;
const BISHOP_VALUE: i32 = 3;
const ROOK_VALUE: i32 = 5;
const QUEEN_VALUE: i32 = 9;
const KING_VALUE: i32 = 0; // King's value isn't used in material counting

const COUNTED_PIECES: [Piece; 5] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
];

pub fn get_piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => KING_VALUE,
    }
}

fn side_material(board: &Board, color: Color) -> i32 {
    COUNTED_PIECES
        .iter()
        .map(|&piece| get_piece_value(piece) * board.count(piece, color))
        .sum()
}

/// White material minus black material
pub fn material_balance(board: &Board) -> i32 {
    side_material(board, Color::White) - side_material(board, Color::Black)
}

/// Material of both sides added together
pub fn total_material(board: &Board) -> i32 {
    side_material(board, Color::White) + side_material(board, Color::Black)
}
