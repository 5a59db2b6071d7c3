use chess::{ALL_COLORS, Color};

use crate::board::Board;

/// Squares next to `color`'s king that the opponent attacks
pub fn attacked_king_neighbours(board: &Board, color: Color) -> i32 {
    chess::get_king_moves(board.king_square(color))
        .filter(|&square| board.is_attacked_by(!color, square))
        .count() as i32
}

/// Pressure on the two kings from white's point of view: every attacked square
/// around the white king counts -1, every one around the black king +1.
pub fn king_safety(board: &Board) -> i32 {
    ALL_COLORS
        .iter()
        .map(|&color| {
            let pressure = attacked_king_neighbours(board, color);
            match color {
                Color::White => -pressure,
                Color::Black => pressure,
            }
        })
        .sum()
}
