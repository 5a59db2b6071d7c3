use chess::{Color, File, Rank, Square};

use crate::board::Board;

/// d4, d5, e4, e5
pub fn central_squares() -> [Square; 4] {
    [
        Square::make_square(Rank::Fourth, File::D),
        Square::make_square(Rank::Fifth, File::D),
        Square::make_square(Rank::Fourth, File::E),
        Square::make_square(Rank::Fifth, File::E),
    ]
}

/// Legal moves white would have minus legal moves black would have, each side
/// counted as if it were its turn. The position itself is left untouched.
pub fn mobility(board: &Board) -> i32 {
    board.legal_move_count(Color::White) as i32 - board.legal_move_count(Color::Black) as i32
}

/// Net attacker count over the four central squares
pub fn central_control(board: &Board) -> i32 {
    central_squares()
        .iter()
        .map(|&square| {
            board.attackers(Color::White, square).popcnt() as i32
                - board.attackers(Color::Black, square).popcnt() as i32
        })
        .sum()
}
