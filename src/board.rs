use chess::{
    BitBoard, Board as ChessBoard, BoardBuilder, ChessMove, Color, File, MoveGen, Piece, Square,
};
use std::fmt;
use std::str::FromStr;

use crate::error::{AnalysisError, Result};

const PROMOTION_PIECES: [Piece; 4] = [Piece::Queen, Piece::Knight, Piece::Rook, Piece::Bishop];

/// Position wrapper exposing the read-only queries the feature code needs.
///
/// Nothing here mutates the wrapped position. Queries that depend on who is to
/// move take the color as a parameter instead of flipping the side to move.
#[derive(Clone, Copy)]
pub struct Board {
    inner: ChessBoard,
}

impl Board {
    pub fn new() -> Self {
        Self {
            inner: ChessBoard::default(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        ChessBoard::from_str(fen.trim())
            .map(|board| Self { inner: board })
            .map_err(|e| AnalysisError::InvalidFen {
                fen: fen.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn get_piece_at(&self, square: Square) -> Option<Piece> {
        self.inner.piece_on(square)
    }

    pub fn get_color_at(&self, square: Square) -> Option<Color> {
        self.inner.color_on(square)
    }

    /// Squares holding `piece` of `color`
    pub fn pieces(&self, piece: Piece, color: Color) -> BitBoard {
        *self.inner.pieces(piece) & *self.inner.color_combined(color)
    }

    pub fn count(&self, piece: Piece, color: Color) -> i32 {
        self.pieces(piece, color).popcnt() as i32
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.inner.king_square(color)
    }

    /// Pieces of `color` attacking `square`, ignoring pins and whose turn it is.
    pub fn attackers(&self, color: Color, square: Square) -> BitBoard {
        let board = &self.inner;
        let occupied = *board.combined();
        let diagonal = *board.pieces(Piece::Bishop) | *board.pieces(Piece::Queen);
        let straight = *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);

        let hits = (chess::get_bishop_moves(square, occupied) & diagonal)
            | (chess::get_rook_moves(square, occupied) & straight)
            | (chess::get_knight_moves(square) & *board.pieces(Piece::Knight))
            | (chess::get_king_moves(square) & *board.pieces(Piece::King))
            // A pawn of `color` hits `square` exactly when an enemy pawn there would hit it back
            | chess::get_pawn_attacks(square, !color, *board.pieces(Piece::Pawn));

        hits & *board.color_combined(color)
    }

    pub fn is_attacked_by(&self, color: Color, square: Square) -> bool {
        self.attackers(color, square) != chess::EMPTY
    }

    /// The same placement with `color` to move.
    ///
    /// Returns `None` when the chess crate refuses that position, which happens
    /// when the side actually to move is in check.
    pub fn with_side_to_move(&self, color: Color) -> Option<ChessBoard> {
        if self.inner.side_to_move() == color {
            return Some(self.inner);
        }
        let mut builder = BoardBuilder::from(&self.inner);
        // An en passant right only ever belongs to the side actually to move
        builder.side_to_move(color).en_passant(None);
        ChessBoard::try_from(builder).ok()
    }

    /// Legal moves `color` would have if it were its turn
    pub fn legal_moves_for(&self, color: Color) -> Vec<ChessMove> {
        match self.with_side_to_move(color) {
            Some(board) => MoveGen::new_legal(&board).collect(),
            None => {
                log::debug!(
                    "{:?} to move in {} leaves the opponent in check; generating moves directly",
                    color,
                    self.inner
                );
                self.moves_facing_checked_king(color)
            }
        }
    }

    pub fn legal_move_count(&self, color: Color) -> usize {
        match self.with_side_to_move(color) {
            Some(board) => MoveGen::new_legal(&board).len(),
            None => self.moves_facing_checked_king(color).len(),
        }
    }

    /// Own pieces of `color` that shield its king from an enemy slider
    fn pinned(&self, color: Color) -> BitBoard {
        let board = &self.inner;
        let king = board.king_square(color);
        let enemy = *board.color_combined(!color);
        let occupied = *board.combined();
        let queens = *board.pieces(Piece::Queen);

        let snipers = (chess::get_bishop_rays(king) & (*board.pieces(Piece::Bishop) | queens) & enemy)
            | (chess::get_rook_rays(king) & (*board.pieces(Piece::Rook) | queens) & enemy);

        let mut pinned = chess::EMPTY;
        for sniper in snipers {
            let blockers = chess::between(king, sniper) & occupied;
            if blockers.popcnt() == 1 {
                pinned |= blockers & *board.color_combined(color);
            }
        }
        pinned
    }

    /// Moves for `color` while its opponent, the side actually to move, is in
    /// check. `color`'s own king is safe in any position the chess crate
    /// accepts, so only its pins and king destinations restrict the
    /// pseudo-legal moves, and capturing the enemy king counts as a move.
    /// En passant is never available to the side not on move.
    fn moves_facing_checked_king(&self, color: Color) -> Vec<ChessMove> {
        let board = &self.inner;
        let own = *board.color_combined(color);
        let enemy = *board.color_combined(!color);
        let occupied = *board.combined();
        let king = board.king_square(color);
        let pinned = self.pinned(color);
        let last_rank = (!color).to_my_backrank();

        let mut moves = Vec::new();
        for from in own {
            let Some(piece) = board.piece_on(from) else { continue };
            let mut targets = match piece {
                Piece::Pawn => chess::get_pawn_attacks(from, color, enemy) | self.pawn_pushes(from, color),
                Piece::Knight => chess::get_knight_moves(from),
                Piece::Bishop => chess::get_bishop_moves(from, occupied),
                Piece::Rook => chess::get_rook_moves(from, occupied),
                Piece::Queen => {
                    chess::get_bishop_moves(from, occupied) | chess::get_rook_moves(from, occupied)
                }
                Piece::King => chess::get_king_moves(from),
            } & !own;

            if piece == Piece::King {
                targets = targets
                    .filter(|&to| !self.is_attacked_by(!color, to))
                    .fold(chess::EMPTY, |acc, to| acc | BitBoard::from_square(to));
            } else if pinned & BitBoard::from_square(from) != chess::EMPTY {
                targets &= chess::line(king, from);
            }

            for to in targets {
                if piece == Piece::Pawn && to.get_rank() == last_rank {
                    for promotion in PROMOTION_PIECES {
                        moves.push(ChessMove::new(from, to, Some(promotion)));
                    }
                } else {
                    moves.push(ChessMove::new(from, to, None));
                }
            }
        }

        moves.extend(self.castling_moves(color));
        moves
    }

    fn pawn_pushes(&self, from: Square, color: Color) -> BitBoard {
        let empty = |square: &Square| self.inner.piece_on(*square).is_none();
        let Some(single) = from.forward(color).filter(empty) else {
            return chess::EMPTY;
        };
        let mut pushes = BitBoard::from_square(single);
        if from.get_rank() == color.to_second_rank() {
            if let Some(double) = single.forward(color).filter(empty) {
                pushes |= BitBoard::from_square(double);
            }
        }
        pushes
    }

    fn castling_moves(&self, color: Color) -> Vec<ChessMove> {
        let board = &self.inner;
        let rights = board.castle_rights(color);
        let rank = color.to_my_backrank();
        let king = Square::make_square(rank, File::E);
        if board.king_square(color) != king || self.is_attacked_by(!color, king) {
            return Vec::new();
        }

        let square = |file: File| Square::make_square(rank, file);
        let empty = |files: &[File]| files.iter().all(|&file| board.piece_on(square(file)).is_none());
        let safe = |files: &[File]| files.iter().all(|&file| !self.is_attacked_by(!color, square(file)));

        let mut moves = Vec::new();
        if rights.has_kingside() && empty(&[File::F, File::G]) && safe(&[File::F, File::G]) {
            moves.push(ChessMove::new(king, square(File::G), None));
        }
        if rights.has_queenside()
            && empty(&[File::B, File::C, File::D])
            && safe(&[File::C, File::D])
        {
            moves.push(ChessMove::new(king, square(File::C), None));
        }
        moves
    }

    pub fn to_fen(&self) -> String {
        self.inner.to_string()
    }

    pub fn side_to_move(&self) -> Color {
        self.inner.side_to_move()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.inner)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use chess::{File, Rank};

    fn sq(file: File, rank: Rank) -> Square {
        Square::make_square(rank, file)
    }

    #[test]
    fn test_fen_parsing() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn test_invalid_fen_is_reported() {
        let err = Board::from_fen("not a position").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidFen { .. }));
        assert!(err.is_row_error());
    }

    #[test]
    fn test_attackers_of_square() {
        // Pawn e4 covers d5, knight f3 covers d4
        let board = Board::from_fen("4k3/8/8/8/4P3/5N2/8/4K3 w - - 0 1").unwrap();
        assert_eq!(board.attackers(Color::White, sq(File::D, Rank::Fifth)).popcnt(), 1);
        assert_eq!(board.attackers(Color::White, sq(File::D, Rank::Fourth)).popcnt(), 1);
        assert_eq!(board.attackers(Color::Black, sq(File::D, Rank::Fourth)).popcnt(), 0);
    }

    #[test]
    fn test_attackers_ignore_pins() {
        // Knight on e2 is pinned but still attacks c3
        let board = Board::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(board.is_attacked_by(Color::White, sq(File::C, Rank::Third)));
        assert!(board.legal_moves_for(Color::White).iter().all(|mv| mv.get_source() != sq(File::E, Rank::Second)));
    }

    #[test]
    fn test_legal_moves_for_either_side() {
        let board = Board::new();
        assert_eq!(board.legal_move_count(Color::White), 20);
        assert_eq!(board.legal_move_count(Color::Black), 20);
        assert_eq!(board.side_to_move(), Color::White);
    }

    #[test]
    fn test_side_in_check_still_has_an_opponent_with_moves() {
        // White is in check from the rook, so the chess crate cannot hand black the move
        let board = Board::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        assert!(board.with_side_to_move(Color::Black).is_none());
        // Kd2, Ke2, Kf2
        assert_eq!(board.legal_move_count(Color::White), 3);
        // Rook: a2-a8, b1-d1 and the capture on e1. King: d8, f8, d7, e7, f7
        assert_eq!(board.legal_move_count(Color::Black), 16);
        assert!(board
            .legal_moves_for(Color::Black)
            .contains(&ChessMove::new(sq(File::A, Rank::First), sq(File::E, Rank::First), None)));
        assert_eq!(board.side_to_move(), Color::White);
    }

    #[test]
    fn test_pins_hold_while_opponent_is_in_check() {
        // The e2 rook pins the e7 knight; white is in check from a1
        let board = Board::from_fen("4k3/4n3/8/8/8/8/4R3/r3K3 w - - 0 1").unwrap();
        let moves = board.legal_moves_for(Color::Black);
        assert!(moves.iter().all(|mv| mv.get_source() != sq(File::E, Rank::Seventh)));
        // 11 rook moves and the king's d8, f8, d7, f7
        assert_eq!(moves.len(), 15);
    }

    #[test]
    fn test_pushes_promotions_and_castling_while_opponent_is_in_check() {
        // Black is in check from the b5 bishop; white still has pawn pushes,
        // four promotions on a8 and short castling
        let board = Board::from_fen("4k3/P7/8/1B6/8/8/4P3/4K2R b K - 0 1").unwrap();
        assert!(board.with_side_to_move(Color::White).is_none());
        let moves = board.legal_moves_for(Color::White);

        let promotions = moves.iter().filter(|mv| mv.get_promotion().is_some()).count();
        assert_eq!(promotions, 4);
        assert!(moves.contains(&ChessMove::new(sq(File::E, Rank::Second), sq(File::E, Rank::Fourth), None)));
        assert!(moves.contains(&ChessMove::new(sq(File::E, Rank::First), sq(File::G, Rank::First), None)));
    }
}
