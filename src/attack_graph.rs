use chess::ALL_COLORS;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::board::Board;

pub const NUM_SQUARES: usize = 64;

/// Reachability of one square
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareLinks {
    /// Squares the occupant of this square can legally move to
    pub attacking: Vec<u8>,
    /// Squares whose occupant can legally move to this square
    pub attacked: Vec<u8>,
}

/// Attacker/defender adjacency of a whole position.
///
/// An edge `from -> to` exists when the piece on `from` has a legal move to
/// `to` in the position where its own color is to move. Legality is taken
/// literally, so a pinned piece attacks nothing. When the side to move is in
/// check, the checking side keeps its edges, including the one onto the king.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackGraph {
    squares: Vec<SquareLinks>,
}

impl AttackGraph {
    pub fn from_board(board: &Board) -> Self {
        let mut graph = DiGraphMap::<u8, ()>::new();
        for index in 0..NUM_SQUARES as u8 {
            graph.add_node(index);
        }

        for &color in ALL_COLORS.iter() {
            for mv in board.legal_moves_for(color) {
                // Promotions repeat the same edge once per piece; the graph keeps one
                graph.add_edge(
                    mv.get_source().to_index() as u8,
                    mv.get_dest().to_index() as u8,
                    (),
                );
            }
        }

        let neighbours = |square: u8, direction: Direction| {
            let mut squares: Vec<u8> = graph.neighbors_directed(square, direction).collect();
            squares.sort_unstable();
            squares
        };

        let squares = (0..NUM_SQUARES as u8)
            .map(|square| SquareLinks {
                attacking: neighbours(square, Direction::Outgoing),
                attacked: neighbours(square, Direction::Incoming),
            })
            .collect();

        Self { squares }
    }

    /// Rebuilds a graph from stored per-square links. Returns `None` unless
    /// exactly one entry per square is given.
    pub fn from_links(squares: Vec<SquareLinks>) -> Option<Self> {
        (squares.len() == NUM_SQUARES).then_some(Self { squares })
    }

    pub fn links(&self, square: u8) -> &SquareLinks {
        &self.squares[square as usize]
    }

    pub fn squares(&self) -> &[SquareLinks] {
        &self.squares
    }

    pub fn edge_count(&self) -> usize {
        self.squares.iter().map(|links| links.attacking.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initial_position_links() {
        let graph = AttackGraph::from_board(&Board::new());

        // e2 pawn reaches e3 and e4
        assert_eq!(graph.links(12).attacking, vec![20, 28]);
        assert_eq!(graph.links(20).attacked, vec![12]);
        // f3 is reachable from the g1 knight and the f2 pawn
        assert_eq!(graph.links(21).attacked, vec![6, 13]);
        // black moves are counted although it is white's turn: e7 reaches e6 and e5
        assert_eq!(graph.links(52).attacking, vec![36, 44]);
        // empty square, and a blocked rook
        assert!(graph.links(27).attacking.is_empty());
        assert!(graph.links(0).attacking.is_empty());
        assert_eq!(graph.edge_count(), 40);
    }

    #[test]
    fn test_pinned_piece_attacks_nothing() {
        let graph = AttackGraph::from_board(&Board::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap());
        assert!(graph.links(12).attacking.is_empty());
        // c3 would be reachable by the knight if it were free
        assert!(!graph.links(18).attacked.contains(&12));
    }

    #[test]
    fn test_checking_side_keeps_its_edges() {
        let graph = AttackGraph::from_board(&Board::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap());
        // a1 rook: a2..a8 and b1..e1, the last one onto the white king
        assert_eq!(graph.links(0).attacking, vec![1, 2, 3, 4, 8, 16, 24, 32, 40, 48, 56]);
        assert_eq!(graph.links(4).attacked, vec![0]);
    }

    #[test]
    fn test_promotions_collapse_to_one_edge() {
        let graph = AttackGraph::from_board(&Board::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1").unwrap());
        // e7 pawn promotes on e8
        assert_eq!(graph.links(52).attacking, vec![60]);
    }

    #[test]
    fn test_from_links_requires_every_square() {
        assert!(AttackGraph::from_links(vec![SquareLinks::default(); 10]).is_none());
        let graph = AttackGraph::from_board(&Board::new());
        let rebuilt = AttackGraph::from_links(graph.squares().to_vec()).unwrap();
        assert_eq!(rebuilt, graph);
    }
}
