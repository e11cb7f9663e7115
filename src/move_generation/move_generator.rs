//! Pseudo-legal and legal move generation.
//!
//! `MoveGenerator` borrows the shared attack tables and produces moves for the
//! side to move. A target mask restricts destinations: pass `BB_FULL` for
//! every move or the enemy occupancy for captures only. Output order is not
//! stable and callers must not depend on it.

use crate::errors::ChessResult;
use crate::game_state::bitboard::BB_FULL;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::generate_piece_moves;
use crate::moves::chess_move::Move;
use crate::moves::magic_tables::AttackTables;

#[derive(Debug, Clone, Copy)]
pub struct MoveGenerator<'a> {
    tables: &'a AttackTables,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(tables: &'a AttackTables) -> Self {
        Self { tables }
    }

    #[inline]
    pub fn tables(&self) -> &'a AttackTables {
        self.tables
    }

    pub fn pseudo_legal_moves(&self, game_state: &GameState, target_mask: Bitboard) -> Vec<Move> {
        let mut pseudo = Vec::<Move>::with_capacity(64);
        generate_pawn_moves(self.tables, game_state, target_mask, &mut pseudo);
        generate_piece_moves(self.tables, game_state, target_mask, &mut pseudo);
        generate_king_moves(self.tables, game_state, target_mask, &mut pseudo);
        pseudo
    }

    /// Pseudo-legal moves that survive the trial make/unmake check test.
    pub fn legal_moves(
        &self,
        game_state: &mut GameState,
        target_mask: Bitboard,
    ) -> ChessResult<Vec<Move>> {
        let pseudo = self.pseudo_legal_moves(game_state, target_mask);
        let mut legal = Vec::<Move>::with_capacity(pseudo.len());
        for mv in pseudo {
            if game_state.is_move_legal(self.tables, mv)? {
                legal.push(mv);
            }
        }
        Ok(legal)
    }

    #[inline]
    pub fn all_legal_moves(&self, game_state: &mut GameState) -> ChessResult<Vec<Move>> {
        self.legal_moves(game_state, BB_FULL)
    }

    /// Legal captures, including en passant.
    #[inline]
    pub fn legal_captures(&self, game_state: &mut GameState) -> ChessResult<Vec<Move>> {
        let enemy = game_state.occupancy(game_state.side_to_move.opposite());
        self.legal_moves(game_state, enemy)
    }
}

#[cfg(test)]
mod tests {
    use super::MoveGenerator;
    use crate::context::test_context;
    use crate::game_state::bitboard::square_bb;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::GameState;
    use crate::moves::chess_move::Move;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(text: &str) -> Square {
        algebraic_to_square(text).expect("valid square")
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let generator = MoveGenerator::new(&test_context().attacks);
        let mut game = GameState::new_game();
        assert_eq!(generator.all_legal_moves(&mut game).expect("generation").len(), 20);
        assert!(generator.legal_captures(&mut game).expect("generation").is_empty());
    }

    #[test]
    fn pinned_bishop_moves_only_along_pin_ray() {
        let generator = MoveGenerator::new(&test_context().attacks);
        let mut game = GameState::from_fen("7k/8/8/8/8/2q5/1B6/K7 w - - 0 1").expect("FEN");
        let bishop_moves: Vec<Move> = generator
            .all_legal_moves(&mut game)
            .expect("generation")
            .into_iter()
            .filter(|mv| mv.from_sq() == sq("b2"))
            .collect();
        assert_eq!(bishop_moves, vec![Move::new(sq("b2"), sq("c3"))]);
    }

    #[test]
    fn pinned_rook_slides_along_pin_file() {
        let generator = MoveGenerator::new(&test_context().attacks);
        let mut game = GameState::from_fen("4r2k/8/8/8/8/8/4R3/4K3 w - - 0 1").expect("FEN");
        let mut targets: Vec<Square> = generator
            .all_legal_moves(&mut game)
            .expect("generation")
            .into_iter()
            .filter(|mv| mv.from_sq() == sq("e2"))
            .map(|mv| mv.to_sq())
            .collect();
        targets.sort_unstable();
        let expected: Vec<Square> = ["e3", "e4", "e5", "e6", "e7", "e8"].map(sq).to_vec();
        assert_eq!(targets, expected);
    }

    #[test]
    fn check_evasions_only() {
        let generator = MoveGenerator::new(&test_context().attacks);
        // Rook check on the e-file; the king must step aside or the knight blocks.
        let mut game = GameState::from_fen("4r2k/8/8/8/8/8/6N1/4K3 w - - 0 1").expect("FEN");
        let moves = generator.all_legal_moves(&mut game).expect("generation");
        assert!(moves.contains(&Move::new(sq("g2"), sq("e3"))));
        assert!(!moves.contains(&Move::new(sq("g2"), sq("f4"))));
        assert!(moves
            .iter()
            .all(|mv| mv.from_sq() == sq("g2") || mv.from_sq() == sq("e1")));
        assert!(moves.iter().all(|mv| mv.to_sq() != sq("e2")));
    }

    #[test]
    fn capture_generation_respects_mask() {
        let generator = MoveGenerator::new(&test_context().attacks);
        let mut game = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN");
        let enemy = game.occupancy(Color::Dark);
        let captures = generator.legal_captures(&mut game).expect("generation");
        assert_eq!(captures.len(), 8);
        assert!(captures.iter().all(|mv| square_bb(mv.to_sq()) & enemy != 0));
    }

    #[test]
    fn generation_leaves_board_untouched() {
        let generator = MoveGenerator::new(&test_context().attacks);
        let mut game = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN");
        let before = game.clone();
        let moves = generator.all_legal_moves(&mut game).expect("generation");
        assert_eq!(moves.len(), 48);
        assert_eq!(game, before);
    }
}
