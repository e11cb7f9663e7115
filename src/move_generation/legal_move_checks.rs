//! Attack queries and the trial-application legality test.

use crate::errors::ChessResult;
use crate::game_state::bitboard::square_bb;
use crate::game_state::chess_rules::castling_side_for;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::chess_move::Move;
use crate::moves::magic_tables::AttackTables;

impl GameState {
    /// Every piece of `by_color` that attacks `square` with the current occupancy.
    pub fn attackers_from(
        &self,
        tables: &AttackTables,
        square: Square,
        by_color: Color,
    ) -> Bitboard {
        let occupancy = self.occupancy_all;
        let pawns = self.piece_bb(by_color, PieceKind::Pawn);
        let knights = self.piece_bb(by_color, PieceKind::Knight);
        let kings = self.piece_bb(by_color, PieceKind::King);
        let queens = self.piece_bb(by_color, PieceKind::Queen);
        let diagonal = self.piece_bb(by_color, PieceKind::Bishop) | queens;
        let straight = self.piece_bb(by_color, PieceKind::Rook) | queens;

        // A pawn of `by_color` hits `square` from where the opposite pawn
        // pattern reaches.
        (tables.pawn_attacks(by_color.opposite(), square) & pawns)
            | (tables.knight_attacks(square) & knights)
            | (tables.king_attacks(square) & kings)
            | (tables.bishop_attacks(square, occupancy) & diagonal)
            | (tables.rook_attacks(square, occupancy) & straight)
    }

    #[inline]
    pub fn is_square_attacked(&self, tables: &AttackTables, square: Square, by_color: Color) -> bool {
        self.attackers_from(tables, square, by_color) != 0
    }

    /// Pieces giving check to `color`'s king; empty when there is no king.
    #[inline]
    pub fn checkers(&self, tables: &AttackTables, color: Color) -> Bitboard {
        match self.king_square(color) {
            Some(king_sq) => self.attackers_from(tables, king_sq, color.opposite()),
            None => 0,
        }
    }

    #[inline]
    pub fn is_in_check(&self, tables: &AttackTables, color: Color) -> bool {
        self.checkers(tables, color) != 0
    }

    /// Whether a pseudo-legal `mv` keeps the mover's king safe.
    ///
    /// Castling also requires the king's path (origin, transit and
    /// destination) to be free of attacks. Every other move is checked by
    /// applying it, testing for check, and undoing it; the board is left as
    /// it was found.
    pub fn is_move_legal(&mut self, tables: &AttackTables, mv: Move) -> ChessResult<bool> {
        let us = self.side_to_move;
        let from = mv.from_sq();
        let to = mv.to_sq();

        match self.piece_on(from) {
            Some((color, _)) if color == us => {}
            _ => return Ok(false),
        }
        if self.occupancy(us) & square_bb(to) != 0 {
            return Ok(false);
        }

        if mv.is_castling() {
            let Some(side) = castling_side_for(from, to) else {
                return Ok(false);
            };
            if side.color != us {
                return Ok(false);
            }
            let (low, high) = (from.min(to), from.max(to));
            if (low..=high).any(|sq| self.is_square_attacked(tables, sq, us.opposite())) {
                return Ok(false);
            }
        }

        self.make_move(mv)?;
        let safe = self.checkers(tables, us) == 0;
        self.unmake_move(mv)?;
        Ok(safe)
    }
}

#[cfg(test)]
mod tests {
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
    fn attackers_cover_every_piece_kind() {
        let tables = &test_context().attacks;
        // The b1 bishop's diagonal to e4 is blocked by its own d3 pawn.
        let game = GameState::from_fen("4r3/8/8/5k2/7q/2NP4/8/1B2K3 w - - 0 1").expect("FEN");
        let dark = game.attackers_from(tables, sq("e4"), Color::Dark);
        assert_eq!(dark, square_bb(sq("e8")) | square_bb(sq("f5")) | square_bb(sq("h4")));
        let light = game.attackers_from(tables, sq("e4"), Color::Light);
        assert_eq!(light, square_bb(sq("d3")) | square_bb(sq("c3")));
    }

    #[test]
    fn checkers_find_double_check() {
        let tables = &test_context().attacks;
        let game = GameState::from_fen("4k3/8/3N4/8/8/8/8/4RK2 b - - 0 1").expect("FEN");
        assert_eq!(
            game.checkers(tables, Color::Dark),
            square_bb(sq("d6")) | square_bb(sq("e1"))
        );
        assert_eq!(game.checkers(tables, Color::Light), 0);
    }

    #[test]
    fn pinned_knight_may_not_move() {
        let tables = &test_context().attacks;
        let mut game = GameState::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN");
        let before = game.clone();
        for to in ["c1", "c3", "d4", "f4", "g3", "g1"] {
            let mv = Move::new(sq("e2"), sq(to));
            assert!(!game.is_move_legal(tables, mv).expect("legality check"));
        }
        assert!(game.is_move_legal(tables, Move::new(sq("e1"), sq("d1"))).expect("legality"));
        assert_eq!(game, before);
    }

    #[test]
    fn castling_through_attack_is_rejected() {
        let tables = &test_context().attacks;
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1").expect("FEN");
        // f2 rook covers f1.
        assert!(!game.is_move_legal(tables, Move::castle(E1, G1)).expect("legality"));
        assert!(game.is_move_legal(tables, Move::castle(E1, C1)).expect("legality"));

        let mut in_check = GameState::from_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").expect("FEN");
        assert!(!in_check.is_move_legal(tables, Move::castle(E1, C1)).expect("legality"));
    }

    #[test]
    fn wrong_side_and_own_capture_are_rejected() {
        let tables = &test_context().attacks;
        let mut game = GameState::new_game();
        assert!(!game.is_move_legal(tables, Move::new(sq("e7"), sq("e5"))).expect("legality"));
        assert!(!game.is_move_legal(tables, Move::new(sq("d1"), sq("d2"))).expect("legality"));
        assert!(game.is_move_legal(tables, Move::new(sq("e2"), sq("e4"))).expect("legality"));
    }
}
