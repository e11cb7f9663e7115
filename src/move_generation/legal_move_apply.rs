//! Reversible move application.
//!
//! `make_move` mutates the board in place and pushes one `UndoState`;
//! `unmake_move` pops it and restores the exact previous state. Moves are
//! undone strictly in LIFO order.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::bitboard::square_bb;
use crate::game_state::chess_rules::{castling_side_for, rights_cleared_by, CastlingSide};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::chess_move::Move;

impl GameState {
    /// Apply `mv` for the side to move.
    ///
    /// The move is assumed pseudo-legal; only the ownership of the moving piece
    /// and the castling geometry are checked. On error the board is untouched.
    pub fn make_move(&mut self, mv: Move) -> ChessResult<()> {
        let from = mv.from_sq();
        let to = mv.to_sq();
        let us = self.side_to_move;
        let them = us.opposite();

        let (mover_color, moved_piece) = self
            .piece_on(from)
            .ok_or(ChessError::NoPieceOnSquare(from))?;
        if mover_color != us {
            return Err(ChessError::NotSideToMove(from));
        }

        let castling = if mv.is_castling() {
            Some(castling_rook_path(mv)?)
        } else {
            None
        };

        let captured_piece = if mv.is_en_passant() {
            Some(PieceKind::Pawn)
        } else {
            self.piece_on_for_color(them, to)
        };

        let undo = UndoState {
            mv,
            moved_piece,
            captured_piece,
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_halfmove_clock: self.halfmove_clock,
        };

        // Rights: king or corner-rook departure, or a capture on a corner.
        let mut lost = rights_cleared_by(from) | rights_cleared_by(to);
        if moved_piece == PieceKind::King {
            lost |= match us {
                Color::Light => CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE,
                Color::Dark => CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE,
            };
        }
        self.castling_rights &= !lost;

        self.en_passant_square = if moved_piece == PieceKind::Pawn && from.abs_diff(to) == 16 {
            Some((from + to) / 2)
        } else {
            None
        };

        if moved_piece == PieceKind::Pawn || captured_piece.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        // Remove mover from origin.
        self.pieces[us.index()][moved_piece.index()] &= !square_bb(from);

        if let Some(side) = castling {
            self.move_rook(us, side.rook_from, side.rook_to);
        }

        if mv.is_en_passant() {
            let victim = en_passant_victim_square(us, to);
            self.pieces[them.index()][PieceKind::Pawn.index()] &= !square_bb(victim);
        } else if let Some(captured) = captured_piece {
            self.pieces[them.index()][captured.index()] &= !square_bb(to);
        }

        let placed = mv.promotion_piece().unwrap_or(moved_piece);
        self.pieces[us.index()][placed.index()] |= square_bb(to);

        if us == Color::Dark {
            self.fullmove_number = self.fullmove_number.wrapping_add(1);
        }
        self.ply = self.ply.wrapping_add(1);
        self.side_to_move = them;

        self.recalc_occupancy();
        self.undo_stack.push(undo);
        Ok(())
    }

    /// Revert the most recent `make_move`, which must have been `mv`.
    pub fn unmake_move(&mut self, mv: Move) -> ChessResult<()> {
        match self.undo_stack.last() {
            None => return Err(ChessError::EmptyHistory),
            Some(top) if top.mv != mv => return Err(ChessError::UnmakeMismatch),
            Some(_) => {}
        }
        let castling = if mv.is_castling() {
            Some(castling_rook_path(mv)?)
        } else {
            None
        };
        let Some(undo) = self.undo_stack.pop() else {
            return Err(ChessError::EmptyHistory);
        };

        let from = mv.from_sq();
        let to = mv.to_sq();
        let them = self.side_to_move;
        let us = them.opposite();

        self.side_to_move = us;
        self.ply = self.ply.wrapping_sub(1);
        if us == Color::Dark {
            self.fullmove_number = self.fullmove_number.wrapping_sub(1);
        }
        self.castling_rights = undo.prev_castling_rights;
        self.en_passant_square = undo.prev_en_passant_square;
        self.halfmove_clock = undo.prev_halfmove_clock;

        let placed = mv.promotion_piece().unwrap_or(undo.moved_piece);
        self.pieces[us.index()][placed.index()] &= !square_bb(to);
        self.pieces[us.index()][undo.moved_piece.index()] |= square_bb(from);

        if let Some(side) = castling {
            self.move_rook(us, side.rook_to, side.rook_from);
        }

        if mv.is_en_passant() {
            let victim = en_passant_victim_square(us, to);
            self.pieces[them.index()][PieceKind::Pawn.index()] |= square_bb(victim);
        } else if let Some(captured) = undo.captured_piece {
            self.pieces[them.index()][captured.index()] |= square_bb(to);
        }

        self.recalc_occupancy();
        Ok(())
    }

    #[inline]
    fn move_rook(&mut self, color: Color, from: Square, to: Square) {
        let rooks = &mut self.pieces[color.index()][PieceKind::Rook.index()];
        *rooks &= !square_bb(from);
        *rooks |= square_bb(to);
    }
}

fn castling_rook_path(mv: Move) -> ChessResult<&'static CastlingSide> {
    castling_side_for(mv.from_sq(), mv.to_sq())
        .ok_or_else(|| ChessError::IllegalMove(mv.to_string()))
}

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
pub fn en_passant_victim_square(capturer: Color, to: Square) -> Square {
    (to as i8 - capturer.pawn_push()) as Square
}

#[cfg(test)]
mod tests {
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;
    use crate::game_state::game_state::GameState;
    use crate::moves::chess_move::Move;
    use crate::utils::long_algebraic::parse_move_text;

    fn play(fen: &str, text: &str) -> (GameState, GameState, Move) {
        let before = GameState::from_fen(fen).expect("FEN should parse");
        let mut after = before.clone();
        let mv = parse_move_text(text, &after).expect("move should parse");
        after.make_move(mv).expect("move should apply");
        (before, after, mv)
    }

    #[test]
    fn double_push_sets_en_passant_square() {
        let (_, after, _) = play(STARTING_POSITION_FEN, "e2e4");
        assert_eq!(after.en_passant_square, Some(20));
        assert_eq!(after.side_to_move, Color::Dark);
        assert_eq!(after.ply, 1);
        assert_eq!(
            after.get_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let (_, after, _) = play("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10", "e1c1");
        assert_eq!(after.get_fen(), "r3k2r/8/8/8/8/8/8/2KR3R b kq - 4 10");
    }

    #[test]
    fn rook_capture_on_corner_clears_opponent_right() {
        let (_, after, _) = play("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "a1a8");
        assert_eq!(after.castling_rights, CASTLE_LIGHT_KINGSIDE | CASTLE_DARK_KINGSIDE);
        assert_eq!(after.halfmove_clock, 0);
    }

    #[test]
    fn en_passant_removes_pawn_behind_destination() {
        let (_, after, _) = play("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", "e5d6");
        assert_eq!(after.get_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn promotion_with_capture_places_chosen_piece() {
        let (_, after, _) = play("1n2k3/P7/8/8/8/8/8/4K3 w - - 5 40", "a7b8n");
        assert_eq!(after.get_fen(), "1N2k3/8/8/8/8/8/8/4K3 b - - 0 40");
    }

    #[test]
    fn unmake_restores_every_field() {
        for (fen, text) in [
            (STARTING_POSITION_FEN, "g1f3"),
            ("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 7 21", "e8g8"),
            ("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", "e5d6"),
            ("1n2k3/P7/8/8/8/8/8/4K3 w - - 5 40", "a7b8q"),
            ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "h1h8"),
        ] {
            let (before, mut after, mv) = play(fen, text);
            after.unmake_move(mv).expect("move should unmake");
            assert_eq!(after, before, "round trip failed for {fen} {text}");
            assert_eq!(after.get_fen(), fen);
        }
    }

    #[test]
    fn misuse_is_reported_as_invariant_violation() {
        let mut game = GameState::new_game();

        let err = game.make_move(Move::new(28, 36)).expect_err("empty square");
        assert_eq!(err, ChessError::NoPieceOnSquare(28));

        let err = game.make_move(Move::new(52, 44)).expect_err("black pawn on white turn");
        assert_eq!(err, ChessError::NotSideToMove(52));

        let err = game.unmake_move(Move::new(12, 28)).expect_err("no history");
        assert_eq!(err, ChessError::EmptyHistory);

        game.make_move(Move::new(12, 28)).expect("e2e4 should apply");
        let err = game.unmake_move(Move::new(11, 27)).expect_err("wrong move");
        assert_eq!(err, ChessError::UnmakeMismatch);
        assert!(err.is_invariant_violation());
        assert_eq!(game.history_len(), 1);
    }
}
