//! Canonical chess-rule constants.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// One castling option: the right bit, king path, rook path and the squares
/// that must be empty between king and rook.
#[derive(Debug, Clone, Copy)]
pub struct CastlingSide {
    pub right: CastlingRights,
    pub color: Color,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    pub between: Bitboard,
}

pub const CASTLING_SIDES: [CastlingSide; 4] = [
    CastlingSide {
        right: CASTLE_LIGHT_KINGSIDE,
        color: Color::Light,
        king_from: E1,
        king_to: G1,
        rook_from: H1,
        rook_to: F1,
        between: 0x0000_0000_0000_0060,
    },
    CastlingSide {
        right: CASTLE_LIGHT_QUEENSIDE,
        color: Color::Light,
        king_from: E1,
        king_to: C1,
        rook_from: A1,
        rook_to: D1,
        between: 0x0000_0000_0000_000E,
    },
    CastlingSide {
        right: CASTLE_DARK_KINGSIDE,
        color: Color::Dark,
        king_from: E8,
        king_to: G8,
        rook_from: H8,
        rook_to: F8,
        between: 0x6000_0000_0000_0000,
    },
    CastlingSide {
        right: CASTLE_DARK_QUEENSIDE,
        color: Color::Dark,
        king_from: E8,
        king_to: C8,
        rook_from: A8,
        rook_to: D8,
        between: 0x0E00_0000_0000_0000,
    },
];

/// Castling option whose king path matches a castling move, if any.
#[inline]
pub fn castling_side_for(king_from: Square, king_to: Square) -> Option<&'static CastlingSide> {
    CASTLING_SIDES
        .iter()
        .find(|side| side.king_from == king_from && side.king_to == king_to)
}

/// Rights lost when a piece leaves or lands on `square`.
#[inline]
pub const fn rights_cleared_by(square: Square) -> CastlingRights {
    match square {
        A1 => CASTLE_LIGHT_QUEENSIDE,
        H1 => CASTLE_LIGHT_KINGSIDE,
        E1 => CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE,
        A8 => CASTLE_DARK_QUEENSIDE,
        H8 => CASTLE_DARK_KINGSIDE,
        E8 => CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE,
        _ => 0,
    }
}
