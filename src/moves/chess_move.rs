//! Packed 16-bit move value.
//!
//! Layout:
//! - bits 0-5: from square
//! - bits 6-11: to square
//! - bits 12-13: promotion piece (knight, bishop, rook, queen)
//! - bits 14-15: kind (normal, castling, en passant, promotion)
//!
//! Captures are not flagged; the board is consulted when the move is made.
//! Ordering scores live in `ScoredMove`, never in the move itself.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

const SQUARE_MASK: u16 = 0x3F;
const TO_SHIFT: u16 = 6;
const PROMOTION_SHIFT: u16 = 12;
const KIND_SHIFT: u16 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    Castling,
    EnPassant,
    Promotion,
}

impl MoveKind {
    #[inline]
    const fn bits(self) -> u16 {
        match self {
            MoveKind::Normal => 0b00,
            MoveKind::Castling => 0b01,
            MoveKind::EnPassant => 0b10,
            MoveKind::Promotion => 0b11,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    /// All-zero value (a1a1). Printed as `0000`, never generated.
    pub const NULL: Move = Move(0);

    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move((from as u16 & SQUARE_MASK) | ((to as u16 & SQUARE_MASK) << TO_SHIFT))
    }

    #[inline]
    pub const fn with_kind(from: Square, to: Square, kind: MoveKind) -> Self {
        Move(Self::new(from, to).0 | (kind.bits() << KIND_SHIFT))
    }

    #[inline]
    pub const fn castle(king_from: Square, king_to: Square) -> Self {
        Self::with_kind(king_from, king_to, MoveKind::Castling)
    }

    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Self::with_kind(from, to, MoveKind::EnPassant)
    }

    /// `piece` must be one of knight, bishop, rook or queen.
    #[inline]
    pub const fn promotion(from: Square, to: Square, piece: PieceKind) -> Self {
        let code = match piece {
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            PieceKind::Queen => 3,
            _ => 0,
        };
        Move(Self::with_kind(from, to, MoveKind::Promotion).0 | (code << PROMOTION_SHIFT))
    }

    #[inline]
    pub const fn from_sq(self) -> Square {
        (self.0 & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn to_sq(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        match self.0 >> KIND_SHIFT {
            0b01 => MoveKind::Castling,
            0b10 => MoveKind::EnPassant,
            0b11 => MoveKind::Promotion,
            _ => MoveKind::Normal,
        }
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self.kind(), MoveKind::Castling)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        matches!(self.kind(), MoveKind::Promotion)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    pub const fn promotion_piece(self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }
        Some(match (self.0 >> PROMOTION_SHIFT) & 0b11 {
            0 => PieceKind::Knight,
            1 => PieceKind::Bishop,
            2 => PieceKind::Rook,
            _ => PieceKind::Queen,
        })
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Move {
    /// Coordinate form: `e2e4`, `e7e8q`, `0000` for the null move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        let from = square_to_algebraic(self.from_sq()).map_err(|_| fmt::Error)?;
        let to = square_to_algebraic(self.to_sq()).map_err(|_| fmt::Error)?;
        write!(f, "{from}{to}")?;
        if let Some(piece) = self.promotion_piece() {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self}, {:?})", self.kind())
    }
}

/// A move paired with an ephemeral ordering score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_round_trip() {
        let mv = Move::promotion(52, 60, PieceKind::Rook);
        assert_eq!(mv.from_sq(), 52);
        assert_eq!(mv.to_sq(), 60);
        assert_eq!(mv.kind(), MoveKind::Promotion);
        assert_eq!(mv.promotion_piece(), Some(PieceKind::Rook));
        assert_eq!(mv.to_string(), "e7e8r");
    }

    #[test]
    fn kind_disambiguates_king_two_step() {
        let plain = Move::new(4, 6);
        let castle = Move::castle(4, 6);
        assert_ne!(plain, castle);
        assert!(!plain.is_castling());
        assert!(castle.is_castling());
        assert_eq!(plain.to_string(), castle.to_string());
    }

    #[test]
    fn null_move_prints_zeros() {
        assert!(Move::NULL.is_null());
        assert_eq!(Move::NULL.to_string(), "0000");
        assert_eq!(Move::en_passant(36, 43).to_string(), "e5d6");
    }
}
