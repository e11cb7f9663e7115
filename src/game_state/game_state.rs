//! Core incremental board state representation.
//!
//! `GameState` is the central model for the engine. It stores piece bitboards,
//! occupancy caches, turn/state flags, clocks, and the undo stack used by the
//! make/unmake workflow in `move_generation::legal_move_apply`.

use crate::errors::ChessResult;
use crate::game_state::bitboard::{square_bb, BB_RANK_1, BB_RANK_8};
use crate::game_state::chess_types::*;
use crate::moves::magic_tables::AttackTables;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Incremental game state optimized for fast move making/unmaking.
#[derive(Debug, Clone)]
pub struct GameState {
    // --- Bitboard representation ---
    // [color][piece_kind]
    pub pieces: [[Bitboard; 6]; 2],

    // Occupancy caches, always derived from `pieces`.
    pub occupancy_by_color: [Bitboard; 2],
    pub occupancy_all: Bitboard,

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub ply: u16,

    // --- Make/unmake stack ---
    pub undo_stack: Vec<UndoState>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,
            ply: 0,

            undo_stack: Vec::new(),
        }
    }
}

/// Equality covers the full board state and the history depth, not the
/// contents of the undo records.
impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.occupancy_by_color == other.occupancy_by_color
            && self.occupancy_all == other.occupancy_all
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_square == other.en_passant_square
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.ply == other.ply
            && self.undo_stack.len() == other.undo_stack.len()
    }
}

impl Eq for GameState {}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn new_game() -> Self {
        let mut state = Self::default();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, piece) in back_rank.into_iter().enumerate() {
            let file = file as Square;
            state.pieces[Color::Light.index()][piece.index()] |= square_bb(file);
            state.pieces[Color::Dark.index()][piece.index()] |= square_bb(56 + file);
        }
        state.pieces[Color::Light.index()][PieceKind::Pawn.index()] = 0x0000_0000_0000_FF00;
        state.pieces[Color::Dark.index()][PieceKind::Pawn.index()] = 0x00FF_0000_0000_0000;
        state.castling_rights = CASTLE_ALL;
        state.recalc_occupancy();
        state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Rebuild the occupancy caches from the piece bitboards.
    pub fn recalc_occupancy(&mut self) {
        for color in Color::ALL {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .copied()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::Light.index()]
            | self.occupancy_by_color[Color::Dark.index()];
    }

    #[inline]
    pub fn piece_bb(&self, color: Color, piece: PieceKind) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy_by_color[color.index()]
    }

    pub fn piece_on_for_color(&self, color: Color, square: Square) -> Option<PieceKind> {
        let mask = square_bb(square);
        if self.occupancy_by_color[color.index()] & mask == 0 {
            return None;
        }
        PieceKind::ALL
            .into_iter()
            .find(|piece| self.pieces[color.index()][piece.index()] & mask != 0)
    }

    pub fn piece_on(&self, square: Square) -> Option<(Color, PieceKind)> {
        Color::ALL.into_iter().find_map(|color| {
            self.piece_on_for_color(color, square)
                .map(|piece| (color, piece))
        })
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces[color.index()][PieceKind::King.index()];
        if kings == 0 {
            None
        } else {
            Some(kings.trailing_zeros() as Square)
        }
    }

    /// Number of made-but-not-unmade moves.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Structural sanity: one king each, no pawns on back ranks, at most eight
    /// pawns a side, and the side that just moved is not in check.
    pub fn validate(&self, tables: &AttackTables) -> bool {
        for color in Color::ALL {
            if self.piece_bb(color, PieceKind::King).count_ones() != 1 {
                return false;
            }
            let pawns = self.piece_bb(color, PieceKind::Pawn);
            if pawns & (BB_RANK_1 | BB_RANK_8) != 0 || pawns.count_ones() > 8 {
                return false;
            }
        }

        let mut seen = 0u64;
        for color in Color::ALL {
            for piece in PieceKind::ALL {
                let bb = self.piece_bb(color, piece);
                if seen & bb != 0 {
                    return false;
                }
                seen |= bb;
            }
        }

        self.checkers(tables, self.side_to_move.opposite()) == 0
    }
}
